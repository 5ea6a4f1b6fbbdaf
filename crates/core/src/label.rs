//! Container directive labels (`:::note[Label]`).
//!
//! The directive parser emits the label as a paragraph flagged with
//! `directiveLabel` as the first child. JSX has no equivalent, so the
//! paragraph is detached and its inline content handed to a label handler.

use crate::ast::{Element, Node};
use crate::builder;

/// Detaches label paragraphs from `children`, returning the first label's
/// inline content.
///
/// Every label-flagged child is removed; only the first one is returned.
/// Returns `None` and leaves `children` untouched when there is no label.
pub fn take_label(children: &mut Vec<Node>) -> Option<Vec<Node>> {
    let index = children.iter().position(Node::is_label)?;
    let mut label = children.remove(index);
    children.retain(|child| !child.is_label());
    Some(label.children_mut().map(std::mem::take).unwrap_or_default())
}

/// Label handler that drops the label.
pub fn discard_label(_element: &mut Element, _label: Vec<Node>) {}

/// Label handler that appends `<Fragment slot="label">` holding the label
/// content as the element's last child.
///
/// This is how Astro components receive named slots:
///
/// ```text
/// :::Note[Important]
/// This is an important note.
/// :::
/// ```
///
/// becomes
///
/// ```text
/// <Note>
///   This is an important note.
///   <Fragment slot="label">Important</Fragment>
/// </Note>
/// ```
pub fn slot_label(element: &mut Element, label: Vec<Node>) {
    element.children.push(builder::flow_node(
        "Fragment",
        vec![builder::attr("slot", Some("label".to_string()))],
        label,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body() -> Node {
        Node::paragraph(vec![Node::text("Body")])
    }

    #[test]
    fn takes_first_label_content() {
        let mut children = vec![Node::label(vec![Node::text("Title")]), body()];
        let label = take_label(&mut children);
        assert_eq!(label, Some(vec![Node::text("Title")]));
        assert_eq!(children, vec![body()]);
    }

    #[test]
    fn no_label_leaves_children_alone() {
        let mut children = vec![body(), body()];
        assert_eq!(take_label(&mut children), None);
        assert_eq!(children.len(), 2);
    }

    #[test]
    fn every_label_paragraph_is_removed() {
        let mut children = vec![
            Node::label(vec![Node::text("First")]),
            body(),
            Node::label(vec![Node::text("Second")]),
        ];
        let label = take_label(&mut children);
        assert_eq!(label, Some(vec![Node::text("First")]));
        assert_eq!(children, vec![body()]);
    }

    #[test]
    fn slot_label_appends_fragment_last() {
        let mut element = builder::flow("Note", Vec::new(), vec![body()]);
        slot_label(&mut element, vec![Node::text("Important")]);

        assert_eq!(element.children.len(), 2);
        let fragment = element.children[1].as_element().unwrap();
        assert!(matches!(element.children[1], Node::MdxJsxFlowElement(_)));
        assert_eq!(fragment.name.as_deref(), Some("Fragment"));
        assert_eq!(fragment.attributes, vec![builder::attr("slot", Some("label".into()))]);
        assert_eq!(fragment.children, vec![Node::text("Important")]);
    }

    #[test]
    fn discard_label_changes_nothing() {
        let mut element = builder::flow("Note", Vec::new(), vec![body()]);
        let before = element.clone();
        discard_label(&mut element, vec![Node::text("Important")]);
        assert_eq!(element, before);
    }
}
