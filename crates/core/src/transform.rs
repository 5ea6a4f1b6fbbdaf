//! Lowers directive nodes into JSX element nodes in place.
//!
//! The walk is a single pre-order pass. Each accepted directive is rewritten
//! before its children are visited, so directives nested inside a lowered
//! container are reached in the same pass through the new element's children.

use std::mem;

use crate::ast::{Directive, DirectiveKind, Element, Node};
use crate::{builder, label};

type FilterFn = dyn Fn(DirectiveKind, &Directive) -> bool + Send + Sync;
type LabelFn = dyn Fn(&mut Element, Vec<Node>) + Send + Sync;
type TagFn = dyn Fn(&str) -> String + Send + Sync;
type AttributeFn = dyn Fn(&str, &str) -> String + Send + Sync;

/// Configuration for the lowering pass.
///
/// The defaults lower every directive that no other pass claimed, keep names
/// as authored and drop container labels.
pub struct Options {
    skip_transformed: bool,
    filter: Box<FilterFn>,
    handle_label: Box<LabelFn>,
    transform_tag: Box<TagFn>,
    transform_attribute: Box<AttributeFn>,
}

impl Options {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether directives already lowered for HTML output (`data.hName` set)
    /// are left alone. Defaults to `true`.
    pub fn with_skip_transformed(mut self, skip: bool) -> Self {
        self.skip_transformed = skip;
        self
    }

    /// Only directives for which `filter` returns `true` are lowered.
    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(DirectiveKind, &Directive) -> bool + Send + Sync + 'static,
    {
        self.filter = Box::new(filter);
        self
    }

    /// Called with the new element and the label content of each container
    /// directive that has a label. See [`label::slot_label`].
    pub fn with_label_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut Element, Vec<Node>) + Send + Sync + 'static,
    {
        self.handle_label = Box::new(handler);
        self
    }

    /// Maps directive names to element names. See [`crate::normalize_tag`].
    pub fn with_tag_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.transform_tag = Box::new(transform);
        self
    }

    /// Maps `(element name, attribute name)` to the output attribute name.
    /// See [`crate::normalize_attribute`].
    pub fn with_attribute_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&str, &str) -> String + Send + Sync + 'static,
    {
        self.transform_attribute = Box::new(transform);
        self
    }

    /// Whether already lowered directives are skipped.
    pub fn skip_transformed(&self) -> bool {
        self.skip_transformed
    }

    fn accepts(&self, kind: DirectiveKind, directive: &Directive) -> bool {
        if self.skip_transformed && directive.is_lowered() {
            log::trace!("Skipping {} directive `{}`: already lowered", kind, directive.name);
            return false;
        }
        if !(self.filter)(kind, directive) {
            log::trace!("Skipping {} directive `{}`: rejected by filter", kind, directive.name);
            return false;
        }
        true
    }

    fn lower(&self, kind: DirectiveKind, node: &mut Node) {
        let Some(directive) = node.as_directive_mut() else {
            return;
        };

        let tag = (self.transform_tag)(directive.name.as_str());
        let attributes = builder::attrs(
            directive
                .attributes
                .take()
                .unwrap_or_default()
                .into_iter()
                .map(|(name, value)| {
                    ((self.transform_attribute)(tag.as_str(), name.as_str()), value)
                }),
        );

        let mut children = mem::take(&mut directive.children);
        let label = match kind {
            DirectiveKind::Container => label::take_label(&mut children),
            DirectiveKind::Leaf | DirectiveKind::Text => None,
        };

        log::debug!("Lowering {} directive `{}` to <{}>", kind, directive.name, tag);
        let position = directive.position;

        let replacement = match kind {
            DirectiveKind::Container | DirectiveKind::Leaf => {
                let mut element = builder::flow(tag, attributes, children);
                element.position = position;
                if let Some(label) = label {
                    (self.handle_label)(&mut element, label);
                }
                Node::MdxJsxFlowElement(element)
            }
            DirectiveKind::Text => {
                let mut element = builder::text(tag, attributes, children);
                element.position = position;
                Node::MdxJsxTextElement(element)
            }
        };
        node.replace_with(replacement);
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            skip_transformed: true,
            filter: Box::new(|_: DirectiveKind, _: &Directive| true),
            handle_label: Box::new(label::discard_label),
            transform_tag: Box::new(|tag: &str| tag.to_string()),
            transform_attribute: Box::new(|_tag: &str, attr: &str| attr.to_string()),
        }
    }
}

impl std::fmt::Debug for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Options")
            .field("skip_transformed", &self.skip_transformed)
            .finish_non_exhaustive()
    }
}

/// Lowers every accepted directive in `tree`, returning how many were rewritten.
///
/// Nodes are rewritten in place, in document order. Hooks run synchronously
/// on this thread; a panic inside a hook aborts the rest of the pass.
pub fn transform_directives(tree: &mut Node, options: &Options) -> usize {
    let mut lowered = 0;
    let mut stack: Vec<&mut Node> = vec![tree];

    while let Some(node) = stack.pop() {
        if let Some(kind) = node.directive_kind()
            && let Some(directive) = node.as_directive()
            && options.accepts(kind, directive)
        {
            options.lower(kind, node);
            lowered += 1;
        }

        if let Some(children) = node.children_mut() {
            // Reversed so the first child is popped first.
            stack.extend(children.iter_mut().rev());
        }
    }

    log::debug!("Lowered {} directive(s)", lowered);
    lowered
}

/// A reusable lowering pass bound to one set of [`Options`].
#[derive(Debug, Default)]
pub struct DirectiveTransformer {
    options: Options,
}

impl DirectiveTransformer {
    /// Create a transformer from options.
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    /// The options this transformer runs with.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Lowers directives in `tree`. See [`transform_directives`].
    pub fn transform(&self, tree: &mut Node) -> usize {
        transform_directives(tree, &self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeData;
    use crate::builder::{attr, flow_node, text_node};
    use crate::casing::{AttributeCasing, Casing, normalize_attribute, normalize_tag};
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    fn no_skip() -> Options {
        Options::new().with_skip_transformed(false)
    }

    fn note_with_label() -> Node {
        Node::root(vec![Node::ContainerDirective(
            Directive::new("Note").with_children(vec![
                Node::label(vec![Node::text("Important")]),
                Node::paragraph(vec![Node::text("This is an important note.")]),
            ]),
        )])
    }

    #[test]
    fn text_directive_becomes_inline_element() {
        let mut tree = Node::paragraph(vec![Node::TextDirective(
            Directive::new("my-component").with_attribute("foo", Some("bar")),
        )]);
        let count = transform_directives(&mut tree, &Options::default());

        assert_eq!(count, 1);
        assert_eq!(
            tree,
            Node::paragraph(vec![text_node(
                "my-component",
                vec![attr("foo", Some("bar".into()))],
                vec![],
            )])
        );
    }

    #[test]
    fn leaf_directive_keeps_bare_attribute() {
        let mut tree = Node::root(vec![Node::LeafDirective(
            Directive::new("fancy-button").with_attribute("disabled", None),
        )]);
        transform_directives(&mut tree, &Options::default());

        assert_eq!(
            tree,
            Node::root(vec![flow_node(
                "fancy-button",
                vec![attr("disabled", None)],
                vec![],
            )])
        );
    }

    #[test]
    fn attribute_order_survives_renaming() {
        let mut tree = Node::root(vec![Node::LeafDirective(
            Directive::new("chart")
                .with_attribute("data-z", Some("1"))
                .with_attribute("class", Some("wide"))
                .with_attribute("aria-label", Some("Sales")),
        )]);
        let options = Options::new().with_attribute_transform(normalize_attribute(
            Casing::Camel,
            AttributeCasing { class_name: true },
        ));
        transform_directives(&mut tree, &options);

        let element = tree.children().unwrap()[0].as_element().unwrap();
        let names: Vec<&str> = element.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["dataZ", "className", "ariaLabel"]);
    }

    #[test]
    fn missing_attributes_produce_none() {
        let mut tree = Node::root(vec![Node::LeafDirective(Directive::new("hr-line"))]);
        transform_directives(&mut tree, &Options::default());
        assert!(tree.children().unwrap()[0].as_element().unwrap().attributes.is_empty());
    }

    #[test]
    fn nested_directives_lower_in_one_pass() {
        let mut tree = Node::root(vec![Node::ContainerDirective(
            Directive::new("outer").with_children(vec![
                Node::ContainerDirective(Directive::new("inner").with_children(vec![
                    Node::paragraph(vec![Node::TextDirective(Directive::new("badge"))]),
                ])),
            ]),
        )]);
        let count = transform_directives(&mut tree, &Options::default());

        assert_eq!(count, 3);
        assert_eq!(
            tree,
            Node::root(vec![flow_node(
                "outer",
                vec![],
                vec![flow_node(
                    "inner",
                    vec![],
                    vec![Node::paragraph(vec![text_node("badge", vec![], vec![])])],
                )],
            )])
        );
    }

    #[test]
    fn visits_in_document_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        let options = Options::new().with_filter(move |_, directive| {
            log.lock().unwrap().push(directive.name.clone());
            true
        });

        let mut tree = Node::root(vec![
            Node::ContainerDirective(Directive::new("a").with_children(vec![
                Node::LeafDirective(Directive::new("b")),
                Node::paragraph(vec![Node::TextDirective(Directive::new("c"))]),
            ])),
            Node::LeafDirective(Directive::new("d")),
        ]);
        transform_directives(&mut tree, &options);

        assert_eq!(*seen.lock().unwrap(), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn skips_directives_lowered_elsewhere() {
        let lowered = Node::LeafDirective(
            Directive::new("already-transformed").with_data(NodeData::lowered("SomeComponent")),
        );
        let mut tree = Node::root(vec![
            Node::LeafDirective(Directive::new("fancy-button").with_attribute("disabled", Some(""))),
            lowered.clone(),
        ]);
        let count = transform_directives(&mut tree, &Options::default());

        assert_eq!(count, 1);
        assert_eq!(
            tree,
            Node::root(vec![
                flow_node("fancy-button", vec![attr("disabled", Some(String::new()))], vec![]),
                lowered,
            ])
        );
    }

    #[test]
    fn skip_disabled_lowers_everything() {
        let mut tree = Node::root(vec![Node::LeafDirective(
            Directive::new("x").with_data(NodeData::lowered("div")),
        )]);
        assert_eq!(transform_directives(&mut tree, &no_skip()), 1);
        assert!(tree.children().unwrap()[0].as_element().is_some());
    }

    #[test]
    fn null_h_name_counts_as_lowered() {
        let data = NodeData {
            h_name: Some(None),
            ..NodeData::default()
        };
        let mut tree = Node::root(vec![Node::LeafDirective(Directive::new("x").with_data(data))]);
        let before = tree.clone();

        assert_eq!(transform_directives(&mut tree, &Options::default()), 0);
        assert_eq!(tree, before);
    }

    #[test]
    fn directives_under_unknown_nodes_are_lowered() {
        let mut tree = Node::from_json(
            r#"{"type": "root", "children": [
                {"type": "footnoteDefinition", "identifier": "1", "children": [
                    {"type": "paragraph", "children": [{"type": "textDirective", "name": "cite", "children": []}]}
                ]},
                {"type": "mdxjsEsm", "value": "export const a = 1"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(transform_directives(&mut tree, &Options::default()), 1);

        let Node::Other(footnote) = &tree.children().unwrap()[0] else {
            panic!("expected unknown node");
        };
        assert_eq!(footnote.extra["identifier"], "1");
        let paragraph = &footnote.children.as_ref().unwrap()[0];
        assert_eq!(
            paragraph.children().unwrap()[0],
            text_node("cite", vec![], vec![])
        );
    }

    #[test]
    fn filter_leaves_rejected_directive_untouched() {
        let skipped = Node::LeafDirective(Directive::new("skip-me").with_attribute("baz", Some("qux")));
        let mut tree = Node::root(vec![
            Node::LeafDirective(Directive::new("process-me").with_attribute("foo", Some("bar"))),
            skipped.clone(),
        ]);
        let options = no_skip().with_filter(|_, directive| directive.name != "skip-me");
        transform_directives(&mut tree, &options);

        assert_eq!(
            tree,
            Node::root(vec![
                flow_node("process-me", vec![attr("foo", Some("bar".into()))], vec![]),
                skipped,
            ])
        );
    }

    #[test]
    fn filter_sees_directive_kind() {
        let mut tree = Node::paragraph(vec![
            Node::TextDirective(Directive::new("kbd")),
            Node::LeafDirective(Directive::new("kbd")),
        ]);
        let options = Options::new().with_filter(|kind, _| kind == DirectiveKind::Text);
        assert_eq!(transform_directives(&mut tree, &options), 1);
        assert!(matches!(tree.children().unwrap()[1], Node::LeafDirective(_)));
    }

    #[test]
    fn tag_and_attribute_hooks_rename() {
        let mut tree = Node::root(vec![Node::LeafDirective(
            Directive::new("my-directive").with_attribute("foo", Some("bar")),
        )]);
        let options = no_skip()
            .with_tag_transform(|tag| format!("custom-{tag}"))
            .with_attribute_transform(|_tag, attr| format!("data-{attr}"));
        transform_directives(&mut tree, &options);

        assert_eq!(
            tree,
            Node::root(vec![flow_node(
                "custom-my-directive",
                vec![attr("data-foo", Some("bar".into()))],
                vec![],
            )])
        );
    }

    #[test]
    fn attribute_hook_receives_transformed_tag() {
        let mut tree = Node::root(vec![Node::LeafDirective(
            Directive::new("video-player").with_attribute("src", Some("a.mp4")),
        )]);
        let options = Options::new()
            .with_tag_transform(normalize_tag(Casing::Pascal))
            .with_attribute_transform(|tag, attr| format!("{tag}:{attr}"));
        transform_directives(&mut tree, &options);

        let element = tree.children().unwrap()[0].as_element().unwrap();
        assert_eq!(element.name.as_deref(), Some("VideoPlayer"));
        assert_eq!(element.attributes[0].name, "VideoPlayer:src");
    }

    #[test]
    fn label_is_discarded_by_default() {
        let mut tree = note_with_label();
        transform_directives(&mut tree, &Options::default());

        assert_eq!(
            tree,
            Node::root(vec![flow_node(
                "Note",
                vec![],
                vec![Node::paragraph(vec![Node::text("This is an important note.")])],
            )])
        );
    }

    #[test]
    fn label_can_become_trailing_slot() {
        let mut tree = note_with_label();
        let options = Options::new().with_label_handler(label::slot_label);
        transform_directives(&mut tree, &options);

        assert_eq!(
            tree,
            Node::root(vec![flow_node(
                "Note",
                vec![],
                vec![
                    Node::paragraph(vec![Node::text("This is an important note.")]),
                    flow_node(
                        "Fragment",
                        vec![attr("slot", Some("label".into()))],
                        vec![Node::text("Important")],
                    ),
                ],
            )])
        );
    }

    #[test]
    fn label_handler_not_called_without_label() {
        let calls = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&calls);
        let options = Options::new().with_label_handler(move |_, _| *counter.lock().unwrap() += 1);

        let mut tree = Node::root(vec![Node::ContainerDirective(
            Directive::new("box").with_children(vec![Node::paragraph(vec![Node::text("x")])]),
        )]);
        transform_directives(&mut tree, &options);
        assert_eq!(*calls.lock().unwrap(), 0);

        let mut tree = note_with_label();
        transform_directives(&mut tree, &options);
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[test]
    fn leaf_label_like_children_are_kept() {
        let children = vec![Node::label(vec![Node::text("kept")])];
        let mut tree = Node::root(vec![Node::LeafDirective(
            Directive::new("leaf").with_children(children.clone()),
        )]);
        transform_directives(&mut tree, &Options::default());
        assert_eq!(tree.children().unwrap()[0].as_element().unwrap().children, children);
    }

    #[test]
    fn non_directive_nodes_are_untouched() {
        let mut tree = Node::root(vec![
            Node::paragraph(vec![Node::text("plain")]),
            flow_node("Existing", vec![], vec![]),
        ]);
        let before = tree.clone();
        assert_eq!(transform_directives(&mut tree, &Options::default()), 0);
        assert_eq!(tree, before);
    }

    #[test]
    fn lowering_keeps_source_position() {
        use crate::ast::{Point, Position};

        let position = Position {
            start: Point::new(2, 1, Some(10)),
            end: Point::new(2, 12, Some(21)),
        };
        let mut tree = Node::root(vec![Node::LeafDirective(
            Directive::new("embed").with_position(position),
        )]);
        transform_directives(&mut tree, &Options::default());
        assert_eq!(tree.children().unwrap()[0].as_element().unwrap().position, Some(position));
    }

    #[test]
    fn deep_nesting_does_not_recurse() {
        let mut tree = Node::LeafDirective(Directive::new("leaf"));
        for _ in 0..10_000 {
            tree = Node::ContainerDirective(Directive::new("wrap").with_children(vec![tree]));
        }
        let mut tree = Node::root(vec![tree]);
        assert_eq!(transform_directives(&mut tree, &Options::default()), 10_001);
        // Dropping a tree this deep recurses; leak it instead.
        mem::forget(tree);
    }

    #[test]
    #[should_panic(expected = "tag hook failed")]
    fn hook_panic_aborts_the_pass() {
        let mut tree = Node::root(vec![Node::LeafDirective(Directive::new("boom"))]);
        let options = Options::new().with_tag_transform(|_| panic!("tag hook failed"));
        transform_directives(&mut tree, &options);
    }

    #[test]
    fn transformer_reuses_options() {
        let transformer = DirectiveTransformer::new(Options::new().with_skip_transformed(false));
        assert!(!transformer.options().skip_transformed());

        let mut first = Node::root(vec![Node::LeafDirective(Directive::new("one"))]);
        let mut second = Node::root(vec![Node::LeafDirective(Directive::new("two"))]);
        assert_eq!(transformer.transform(&mut first), 1);
        assert_eq!(transformer.transform(&mut second), 1);
        assert_eq!(transformer.transform(&mut second), 0);
    }
}
