//! Constructors for JSX element nodes and their attributes.

use crate::ast::{Attribute, Element, Node, NodeData};

/// Make an attribute record from a name and literal value.
pub fn attr(name: impl Into<String>, value: Option<String>) -> Attribute {
    Attribute {
        name: name.into(),
        value,
    }
}

/// Make attribute records from name/value pairs, keeping their order.
pub fn attrs<I, K>(pairs: I) -> Vec<Attribute>
where
    I: IntoIterator<Item = (K, Option<String>)>,
    K: Into<String>,
{
    pairs
        .into_iter()
        .map(|(name, value)| attr(name, value))
        .collect()
}

fn element(name: Option<String>, attributes: Vec<Attribute>, children: Vec<Node>) -> Element {
    Element {
        name,
        attributes,
        children,
        data: Some(NodeData::explicit_jsx()),
        ..Element::default()
    }
}

/// Make a block-level element.
pub fn flow(name: impl Into<String>, attributes: Vec<Attribute>, children: Vec<Node>) -> Element {
    element(Some(name.into()), attributes, children)
}

/// Make an inline element.
pub fn text(name: impl Into<String>, attributes: Vec<Attribute>, children: Vec<Node>) -> Element {
    element(Some(name.into()), attributes, children)
}

/// Make a block-level element node.
pub fn flow_node(name: impl Into<String>, attributes: Vec<Attribute>, children: Vec<Node>) -> Node {
    Node::MdxJsxFlowElement(flow(name, attributes, children))
}

/// Make an inline element node.
pub fn text_node(name: impl Into<String>, attributes: Vec<Attribute>, children: Vec<Node>) -> Node {
    Node::MdxJsxTextElement(text(name, attributes, children))
}
