//! Export to markdown-rs mdast for MDX compilers built on the `markdown` crate.
//!
//! markdown-rs has no directive nodes, so a directive still present after the
//! lowering pass (skipped or filtered out) is reported as an error. Node types
//! this crate keeps only as raw JSON are dropped with a warning.

use markdown::mdast;
use markdown::unist;

use crate::DirectiveError;
use crate::ast::{Attribute, Directive, DirectiveKind, Element, Node, Position};

/// Converts a lowered tree into a markdown-rs mdast tree.
pub fn to_mdast(node: &Node) -> Result<mdast::Node, DirectiveError> {
    let converted = match node {
        Node::Root(p) => mdast::Node::Root(mdast::Root {
            children: convert_children(&p.children)?,
            position: convert_position(p.position.as_ref()),
        }),
        Node::Paragraph(p) => mdast::Node::Paragraph(mdast::Paragraph {
            children: convert_children(&p.children)?,
            position: convert_position(p.position.as_ref()),
        }),
        Node::Heading(h) => mdast::Node::Heading(mdast::Heading {
            children: convert_children(&h.children)?,
            position: convert_position(h.position.as_ref()),
            depth: h.depth,
        }),
        Node::Blockquote(p) => mdast::Node::Blockquote(mdast::Blockquote {
            children: convert_children(&p.children)?,
            position: convert_position(p.position.as_ref()),
        }),
        Node::List(l) => mdast::Node::List(mdast::List {
            children: convert_children(&l.children)?,
            position: convert_position(l.position.as_ref()),
            ordered: l.ordered,
            start: l.start,
            spread: l.spread,
        }),
        Node::ListItem(i) => mdast::Node::ListItem(mdast::ListItem {
            children: convert_children(&i.children)?,
            position: convert_position(i.position.as_ref()),
            spread: i.spread,
            checked: i.checked,
        }),
        Node::Emphasis(p) => mdast::Node::Emphasis(mdast::Emphasis {
            children: convert_children(&p.children)?,
            position: convert_position(p.position.as_ref()),
        }),
        Node::Strong(p) => mdast::Node::Strong(mdast::Strong {
            children: convert_children(&p.children)?,
            position: convert_position(p.position.as_ref()),
        }),
        Node::Delete(p) => mdast::Node::Delete(mdast::Delete {
            children: convert_children(&p.children)?,
            position: convert_position(p.position.as_ref()),
        }),
        Node::Link(l) => mdast::Node::Link(mdast::Link {
            children: convert_children(&l.children)?,
            position: convert_position(l.position.as_ref()),
            url: l.url.clone(),
            title: l.title.clone(),
        }),
        Node::Text(t) => mdast::Node::Text(mdast::Text {
            value: t.value.clone(),
            position: convert_position(t.position.as_ref()),
        }),
        Node::InlineCode(t) => mdast::Node::InlineCode(mdast::InlineCode {
            value: t.value.clone(),
            position: convert_position(t.position.as_ref()),
        }),
        Node::Code(c) => mdast::Node::Code(mdast::Code {
            value: c.value.clone(),
            position: convert_position(c.position.as_ref()),
            lang: c.lang.clone(),
            meta: c.meta.clone(),
        }),
        Node::Html(t) => mdast::Node::Html(mdast::Html {
            value: t.value.clone(),
            position: convert_position(t.position.as_ref()),
        }),
        Node::Break(v) => mdast::Node::Break(mdast::Break {
            position: convert_position(v.position.as_ref()),
        }),
        Node::ThematicBreak(v) => mdast::Node::ThematicBreak(mdast::ThematicBreak {
            position: convert_position(v.position.as_ref()),
        }),
        Node::ContainerDirective(d) => return Err(unlowered(DirectiveKind::Container, d)),
        Node::LeafDirective(d) => return Err(unlowered(DirectiveKind::Leaf, d)),
        Node::TextDirective(d) => return Err(unlowered(DirectiveKind::Text, d)),
        Node::MdxJsxFlowElement(e) => mdast::Node::MdxJsxFlowElement(convert_flow(e)?),
        Node::MdxJsxTextElement(e) => mdast::Node::MdxJsxTextElement(convert_text(e)?),
        Node::Other(other) => return Err(DirectiveError::UnsupportedNode(other.kind.clone())),
    };
    Ok(converted)
}

fn unlowered(kind: DirectiveKind, directive: &Directive) -> DirectiveError {
    DirectiveError::unlowered(kind, &directive.name, directive.position.as_ref())
}

fn convert_children(children: &[Node]) -> Result<Vec<mdast::Node>, DirectiveError> {
    children
        .iter()
        .filter(|child| match child {
            Node::Other(other) => {
                log::warn!("Dropping unsupported `{}` node from mdast export", other.kind);
                false
            }
            _ => true,
        })
        .map(to_mdast)
        .collect()
}

fn convert_flow(element: &Element) -> Result<mdast::MdxJsxFlowElement, DirectiveError> {
    Ok(mdast::MdxJsxFlowElement {
        children: convert_children(&element.children)?,
        position: convert_position(element.position.as_ref()),
        name: element.name.clone(),
        attributes: convert_attributes(&element.attributes),
    })
}

fn convert_text(element: &Element) -> Result<mdast::MdxJsxTextElement, DirectiveError> {
    Ok(mdast::MdxJsxTextElement {
        children: convert_children(&element.children)?,
        position: convert_position(element.position.as_ref()),
        name: element.name.clone(),
        attributes: convert_attributes(&element.attributes),
    })
}

fn convert_attributes(attributes: &[Attribute]) -> Vec<mdast::AttributeContent> {
    attributes
        .iter()
        .map(|attr| {
            mdast::AttributeContent::Property(mdast::MdxJsxAttribute {
                name: attr.name.clone(),
                value: attr.value.clone().map(mdast::AttributeValue::Literal),
            })
        })
        .collect()
}

fn convert_position(position: Option<&Position>) -> Option<unist::Position> {
    position.map(|position| unist::Position {
        start: unist::Point {
            line: position.start.line,
            column: position.start.column,
            offset: position.start.offset.unwrap_or_default(),
        },
        end: unist::Point {
            line: position.end.line,
            column: position.end.column,
            offset: position.end.offset.unwrap_or_default(),
        },
    })
}
