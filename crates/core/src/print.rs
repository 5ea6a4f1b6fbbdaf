//! Compact MDX-like rendering of a tree, for logs and snapshot tests.
//!
//! Elements print as JSX tags and unlowered directives in their `:::`/`::`/`:`
//! syntax. Block children are indented two spaces per level. This is a
//! debugging view, not a compiler: only `"` in attribute values is escaped.

use crate::ast::{Attribute, Directive, DirectiveAttributes, Element, Node};

/// Renders `node` as MDX-like text.
pub fn to_mdx(node: &Node) -> String {
    block(node)
}

fn block(node: &Node) -> String {
    match node {
        Node::Root(p) => blocks(&p.children),
        Node::Paragraph(p) => inline(&p.children),
        Node::Heading(h) => format!("{} {}", "#".repeat(h.depth as usize), inline(&h.children)),
        Node::Blockquote(p) => prefix_lines(&blocks(&p.children), "> "),
        Node::List(list) => {
            let mut number = list.start.unwrap_or(1);
            let items: Vec<String> = list
                .children
                .iter()
                .map(|item| {
                    let marker = if list.ordered {
                        let marker = format!("{number}. ");
                        number += 1;
                        marker
                    } else {
                        "- ".to_string()
                    };
                    let body = block(item);
                    let continuation = " ".repeat(marker.len());
                    let mut lines = body.lines();
                    let first = lines.next().unwrap_or_default();
                    let rest: Vec<String> = lines
                        .map(|line| {
                            if line.is_empty() {
                                String::new()
                            } else {
                                format!("{continuation}{line}")
                            }
                        })
                        .collect();
                    std::iter::once(format!("{marker}{first}"))
                        .chain(rest)
                        .collect::<Vec<_>>()
                        .join("\n")
                })
                .collect();
            items.join("\n")
        }
        Node::ListItem(item) => blocks(&item.children),
        Node::Code(code) => format!(
            "```{}{}\n{}\n```",
            code.lang.as_deref().unwrap_or_default(),
            code.meta.as_deref().map(|m| format!(" {m}")).unwrap_or_default(),
            code.value
        ),
        Node::Html(html) => html.value.clone(),
        Node::ThematicBreak(_) => "---".to_string(),
        Node::ContainerDirective(d) => container_directive(d),
        Node::LeafDirective(d) => short_directive("::", d),
        Node::MdxJsxFlowElement(e) => flow_element(e),
        Node::Other(other) => match &other.children {
            Some(children) => blocks(children),
            None => format!("{{/* {} */}}", other.kind),
        },
        _ => inline(std::slice::from_ref(node)),
    }
}

fn blocks(children: &[Node]) -> String {
    children.iter().map(block).collect::<Vec<_>>().join("\n")
}

fn inline(children: &[Node]) -> String {
    let mut out = String::new();
    for child in children {
        match child {
            Node::Text(t) => out.push_str(&t.value),
            Node::Emphasis(p) => out.push_str(&format!("_{}_", inline(&p.children))),
            Node::Strong(p) => out.push_str(&format!("**{}**", inline(&p.children))),
            Node::Delete(p) => out.push_str(&format!("~~{}~~", inline(&p.children))),
            Node::InlineCode(t) => out.push_str(&format!("`{}`", t.value)),
            Node::Link(l) => {
                let title = l
                    .title
                    .as_deref()
                    .map(|t| format!(" \"{t}\""))
                    .unwrap_or_default();
                out.push_str(&format!("[{}]({}{})", inline(&l.children), l.url, title));
            }
            Node::Break(_) => out.push_str("\\\n"),
            Node::TextDirective(d) => out.push_str(&short_directive(":", d)),
            Node::MdxJsxTextElement(e) => out.push_str(&text_element(e)),
            other => out.push_str(&block(other)),
        }
    }
    out
}

fn indent(text: &str) -> String {
    prefix_lines(text, "  ")
}

fn prefix_lines(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                prefix.trim_end().to_string()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn jsx_attributes(attributes: &[Attribute]) -> String {
    let mut out = String::new();
    for attr in attributes {
        out.push(' ');
        out.push_str(&attr.name);
        if let Some(value) = &attr.value {
            out.push_str(&format!("=\"{}\"", value.replace('"', "&quot;")));
        }
    }
    out
}

fn open_tag(element: &Element) -> String {
    format!(
        "<{}{}",
        element.name.as_deref().unwrap_or_default(),
        jsx_attributes(&element.attributes)
    )
}

fn close_tag(element: &Element) -> String {
    format!("</{}>", element.name.as_deref().unwrap_or_default())
}

fn flow_element(element: &Element) -> String {
    if element.children.is_empty() {
        return format!("{} />", open_tag(element));
    }
    format!(
        "{}>\n{}\n{}",
        open_tag(element),
        indent(&blocks(&element.children)),
        close_tag(element)
    )
}

fn text_element(element: &Element) -> String {
    if element.children.is_empty() {
        return format!("{} />", open_tag(element));
    }
    format!(
        "{}>{}{}",
        open_tag(element),
        inline(&element.children),
        close_tag(element)
    )
}

fn directive_attributes(attributes: Option<&DirectiveAttributes>) -> String {
    let Some(attributes) = attributes.filter(|a| !a.is_empty()) else {
        return String::new();
    };
    let parts: Vec<String> = attributes
        .iter()
        .map(|(name, value)| match value {
            Some(value) => format!("{}=\"{}\"", name, value.replace('"', "&quot;")),
            None => name.clone(),
        })
        .collect();
    format!("{{{}}}", parts.join(" "))
}

fn short_directive(marker: &str, directive: &Directive) -> String {
    let label = if directive.children.is_empty() {
        String::new()
    } else {
        format!("[{}]", inline(&directive.children))
    };
    format!(
        "{}{}{}{}",
        marker,
        directive.name,
        label,
        directive_attributes(directive.attributes.as_ref())
    )
}

fn container_directive(directive: &Directive) -> String {
    let (label, body): (Vec<&Node>, Vec<&Node>) =
        directive.children.iter().partition(|child| child.is_label());
    let label = label
        .first()
        .and_then(|node| node.children())
        .map(|children| format!("[{}]", inline(children)))
        .unwrap_or_default();
    let body: Vec<String> = body.into_iter().map(block).collect();

    let mut out = format!(
        ":::{}{}{}",
        directive.name,
        label,
        directive_attributes(directive.attributes.as_ref())
    );
    if !body.is_empty() {
        out.push('\n');
        out.push_str(&body.join("\n"));
    }
    out.push_str("\n:::");
    out
}
