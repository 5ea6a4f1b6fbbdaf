//! Document tree model shared by the directive parser output and the JSX output.
//!
//! The shapes mirror mdast JSON (`type` tag, camelCase names) so trees produced
//! by JavaScript directive parsers can be decoded directly with [`Node::from_json`].

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::DirectiveError;

/// Ordered directive attributes; `None` values mean "present without value".
pub type DirectiveAttributes = IndexMap<String, Option<String>>;

/// The three directive syntaxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveKind {
    /// `:::name` block with children and an optional label.
    Container,
    /// `::name` block, usually childless.
    Leaf,
    /// `:name` inline directive.
    Text,
}

impl DirectiveKind {
    /// Lowercase kind name used in logs and errors.
    pub fn as_str(self) -> &'static str {
        match self {
            DirectiveKind::Container => "container",
            DirectiveKind::Leaf => "leaf",
            DirectiveKind::Text => "text",
        }
    }
}

impl std::fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A point in the source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    /// Line (1-indexed).
    pub line: usize,
    /// Column (1-indexed).
    pub column: usize,
    /// Byte offset (0-indexed), when the parser recorded one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
}

impl Point {
    /// Creates a point.
    pub fn new(line: usize, column: usize, offset: Option<usize>) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

/// Source span of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Start of the span.
    pub start: Point,
    /// End of the span.
    pub end: Point,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Maps a present key to `Some`, even when its value is `null`.
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Extra JSON fields of a node, kept verbatim.
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// Per-node metadata used for signaling between passes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    /// Target element name set by passes that already lowered the node for HTML output.
    ///
    /// The outer `Option` records whether the key is present at all, so an
    /// explicit `"hName": null` still counts as lowered and survives re-encoding.
    #[serde(
        rename = "hName",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub h_name: Option<Option<String>>,
    /// Marks the first paragraph of a container directive as its label.
    #[serde(rename = "directiveLabel", default, skip_serializing_if = "is_false")]
    pub directive_label: bool,
    /// Marks elements authored explicitly rather than inferred by later stages.
    #[serde(rename = "_mdxExplicitJsx", default, skip_serializing_if = "is_false")]
    pub mdx_explicit_jsx: bool,
    /// Any other keys, kept verbatim.
    #[serde(flatten)]
    pub extra: Fields,
}

impl NodeData {
    /// Data for a label paragraph.
    pub fn label() -> Self {
        Self {
            directive_label: true,
            ..Self::default()
        }
    }

    /// Data for an explicitly authored JSX element.
    pub fn explicit_jsx() -> Self {
        Self {
            mdx_explicit_jsx: true,
            ..Self::default()
        }
    }

    /// Data for a node another pass already lowered to `h_name`.
    pub fn lowered(h_name: impl Into<String>) -> Self {
        Self {
            h_name: Some(Some(h_name.into())),
            ..Self::default()
        }
    }

    /// Whether another pass already lowered this node.
    pub fn is_lowered(&self) -> bool {
        self.h_name.is_some()
    }
}

/// Generic parent node (root, paragraph, blockquote, emphasis, strong, delete).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parent {
    /// Child nodes.
    #[serde(default)]
    pub children: Vec<Node>,
    /// Node metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<NodeData>,
    /// Source span.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    /// Fields this model has no slot for.
    #[serde(flatten)]
    pub extra: Fields,
}

/// Section heading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    /// Rank (1-6).
    pub depth: u8,
    /// Inline content.
    #[serde(default)]
    pub children: Vec<Node>,
    /// Node metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<NodeData>,
    /// Source span.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    /// Fields this model has no slot for.
    #[serde(flatten)]
    pub extra: Fields,
}

/// Ordered or unordered list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct List {
    /// Whether items are numbered.
    #[serde(default)]
    pub ordered: bool,
    /// Starting number of an ordered list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<u32>,
    /// Whether items are separated by blank lines.
    #[serde(default)]
    pub spread: bool,
    /// List items.
    #[serde(default)]
    pub children: Vec<Node>,
    /// Node metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<NodeData>,
    /// Source span.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    /// Fields this model has no slot for.
    #[serde(flatten)]
    pub extra: Fields,
}

/// Item of a list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    /// Whether the item contains blank lines.
    #[serde(default)]
    pub spread: bool,
    /// Task list state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    /// Block content.
    #[serde(default)]
    pub children: Vec<Node>,
    /// Node metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<NodeData>,
    /// Source span.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    /// Fields this model has no slot for.
    #[serde(flatten)]
    pub extra: Fields,
}

/// Hyperlink.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Destination.
    pub url: String,
    /// Advisory title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Inline content.
    #[serde(default)]
    pub children: Vec<Node>,
    /// Node metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<NodeData>,
    /// Source span.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    /// Fields this model has no slot for.
    #[serde(flatten)]
    pub extra: Fields,
}

/// Leaf node carrying a string value (text, inline code, raw html).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Literal {
    /// Content.
    pub value: String,
    /// Node metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<NodeData>,
    /// Source span.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    /// Fields this model has no slot for.
    #[serde(flatten)]
    pub extra: Fields,
}

/// Fenced or indented code block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Code {
    /// Language from the info string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    /// Rest of the info string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<String>,
    /// Code content.
    pub value: String,
    /// Node metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<NodeData>,
    /// Source span.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    /// Fields this model has no slot for.
    #[serde(flatten)]
    pub extra: Fields,
}

/// Node without content (hard break, thematic break).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Void {
    /// Node metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<NodeData>,
    /// Source span.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    /// Fields this model has no slot for.
    #[serde(flatten)]
    pub extra: Fields,
}

/// A directive as produced by the upstream directive parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Directive {
    /// Name chosen by the author.
    pub name: String,
    /// Attributes in authored order; missing means none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<DirectiveAttributes>,
    /// Child nodes (block content for containers, inline content otherwise).
    #[serde(default)]
    pub children: Vec<Node>,
    /// Node metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<NodeData>,
    /// Source span.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    /// Fields this model has no slot for.
    #[serde(flatten)]
    pub extra: Fields,
}

impl Directive {
    /// Creates a directive with no attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: None,
            children: Vec::new(),
            data: None,
            position: None,
            extra: Fields::new(),
        }
    }

    /// Appends an attribute, keeping insertion order.
    pub fn with_attribute(mut self, name: impl Into<String>, value: Option<&str>) -> Self {
        self.attributes
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), value.map(str::to_string));
        self
    }

    /// Replaces the children.
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// Replaces the metadata.
    pub fn with_data(mut self, data: NodeData) -> Self {
        self.data = Some(data);
        self
    }

    /// Sets the source span.
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Whether another pass already lowered this directive.
    pub fn is_lowered(&self) -> bool {
        self.data.as_ref().is_some_and(NodeData::is_lowered)
    }
}

/// A single JSX attribute; values are always literal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "mdxJsxAttribute")]
pub struct Attribute {
    /// Attribute name.
    pub name: String,
    /// Literal value, `None` for a bare attribute.
    #[serde(default)]
    pub value: Option<String>,
}

/// A JSX element, block-level or inline depending on the enclosing [`Node`] variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Element name, `None` for a fragment.
    #[serde(default)]
    pub name: Option<String>,
    /// Attributes in output order.
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    /// Child nodes.
    #[serde(default)]
    pub children: Vec<Node>,
    /// Node metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<NodeData>,
    /// Source span, carried over from the directive it replaced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    /// Fields this model has no slot for.
    #[serde(flatten)]
    pub extra: Fields,
}

impl Element {
    /// Whether the element was authored explicitly.
    pub fn is_explicit(&self) -> bool {
        self.data.as_ref().is_some_and(|data| data.mdx_explicit_jsx)
    }
}

/// A node of the document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    /// Document root.
    Root(Parent),
    /// Paragraph.
    Paragraph(Parent),
    /// Heading.
    Heading(Heading),
    /// Block quote.
    Blockquote(Parent),
    /// List.
    List(List),
    /// List item.
    ListItem(ListItem),
    /// Emphasis.
    Emphasis(Parent),
    /// Strong emphasis.
    Strong(Parent),
    /// Strikethrough.
    Delete(Parent),
    /// Link.
    Link(Link),
    /// Text.
    Text(Literal),
    /// Inline code.
    InlineCode(Literal),
    /// Code block.
    Code(Code),
    /// Raw HTML.
    Html(Literal),
    /// Hard line break.
    Break(Void),
    /// Thematic break.
    ThematicBreak(Void),
    /// `:::name` container directive.
    ContainerDirective(Directive),
    /// `::name` leaf directive.
    LeafDirective(Directive),
    /// `:name` text directive.
    TextDirective(Directive),
    /// Block-level JSX element.
    MdxJsxFlowElement(Element),
    /// Inline JSX element.
    MdxJsxTextElement(Element),
    /// Any other node type (tables, images, footnotes, MDX expressions).
    #[serde(untagged)]
    Other(Unknown),
}

/// `type` names with a dedicated [`Node`] variant.
const NODE_TYPES: &[&str] = &[
    "root",
    "paragraph",
    "heading",
    "blockquote",
    "list",
    "listItem",
    "emphasis",
    "strong",
    "delete",
    "link",
    "text",
    "inlineCode",
    "code",
    "html",
    "break",
    "thematicBreak",
    "containerDirective",
    "leafDirective",
    "textDirective",
    "mdxJsxFlowElement",
    "mdxJsxTextElement",
];

/// A node of a type this model has no dedicated shape for.
///
/// Every field is kept verbatim. Children, when present, are still walked, so
/// directives inside table cells or footnotes are lowered like any other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawUnknown")]
pub struct Unknown {
    /// The node's `type` name.
    #[serde(rename = "type")]
    pub kind: String,
    /// Child nodes, for parent types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Node>>,
    /// Node metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<NodeData>,
    /// All remaining fields (`position`, `url`, `value`, ...).
    #[serde(flatten)]
    pub extra: Fields,
}

// Children stay raw until the type is checked, so a malformed known node
// fails once instead of once per fallback attempt up the tree.
#[derive(Deserialize)]
struct RawUnknown {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    children: Option<serde_json::Value>,
    #[serde(default)]
    data: Option<NodeData>,
    #[serde(flatten)]
    extra: Fields,
}

impl TryFrom<RawUnknown> for Unknown {
    type Error = String;

    // A known type only lands here when its own shape failed to decode.
    fn try_from(raw: RawUnknown) -> Result<Self, Self::Error> {
        if NODE_TYPES.contains(&raw.kind.as_str()) {
            return Err(format!("malformed `{}` node", raw.kind));
        }
        let children = raw
            .children
            .map(serde_json::from_value::<Vec<Node>>)
            .transpose()
            .map_err(|err| err.to_string())?;
        Ok(Self {
            kind: raw.kind,
            children,
            data: raw.data,
            extra: raw.extra,
        })
    }
}

impl Node {
    /// Root node.
    pub fn root(children: Vec<Node>) -> Self {
        Node::Root(Parent {
            children,
            ..Parent::default()
        })
    }

    /// Paragraph node.
    pub fn paragraph(children: Vec<Node>) -> Self {
        Node::Paragraph(Parent {
            children,
            ..Parent::default()
        })
    }

    /// Paragraph flagged as a container directive's label.
    pub fn label(children: Vec<Node>) -> Self {
        Node::Paragraph(Parent {
            children,
            data: Some(NodeData::label()),
            ..Parent::default()
        })
    }

    /// Text node.
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text(Literal {
            value: value.into(),
            ..Literal::default()
        })
    }

    /// Kind of directive this node is, if any.
    pub fn directive_kind(&self) -> Option<DirectiveKind> {
        match self {
            Node::ContainerDirective(_) => Some(DirectiveKind::Container),
            Node::LeafDirective(_) => Some(DirectiveKind::Leaf),
            Node::TextDirective(_) => Some(DirectiveKind::Text),
            _ => None,
        }
    }

    /// The directive payload, if this is a directive node.
    pub fn as_directive(&self) -> Option<&Directive> {
        match self {
            Node::ContainerDirective(d) | Node::LeafDirective(d) | Node::TextDirective(d) => {
                Some(d)
            }
            _ => None,
        }
    }

    /// Mutable directive payload, if this is a directive node.
    pub fn as_directive_mut(&mut self) -> Option<&mut Directive> {
        match self {
            Node::ContainerDirective(d) | Node::LeafDirective(d) | Node::TextDirective(d) => {
                Some(d)
            }
            _ => None,
        }
    }

    /// The element payload, if this is a JSX element node.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::MdxJsxFlowElement(e) | Node::MdxJsxTextElement(e) => Some(e),
            _ => None,
        }
    }

    /// Child nodes, for node kinds that have them.
    pub fn children(&self) -> Option<&Vec<Node>> {
        match self {
            Node::Root(p)
            | Node::Paragraph(p)
            | Node::Blockquote(p)
            | Node::Emphasis(p)
            | Node::Strong(p)
            | Node::Delete(p) => Some(&p.children),
            Node::Heading(h) => Some(&h.children),
            Node::List(l) => Some(&l.children),
            Node::ListItem(i) => Some(&i.children),
            Node::Link(l) => Some(&l.children),
            Node::ContainerDirective(d) | Node::LeafDirective(d) | Node::TextDirective(d) => {
                Some(&d.children)
            }
            Node::MdxJsxFlowElement(e) | Node::MdxJsxTextElement(e) => Some(&e.children),
            Node::Other(u) => u.children.as_ref(),
            Node::Text(_)
            | Node::InlineCode(_)
            | Node::Code(_)
            | Node::Html(_)
            | Node::Break(_)
            | Node::ThematicBreak(_) => None,
        }
    }

    /// Mutable child nodes, for node kinds that have them.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Root(p)
            | Node::Paragraph(p)
            | Node::Blockquote(p)
            | Node::Emphasis(p)
            | Node::Strong(p)
            | Node::Delete(p) => Some(&mut p.children),
            Node::Heading(h) => Some(&mut h.children),
            Node::List(l) => Some(&mut l.children),
            Node::ListItem(i) => Some(&mut i.children),
            Node::Link(l) => Some(&mut l.children),
            Node::ContainerDirective(d) | Node::LeafDirective(d) | Node::TextDirective(d) => {
                Some(&mut d.children)
            }
            Node::MdxJsxFlowElement(e) | Node::MdxJsxTextElement(e) => Some(&mut e.children),
            Node::Other(u) => u.children.as_mut(),
            Node::Text(_)
            | Node::InlineCode(_)
            | Node::Code(_)
            | Node::Html(_)
            | Node::Break(_)
            | Node::ThematicBreak(_) => None,
        }
    }

    /// Node metadata, if any.
    pub fn data(&self) -> Option<&NodeData> {
        match self {
            Node::Root(p)
            | Node::Paragraph(p)
            | Node::Blockquote(p)
            | Node::Emphasis(p)
            | Node::Strong(p)
            | Node::Delete(p) => p.data.as_ref(),
            Node::Heading(h) => h.data.as_ref(),
            Node::List(l) => l.data.as_ref(),
            Node::ListItem(i) => i.data.as_ref(),
            Node::Link(l) => l.data.as_ref(),
            Node::Text(l) | Node::InlineCode(l) | Node::Html(l) => l.data.as_ref(),
            Node::Code(c) => c.data.as_ref(),
            Node::Break(v) | Node::ThematicBreak(v) => v.data.as_ref(),
            Node::ContainerDirective(d) | Node::LeafDirective(d) | Node::TextDirective(d) => {
                d.data.as_ref()
            }
            Node::MdxJsxFlowElement(e) | Node::MdxJsxTextElement(e) => e.data.as_ref(),
            Node::Other(u) => u.data.as_ref(),
        }
    }

    /// Whether this node is flagged as a container directive's label.
    pub fn is_label(&self) -> bool {
        self.data().is_some_and(|data| data.directive_label)
    }

    /// Overwrites this node's contents in place, returning the previous contents.
    ///
    /// Whoever holds this node (a parent's children vector, a caller's `&mut`)
    /// observes the new contents without rebuilding the tree.
    pub fn replace_with(&mut self, replacement: Node) -> Node {
        std::mem::replace(self, replacement)
    }

    /// Decodes an mdast-shaped JSON tree.
    pub fn from_json(json: &str) -> Result<Self, DirectiveError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encodes the tree as mdast-shaped JSON.
    pub fn to_json(&self) -> Result<String, DirectiveError> {
        Ok(serde_json::to_string(self)?)
    }
}
