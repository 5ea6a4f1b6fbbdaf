#![deny(missing_docs)]
//! Directive to MDX JSX lowering: rewrites `:::container`, `::leaf` and `:text`
//! directive nodes into JSX element nodes so an MDX compiler emits component
//! invocations for them.

/// Document tree model (directives, JSX elements, common mdast nodes).
pub mod ast;
/// JSX element and attribute constructors.
pub mod builder;
/// Tag and attribute name casing.
pub mod casing;
/// Serializable pass configuration.
pub mod config;
/// Core error types.
pub mod error;
/// Container directive label extraction and handlers.
pub mod label;
/// Export to markdown-rs mdast.
pub mod mdast;
/// MDX-like debug printer.
pub mod print;
/// The lowering pass.
pub mod transform;

pub use ast::{
    Attribute, Directive, DirectiveAttributes, DirectiveKind, Element, Fields, Node, NodeData,
    Point, Position, Unknown,
};
pub use casing::{AttributeCasing, Casing, is_html_tag, normalize_attribute, normalize_tag};
pub use config::{LabelMode, TransformConfig};
pub use error::{DirectiveError, SourceLocation};
pub use label::{discard_label, slot_label, take_label};
pub use mdast::to_mdast;
pub use print::to_mdx;
pub use transform::{DirectiveTransformer, Options, transform_directives};
