use thiserror::Error;

use crate::ast::{DirectiveKind, Position};

/// Source location information for error reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Start of the given position, falling back to 1:1 for generated nodes.
    pub fn from_position(position: Option<&Position>) -> Self {
        match position {
            Some(position) => Self::new(position.start.line, position.start.column),
            None => Self::new(1, 1),
        }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Errors raised at the boundaries of the directive lowering pass.
///
/// The traversal itself never fails; these come from decoding trees and
/// configuration, or from exporting a tree markdown-rs cannot represent.
#[derive(Debug, Error)]
pub enum DirectiveError {
    /// Tree or configuration JSON could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// A directive survived the pass and cannot be expressed downstream.
    #[error("Unlowered {kind} directive `{name}` at {location}")]
    UnloweredDirective {
        /// Directive kind
        kind: DirectiveKind,
        /// Directive name as authored
        name: String,
        /// Source location
        location: SourceLocation,
    },
    /// A node type with no markdown-rs counterpart was asked to be exported.
    #[error("Unsupported node type `{0}`")]
    UnsupportedNode(String),
    /// Casing mode name not recognized.
    #[error("Unknown casing mode: {0}")]
    UnknownCasing(String),
}

impl DirectiveError {
    /// Create an unlowered directive error from a node's position
    pub fn unlowered(
        kind: DirectiveKind,
        name: impl Into<String>,
        position: Option<&Position>,
    ) -> Self {
        Self::UnloweredDirective {
            kind,
            name: name.into(),
            location: SourceLocation::from_position(position),
        }
    }
}
