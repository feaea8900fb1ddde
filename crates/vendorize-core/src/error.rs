//! Error types for the tree engine.

use std::path::PathBuf;

use crate::tree::NodeKind;

/// Result type alias for tree operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, mutating or transforming a tree.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The node handle is stale (its node was freed by [`Tree::compact`](crate::Tree::compact)).
    #[error("Invalid or freed node handle")]
    InvalidNode,

    /// Attempted to add a node under itself or one of its descendants.
    #[error("Cannot add a node as a child of itself or of its descendants")]
    CircularParentage,

    /// Text parse error reported by the syntax.
    #[error("Parse error at line {line}, column {column}: {message}")]
    Parse {
        message: String,
        line: u32,
        column: u32,
    },

    /// Parsed text did not yield a node of the requested kind.
    #[error("Cannot create {kind} node from text: {message}")]
    Create { kind: NodeKind, message: String },

    /// File I/O error.
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration could not be decoded.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Create a parse error.
    pub fn parse(message: impl Into<String>, line: u32, column: u32) -> Self {
        Self::Parse {
            message: message.into(),
            line,
            column,
        }
    }

    /// Create a node creation error.
    pub fn create(kind: NodeKind, message: impl Into<String>) -> Self {
        Self::Create {
            kind,
            message: message.into(),
        }
    }

    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
