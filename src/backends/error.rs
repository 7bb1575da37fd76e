//! Errors raised by the bundled backends

use thiserror::Error;

use crate::backends::dom::NodeId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("invalid name: {0:?}")]
    InvalidName(String),

    #[error("unsupported content: {0}")]
    UnsupportedContent(String),

    #[error("unknown node: {0}")]
    UnknownNode(NodeId),

    #[error("node {0} cannot be appended to its own descendant")]
    HierarchyCycle(NodeId),

    #[error("document is borrowed; release it before building")]
    DocumentBorrowed,
}

/// Result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;
