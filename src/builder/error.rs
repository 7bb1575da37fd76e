//! Builder construction errors

use thiserror::Error;

/// Errors raised while constructing a [`TreeBuilder`](crate::builder::TreeBuilder).
///
/// Errors from building elements belong to the backend and are passed through
/// unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("not a backend: expected {expected}")]
    NotABackend { expected: &'static str },
}

/// Result type for builder construction.
pub type BuildResult<T> = Result<T, BuildError>;
