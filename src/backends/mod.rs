//! Bundled backends: an arena DOM and a markup string renderer
//!
//! Both implement [`Backend`](crate::builder::Backend) and share escaping and
//! name checks.

pub mod dom;
pub mod error;
pub mod escape;
pub mod markup;

pub use dom::{Document, DomBackend, NodeData, NodeId, TreeDisplay};
pub use error::{BackendError, BackendResult};
pub use markup::{Markup, MarkupBackend};
