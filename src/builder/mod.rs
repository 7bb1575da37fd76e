//! Builder core: content normalization and name-driven element construction
//!
//! Independent of any concrete backend; backends plug in through [`Backend`].

pub mod backend;
pub mod content;
pub mod error;
pub mod normalize;
pub mod tree_builder;

pub use backend::{Backend, Embedded};
pub use content::{mapping, Attributes, Child, Content, ContentKind, Mapping, Scalar};
pub use error::{BuildError, BuildResult};
pub use normalize::{normalize, normalize_all, normalize_children};
pub use tree_builder::{ElementConstructor, TreeBuilder};
