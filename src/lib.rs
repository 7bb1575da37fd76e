//! Build element trees from loosely-typed, nested content.
//!
//! Content (text, scalars, attribute mappings, nested sequences, lazy iterators,
//! thunks and already built nodes) is normalized into a children list and an
//! attributes map, then handed to a pluggable [`Backend`](builder::Backend).
//!
//! ```ignore
//! use markup_builder::builder::{Content, TreeBuilder};
//! use markup_builder::content;
//!
//! let html = TreeBuilder::markup();
//! let title = html.make("h1").call(content!["Hello"])?;
//! let page = html.make("body").build(
//!     content![Content::node(title), Content::attrs([("class", "main")])],
//!     [("lang", "en")],
//! )?;
//! assert_eq!(page.as_str(), r#"<body class="main" lang="en"><h1>Hello</h1></body>"#);
//! ```

pub mod backends;
pub mod builder;
pub mod config;
pub mod util;

pub use backends::{BackendError, DomBackend, Markup, MarkupBackend, NodeId};
pub use builder::{
    Attributes, Backend, BuildError, Child, Content, ElementConstructor, Embedded, Mapping, Scalar,
    TreeBuilder,
};
pub use config::Settings;
