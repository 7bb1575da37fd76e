//! Name-driven element construction on top of a [`Backend`].

use std::any::{type_name, Any};

use tracing::{debug, instrument};

use crate::builder::backend::{Backend, Embedded};
use crate::builder::content::{Attributes, Content, Scalar};
use crate::builder::error::{BuildError, BuildResult};
use crate::builder::normalize::{normalize, normalize_children};

/// Builds elements by name and delegates their materialization to a backend.
///
/// Holds no tree state: everything built lives in whatever the backend returns.
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder<B> {
    backend: B,
}

impl<B: Backend> TreeBuilder<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Construct from a dynamically typed value, checking that it is a `B`.
    pub fn try_from_any(value: Box<dyn Any>) -> BuildResult<Self>
    where
        B: 'static,
    {
        match value.downcast::<B>() {
            Ok(backend) => Ok(Self::new(*backend)),
            Err(_) => {
                debug!("try_from_any: value is not a {}", type_name::<B>());
                Err(BuildError::NotABackend {
                    expected: type_name::<B>(),
                })
            }
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Constructor for elements named `name`.
    pub fn make(&self, name: impl Into<String>) -> ElementConstructor<'_, B> {
        ElementConstructor {
            builder: self,
            name: name.into(),
        }
    }

    /// Shortcut for `self.make(name).build(children, attributes)`.
    pub fn element<'c, I, A, K, V>(
        &self,
        name: &str,
        children: I,
        attributes: A,
    ) -> Result<B::Node, B::Error>
    where
        I: IntoIterator<Item = Content<'c, B::Node>>,
        A: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Scalar>,
    {
        self.build_element(name, children, attributes)
    }

    /// Embed top-level content without wrapping it in an element.
    ///
    /// Mappings are not attribute sources here; they reach the backend as content.
    #[instrument(level = "debug", skip_all)]
    pub fn embed<'c, I>(&self, items: I) -> Result<Embedded<B::Node>, B::Error>
    where
        I: IntoIterator<Item = Content<'c, B::Node>>,
    {
        let children = normalize_children(items);
        debug!("embed: {} children", children.len());
        self.backend.embed(children)
    }

    fn build_element<'c, I, A, K, V>(
        &self,
        name: &str,
        children: I,
        attributes: A,
    ) -> Result<B::Node, B::Error>
    where
        I: IntoIterator<Item = Content<'c, B::Node>>,
        A: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Scalar>,
    {
        let mut normalized = Vec::new();
        let mut merged = Attributes::new();
        for child in children {
            normalize(child, &mut normalized, Some(&mut merged));
        }
        // explicit attributes win over mappings found among the children
        for (key, value) in attributes {
            merged.insert(key.into(), value.into());
        }
        debug!(
            "element: name={}, children={}, attributes={}",
            name,
            normalized.len(),
            merged.len()
        );
        self.backend.element(name, normalized, merged)
    }
}

/// Builds elements of one name; cheap to create, callable any number of times.
#[derive(Debug)]
pub struct ElementConstructor<'b, B> {
    builder: &'b TreeBuilder<B>,
    name: String,
}

impl<B> Clone for ElementConstructor<'_, B> {
    fn clone(&self) -> Self {
        Self {
            builder: self.builder,
            name: self.name.clone(),
        }
    }
}

impl<B: Backend> ElementConstructor<'_, B> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Build an element from positional content and explicit attributes.
    pub fn build<'c, I, A, K, V>(&self, children: I, attributes: A) -> Result<B::Node, B::Error>
    where
        I: IntoIterator<Item = Content<'c, B::Node>>,
        A: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Scalar>,
    {
        self.builder.build_element(&self.name, children, attributes)
    }

    /// Build an element from positional content only.
    pub fn call<'c, I>(&self, children: I) -> Result<B::Node, B::Error>
    where
        I: IntoIterator<Item = Content<'c, B::Node>>,
    {
        self.build(children, Attributes::new())
    }

    /// Build an element with no children and no attributes.
    pub fn empty(&self) -> Result<B::Node, B::Error> {
        self.call(Vec::new())
    }

    /// Build now and wrap the node as content for an enclosing element, so
    /// backend errors surface with `?` at the call site.
    pub fn child<'c, 'o, I>(&self, children: I) -> Result<Content<'o, B::Node>, B::Error>
    where
        I: IntoIterator<Item = Content<'c, B::Node>>,
    {
        self.call(children).map(Content::Node)
    }
}
