//! Backend capability consumed by the [`TreeBuilder`](crate::builder::TreeBuilder).

use std::rc::Rc;
use std::sync::Arc;

use crate::builder::content::{Attributes, Child};

/// Materializes normalized element requests into a concrete representation.
///
/// The builder only ever calls these two operations, and passes their results
/// and errors straight back to its caller.
pub trait Backend {
    /// The backend's node representation; may be fed back in as content.
    type Node;
    type Error: std::error::Error;

    /// Create an element named `name` with exactly these children and attributes.
    ///
    /// Scalar children become text, node children are attached as-is, in order.
    fn element(
        &self,
        name: &str,
        children: Vec<Child<Self::Node>>,
        attributes: Attributes,
    ) -> Result<Self::Node, Self::Error>;

    /// Import already-normalized content without attaching it to a parent.
    ///
    /// Must return [`Embedded::Single`] for exactly one item and
    /// [`Embedded::Many`] otherwise; [`Embedded::from_vec`] does that.
    fn embed(&self, content: Vec<Child<Self::Node>>) -> Result<Embedded<Self::Node>, Self::Error>;
}

/// Result of [`Backend::embed`]: shape depends on how many items were given.
#[derive(Debug, Clone, PartialEq)]
pub enum Embedded<N> {
    Single(N),
    Many(Vec<N>),
}

impl<N> Embedded<N> {
    pub fn from_vec(mut nodes: Vec<N>) -> Self {
        if nodes.len() == 1 {
            if let Some(node) = nodes.pop() {
                return Embedded::Single(node);
            }
        }
        Embedded::Many(nodes)
    }

    pub fn single(self) -> Option<N> {
        match self {
            Embedded::Single(node) => Some(node),
            Embedded::Many(_) => None,
        }
    }

    pub fn into_vec(self) -> Vec<N> {
        match self {
            Embedded::Single(node) => vec![node],
            Embedded::Many(nodes) => nodes,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Embedded::Single(_) => 1,
            Embedded::Many(nodes) => nodes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<B: Backend + ?Sized> Backend for &B {
    type Node = B::Node;
    type Error = B::Error;

    fn element(
        &self,
        name: &str,
        children: Vec<Child<Self::Node>>,
        attributes: Attributes,
    ) -> Result<Self::Node, Self::Error> {
        (**self).element(name, children, attributes)
    }

    fn embed(&self, content: Vec<Child<Self::Node>>) -> Result<Embedded<Self::Node>, Self::Error> {
        (**self).embed(content)
    }
}

impl<B: Backend + ?Sized> Backend for Rc<B> {
    type Node = B::Node;
    type Error = B::Error;

    fn element(
        &self,
        name: &str,
        children: Vec<Child<Self::Node>>,
        attributes: Attributes,
    ) -> Result<Self::Node, Self::Error> {
        (**self).element(name, children, attributes)
    }

    fn embed(&self, content: Vec<Child<Self::Node>>) -> Result<Embedded<Self::Node>, Self::Error> {
        (**self).embed(content)
    }
}

impl<B: Backend + ?Sized> Backend for Arc<B> {
    type Node = B::Node;
    type Error = B::Error;

    fn element(
        &self,
        name: &str,
        children: Vec<Child<Self::Node>>,
        attributes: Attributes,
    ) -> Result<Self::Node, Self::Error> {
        (**self).element(name, children, attributes)
    }

    fn embed(&self, content: Vec<Child<Self::Node>>) -> Result<Embedded<Self::Node>, Self::Error> {
        (**self).embed(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_arity() {
        assert_eq!(Embedded::from_vec(vec![1]), Embedded::Single(1));
        assert_eq!(Embedded::from_vec(Vec::<i32>::new()), Embedded::Many(vec![]));
        assert_eq!(Embedded::from_vec(vec![1, 2]), Embedded::Many(vec![1, 2]));
    }

    #[test]
    fn test_embedded_into_vec() {
        assert_eq!(Embedded::Single("a").into_vec(), vec!["a"]);
        assert_eq!(Embedded::Many(vec!["a", "b"]).len(), 2);
        assert!(Embedded::<u8>::Many(vec![]).is_empty());
    }
}
