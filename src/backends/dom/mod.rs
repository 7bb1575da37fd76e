//! Arena-backed DOM backend, the default backend.
//!
//! Every node lives in one [`Document`] owned by the backend; the nodes handed
//! back to callers are [`NodeId`] handles into it.

mod arena;
mod display;

use std::cell::{Ref, RefCell, RefMut};

use tracing::{debug, instrument};

pub use arena::{Document, DomNode, NodeData, NodeId, Traverse};
pub use display::TreeDisplay;

use crate::backends::error::{BackendError, BackendResult};
use crate::backends::escape::NameValidator;
use crate::builder::{Attributes, Backend, Child, Embedded, TreeBuilder};
use crate::config::DomSettings;

/// Builds nodes into a [`Document`].
///
/// Uses interior mutability and is therefore not `Sync`; give each thread its
/// own backend.
#[derive(Debug)]
pub struct DomBackend {
    document: RefCell<Document>,
    self_close_empty: bool,
    names: Option<NameValidator>,
}

impl Default for DomBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DomBackend {
    pub fn new() -> Self {
        Self::from_settings(&DomSettings::default())
    }

    pub fn from_settings(settings: &DomSettings) -> Self {
        Self {
            document: RefCell::new(Document::new()),
            self_close_empty: settings.self_close_empty,
            names: settings.validate_names.then(NameValidator::new),
        }
    }

    /// Read access to the document holding every node built so far.
    pub fn document(&self) -> Ref<'_, Document> {
        self.document.borrow()
    }

    pub fn into_document(self) -> Document {
        self.document.into_inner()
    }

    /// Serialize the subtree rooted at `id`.
    pub fn serialize(&self, id: NodeId) -> BackendResult<String> {
        self.document.borrow().serialize(id, self.self_close_empty)
    }

    fn check_name(&self, name: &str) -> BackendResult<()> {
        match &self.names {
            Some(validator) if !validator.is_valid(name) => {
                Err(BackendError::InvalidName(name.to_string()))
            }
            _ => Ok(()),
        }
    }

    fn document_mut(&self) -> BackendResult<RefMut<'_, Document>> {
        self.document
            .try_borrow_mut()
            .map_err(|_| BackendError::DocumentBorrowed)
    }

    /// Reject content up front so a failing call leaves the document untouched.
    fn check_children(
        document: &Document,
        children: Vec<Child<NodeId>>,
    ) -> BackendResult<Vec<Checked>> {
        children
            .into_iter()
            .map(|child| match child {
                Child::Scalar(scalar) => Ok(Checked::Text(scalar.to_string())),
                Child::Node(id) if document.contains(id) => Ok(Checked::Node(id)),
                Child::Node(id) => Err(BackendError::UnknownNode(id)),
                Child::Mapping(_) => Err(BackendError::UnsupportedContent(
                    "mapping cannot become a DOM node".to_string(),
                )),
            })
            .collect()
    }
}

/// A child that passed [`DomBackend::check_children`].
enum Checked {
    Text(String),
    Node(NodeId),
}

impl Checked {
    fn into_node(self, document: &mut Document) -> NodeId {
        match self {
            Checked::Text(text) => document.create_text(&text),
            Checked::Node(id) => id,
        }
    }
}

impl Backend for DomBackend {
    type Node = NodeId;
    type Error = BackendError;

    #[instrument(level = "trace", skip(self, children, attributes))]
    fn element(
        &self,
        name: &str,
        children: Vec<Child<NodeId>>,
        attributes: Attributes,
    ) -> BackendResult<NodeId> {
        self.check_name(name)?;
        for key in attributes.keys() {
            self.check_name(key)?;
        }
        let mut document = self.document_mut()?;
        let children = Self::check_children(&document, children)?;

        let element = document.create_element(name, attributes);
        for child in children {
            let id = child.into_node(&mut document);
            document.append_child(element, id)?;
        }
        debug!("element: {} -> {}", name, element);
        Ok(element)
    }

    #[instrument(level = "trace", skip_all)]
    fn embed(&self, content: Vec<Child<NodeId>>) -> BackendResult<Embedded<NodeId>> {
        let mut document = self.document_mut()?;
        let nodes = Self::check_children(&document, content)?
            .into_iter()
            .map(|child| child.into_node(&mut document))
            .collect();
        Ok(Embedded::from_vec(nodes))
    }
}

impl TreeBuilder<DomBackend> {
    /// Builder over a fresh default DOM backend.
    pub fn dom() -> Self {
        Self::new(DomBackend::new())
    }
}
