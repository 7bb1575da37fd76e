use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::backends::error::{BackendError, BackendResult};
use crate::backends::escape::{escape_attribute, escape_text};
use crate::builder::Attributes;

static NEXT_DOCUMENT: AtomicU64 = AtomicU64::new(0);

/// Handle to a node stored in a [`Document`].
///
/// Carries the id of the document that created it; other documents reject it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    document: u64,
    index: Index,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (index, generation) = self.index.into_raw_parts();
        write!(f, "{}v{}@{}", index, generation, self.document)
    }
}

/// Payload of a document node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    Element { name: String, attributes: Attributes },
    Text(String),
}

impl NodeData {
    pub fn name(&self) -> Option<&str> {
        match self {
            NodeData::Element { name, .. } => Some(name),
            NodeData::Text(_) => None,
        }
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeData::Element { name, attributes } => {
                write!(f, "<{}", name)?;
                for (key, value) in attributes {
                    write!(f, " {}=\"{}\"", key, escape_attribute(&value.to_string()))?;
                }
                f.write_str(">")
            }
            NodeData::Text(text) => write!(f, "{:?}", text),
        }
    }
}

/// Node in the arena-backed document.
#[derive(Debug)]
pub struct DomNode {
    pub data: NodeData,
    /// None for detached nodes
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// Arena storage for every node a [`DomBackend`](super::DomBackend) creates.
///
/// Nodes start detached; attaching a node that already has a parent moves it.
#[derive(Debug)]
pub struct Document {
    id: u64,
    arena: Arena<DomNode>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            id: NEXT_DOCUMENT.fetch_add(1, Ordering::Relaxed),
            arena: Arena::new(),
        }
    }

    /// Number of nodes ever created and still stored.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.document == self.id && self.arena.contains(id.index)
    }

    #[instrument(level = "trace", skip(self, attributes))]
    pub fn create_element(&mut self, name: &str, attributes: Attributes) -> NodeId {
        self.insert(NodeData::Element {
            name: name.to_string(),
            attributes,
        })
    }

    #[instrument(level = "trace", skip(self))]
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.insert(NodeData::Text(text.to_string()))
    }

    fn insert(&mut self, data: NodeData) -> NodeId {
        let index = self.arena.insert(DomNode {
            data,
            parent: None,
            children: Vec::new(),
        });
        NodeId {
            document: self.id,
            index,
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&DomNode> {
        if id.document != self.id {
            return None;
        }
        self.arena.get(id.index)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut DomNode> {
        if id.document != self.id {
            return None;
        }
        self.arena.get_mut(id.index)
    }

    fn require(&self, id: NodeId) -> BackendResult<&DomNode> {
        self.node(id).ok_or(BackendError::UnknownNode(id))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|node| node.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|node| node.children.as_slice()).unwrap_or(&[])
    }

    /// Append `child` as last child of `parent`, detaching it from its old parent.
    #[instrument(level = "trace", skip(self))]
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> BackendResult<()> {
        if let NodeData::Text(_) = self.require(parent)?.data {
            return Err(BackendError::UnsupportedContent(format!(
                "text node {} cannot have children",
                parent
            )));
        }
        self.require(child)?;
        if self.is_ancestor_or_self(child, parent) {
            return Err(BackendError::HierarchyCycle(child));
        }
        self.detach(child)?;
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
        Ok(())
    }

    /// Remove `id` from its parent's children; no-op for detached nodes.
    #[instrument(level = "trace", skip(self))]
    pub fn detach(&mut self, id: NodeId) -> BackendResult<()> {
        let parent = self.require(id)?.parent;
        if let Some(parent) = parent {
            if let Some(node) = self.node_mut(parent) {
                node.children.retain(|&c| c != id);
            }
            if let Some(node) = self.node_mut(id) {
                node.parent = None;
            }
        }
        Ok(())
    }

    fn is_ancestor_or_self(&self, candidate: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == candidate {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Pre-order traversal starting at (and including) `id`.
    pub fn traverse(&self, id: NodeId) -> Traverse<'_> {
        Traverse::new(self, id)
    }

    /// Number of levels below and including `id`.
    pub fn depth(&self, id: NodeId) -> usize {
        match self.node(id) {
            Some(node) => {
                1 + node
                    .children
                    .iter()
                    .map(|&child| self.depth(child))
                    .max()
                    .unwrap_or(0)
            }
            None => 0,
        }
    }

    /// Concatenated text of all descendant text nodes, in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        self.traverse(id)
            .filter_map(|(_, node)| match &node.data {
                NodeData::Text(text) => Some(text.as_str()),
                NodeData::Element { .. } => None,
            })
            .collect()
    }

    /// Serialize the subtree rooted at `id` as XML.
    pub fn serialize(&self, id: NodeId, self_close_empty: bool) -> BackendResult<String> {
        let mut out = String::new();
        self.write_node(id, self_close_empty, &mut out)?;
        Ok(out)
    }

    fn write_node(
        &self,
        id: NodeId,
        self_close_empty: bool,
        out: &mut String,
    ) -> BackendResult<()> {
        let node = self.require(id)?;
        match &node.data {
            NodeData::Text(text) => out.push_str(&escape_text(text)),
            NodeData::Element { name, .. } => {
                let open = node.data.to_string();
                if node.children.is_empty() && self_close_empty {
                    out.push_str(&open[..open.len() - 1]);
                    out.push_str("/>");
                } else {
                    out.push_str(&open);
                    for &child in &node.children {
                        self.write_node(child, self_close_empty, out)?;
                    }
                    out.push_str("</");
                    out.push_str(name);
                    out.push('>');
                }
            }
        }
        Ok(())
    }
}

/// Pre-order iterator over a subtree.
pub struct Traverse<'a> {
    document: &'a Document,
    stack: Vec<NodeId>,
}

impl<'a> Traverse<'a> {
    fn new(document: &'a Document, root: NodeId) -> Self {
        Self {
            document,
            stack: vec![root],
        }
    }
}

impl<'a> Iterator for Traverse<'a> {
    type Item = (NodeId, &'a DomNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(node) = self.document.node(current) {
                // reverse so children come out left to right
                self.stack.extend(node.children.iter().rev().copied());
                return Some((current, node));
            }
        }
        None
    }
}
