//! Content normalization.
//!
//! Classifies one content item and routes it into an ordered children list and,
//! when building an element, an attributes map. Rules apply in order, first
//! match wins:
//!
//! 1. `None` contributes nothing.
//! 2. Text is appended verbatim.
//! 3. A mapping merges its non-`None` entries into the attributes (only when an
//!    attributes accumulator is given).
//! 4. Sequences and iterators are flattened recursively, in order.
//! 5. A thunk is called once and its result normalized.
//! 6. Anything else (other scalars, backend nodes, mappings without an
//!    attributes accumulator) is appended as-is.
//!
//! Normalization is total: it never fails, unexpected shapes are kept so the
//! backend can decide what to do with them.

use tracing::trace;

use crate::builder::content::{Attributes, Child, Content, Scalar};

/// Normalize `item` into `children` and, if given, `attributes`.
pub fn normalize<N>(
    item: Content<'_, N>,
    children: &mut Vec<Child<N>>,
    mut attributes: Option<&mut Attributes>,
) {
    trace!(kind = ?item.kind(), "normalize");
    match item {
        Content::None => {}
        Content::Scalar(text @ Scalar::Text(_)) => children.push(Child::Scalar(text)),
        Content::Mapping(mapping) => match attributes {
            Some(attributes) => {
                for (key, value) in mapping {
                    if let Some(value) = value {
                        attributes.insert(key, value);
                    }
                }
            }
            None => children.push(Child::Mapping(mapping)),
        },
        Content::Sequence(items) => {
            for item in items {
                normalize(item, children, attributes.as_deref_mut());
            }
        }
        Content::Iter(items) => {
            for item in items {
                normalize(item, children, attributes.as_deref_mut());
            }
        }
        Content::Thunk(produce) => normalize(produce(), children, attributes),
        Content::Scalar(scalar) => children.push(Child::Scalar(scalar)),
        Content::Node(node) => children.push(Child::Node(node)),
    }
}

/// Normalize every item, extracting attributes from mappings.
pub fn normalize_all<'a, N, I>(items: I) -> (Vec<Child<N>>, Attributes)
where
    I: IntoIterator<Item = Content<'a, N>>,
{
    let mut children = Vec::new();
    let mut attributes = Attributes::new();
    for item in items {
        normalize(item, &mut children, Some(&mut attributes));
    }
    (children, attributes)
}

/// Normalize every item without attribute extraction, as for embedding.
pub fn normalize_children<'a, N, I>(items: I) -> Vec<Child<N>>
where
    I: IntoIterator<Item = Content<'a, N>>,
{
    let mut children = Vec::new();
    for item in items {
        normalize(item, &mut children, None);
    }
    children
}
