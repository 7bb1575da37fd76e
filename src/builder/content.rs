//! Content items: the loosely-typed input accepted by the builder, and the
//! normalized children handed to a backend.

use std::collections::BTreeMap;
use std::fmt;

/// A string-coercible scalar value, used for text children and attribute values.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    pub fn is_text(&self) -> bool {
        matches!(self, Scalar::Text(_))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => f.write_str(s),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<&String> for Scalar {
    fn from(value: &String) -> Self {
        Scalar::Text(value.clone())
    }
}

impl From<char> for Scalar {
    fn from(value: char) -> Self {
        Scalar::Text(value.to_string())
    }
}

macro_rules! scalar_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Scalar {
            fn from(value: $t) -> Self {
                Scalar::Int(i64::from(value))
            }
        })*
    };
}

scalar_from_int!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! scalar_from_wide_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Scalar {
            fn from(value: $t) -> Self {
                i64::try_from(value)
                    .map(Scalar::Int)
                    .unwrap_or_else(|_| Scalar::Text(value.to_string()))
            }
        })*
    };
}

scalar_from_wide_int!(u64, usize, isize);

impl From<f32> for Scalar {
    fn from(value: f32) -> Self {
        Scalar::Float(f64::from(value))
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

/// Canonical attribute map handed to a backend. Later writes win.
pub type Attributes = BTreeMap<String, Scalar>;

/// Attribute source given as content. Entries whose value is `None` are skipped.
pub type Mapping = BTreeMap<String, Option<Scalar>>;

/// Build a [`Mapping`] from key/value pairs.
pub fn mapping<K, V, I>(entries: I) -> Mapping
where
    K: Into<String>,
    V: Into<Scalar>,
    I: IntoIterator<Item = (K, Option<V>)>,
{
    entries
        .into_iter()
        .map(|(k, v)| (k.into(), v.map(Into::into)))
        .collect()
}

/// Lazily produced content, flattened during normalization.
pub type ContentIter<'a, N> = Box<dyn Iterator<Item = Content<'a, N>> + 'a>;

/// Zero-argument producer resolved once during normalization.
pub type Thunk<'a, N> = Box<dyn FnOnce() -> Content<'a, N> + 'a>;

/// One item of caller-supplied input, before normalization.
///
/// `N` is the node type of the backend in use; values of that type are passed
/// through untouched.
pub enum Content<'a, N> {
    /// Produces nothing.
    None,
    Scalar(Scalar),
    /// Attribute source when building an element, opaque content when embedding.
    Mapping(Mapping),
    Sequence(Vec<Content<'a, N>>),
    Iter(ContentIter<'a, N>),
    Thunk(Thunk<'a, N>),
    /// A node previously returned by the backend.
    Node(N),
}

/// Classification of a [`Content`] item, mostly for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    None,
    Text,
    Scalar,
    Mapping,
    Sequence,
    Iter,
    Thunk,
    Node,
}

impl<'a, N> Content<'a, N> {
    pub fn text(value: impl Into<String>) -> Self {
        Content::Scalar(Scalar::Text(value.into()))
    }

    pub fn node(node: N) -> Self {
        Content::Node(node)
    }

    /// Attribute source from `(name, value)` pairs; every value is present.
    pub fn attrs<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Scalar>,
        I: IntoIterator<Item = (K, V)>,
    {
        Content::Mapping(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), Some(v.into())))
                .collect(),
        )
    }

    /// Eagerly collected sequence.
    pub fn seq<T, I>(items: I) -> Self
    where
        T: Into<Content<'a, N>>,
        I: IntoIterator<Item = T>,
    {
        Content::Sequence(items.into_iter().map(Into::into).collect())
    }

    /// Lazy sequence; the iterator is drained during normalization.
    pub fn iter<T, I>(items: I) -> Self
    where
        T: Into<Content<'a, N>> + 'a,
        N: 'a,
        I: IntoIterator<Item = T>,
        I::IntoIter: 'a,
    {
        Content::Iter(Box::new(items.into_iter().map(Into::into)))
    }

    pub fn thunk<T, F>(f: F) -> Self
    where
        T: Into<Content<'a, N>>,
        F: FnOnce() -> T + 'a,
    {
        Content::Thunk(Box::new(move || f().into()))
    }

    pub fn kind(&self) -> ContentKind {
        match self {
            Content::None => ContentKind::None,
            Content::Scalar(Scalar::Text(_)) => ContentKind::Text,
            Content::Scalar(_) => ContentKind::Scalar,
            Content::Mapping(_) => ContentKind::Mapping,
            Content::Sequence(_) => ContentKind::Sequence,
            Content::Iter(_) => ContentKind::Iter,
            Content::Thunk(_) => ContentKind::Thunk,
            Content::Node(_) => ContentKind::Node,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Content::None)
    }
}

impl<N> Default for Content<'_, N> {
    fn default() -> Self {
        Content::None
    }
}

impl<N: fmt::Debug> fmt::Debug for Content<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Content::None => f.write_str("None"),
            Content::Scalar(s) => f.debug_tuple("Scalar").field(s).finish(),
            Content::Mapping(m) => f.debug_tuple("Mapping").field(m).finish(),
            Content::Sequence(items) => f.debug_tuple("Sequence").field(items).finish(),
            Content::Iter(_) => f.write_str("Iter(..)"),
            Content::Thunk(_) => f.write_str("Thunk(..)"),
            Content::Node(n) => f.debug_tuple("Node").field(n).finish(),
        }
    }
}

impl<N> From<Scalar> for Content<'_, N> {
    fn from(value: Scalar) -> Self {
        Content::Scalar(value)
    }
}

macro_rules! content_from_scalar {
    ($($t:ty),*) => {
        $(impl<N> From<$t> for Content<'_, N> {
            fn from(value: $t) -> Self {
                Content::Scalar(Scalar::from(value))
            }
        })*
    };
}

content_from_scalar!(
    &str, String, &String, char, i8, i16, i32, i64, u8, u16, u32, u64, usize, isize, f32, f64,
    bool
);

impl<N> From<Mapping> for Content<'_, N> {
    fn from(value: Mapping) -> Self {
        Content::Mapping(value)
    }
}

impl<N> From<Attributes> for Content<'_, N> {
    fn from(value: Attributes) -> Self {
        Content::Mapping(value.into_iter().map(|(k, v)| (k, Some(v))).collect())
    }
}

impl<'a, N, T> From<Option<T>> for Content<'a, N>
where
    T: Into<Content<'a, N>>,
{
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Content::None)
    }
}

impl<'a, N, T> From<Vec<T>> for Content<'a, N>
where
    T: Into<Content<'a, N>>,
{
    fn from(value: Vec<T>) -> Self {
        Content::seq(value)
    }
}

/// One normalized child as handed to a backend.
///
/// `Mapping` only appears on the embed path, where attribute extraction is off.
#[derive(Debug, Clone, PartialEq)]
pub enum Child<N> {
    Scalar(Scalar),
    Node(N),
    Mapping(Mapping),
}

impl<N> Child<N> {
    pub fn text(value: impl Into<String>) -> Self {
        Child::Scalar(Scalar::Text(value.into()))
    }

    pub fn as_node(&self) -> Option<&N> {
        match self {
            Child::Node(n) => Some(n),
            _ => None,
        }
    }
}

impl<N> From<&str> for Child<N> {
    fn from(value: &str) -> Self {
        Child::text(value)
    }
}

impl<N> From<Scalar> for Child<N> {
    fn from(value: Scalar) -> Self {
        Child::Scalar(value)
    }
}

/// Collect heterogeneous values into a `Vec<Content>`.
///
/// ```ignore
/// let items = content!["hello", 42, Content::node(node)];
/// ```
#[macro_export]
macro_rules! content {
    () => { ::std::vec::Vec::<$crate::builder::Content<_>>::new() };
    ($($item:expr),+ $(,)?) => {
        ::std::vec![$($crate::builder::Content::from($item)),+]
    };
}
