//! A tagged representation of arbitrarily nested column values.

/// A node of a nested value tree: a present leaf, a null (leaf or list), or
/// a list of nodes.
///
/// This is the traversal input of the write-side level computer and the
/// output of the read-side reconstructor. A flat nullable column is a
/// sequence of `Value`/`Null`; a list column is a sequence of `List`/`Null`.
#[derive(Debug, Clone, PartialEq)]
pub enum Nested<T> {
    Value(T),
    Null,
    List(Vec<Nested<T>>),
}

impl<T> Nested<T> {
    /// Returns the nodes of a list, or `None` for a leaf or null.
    pub fn as_list(&self) -> Option<&[Nested<T>]> {
        match self {
            Nested::List(items) => Some(items),
            _ => None,
        }
    }
}

impl<T> From<Option<T>> for Nested<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Nested::Value(value),
            None => Nested::Null,
        }
    }
}

/// Converts a sequence of optional lists of required elements into nodes.
pub fn from_lists<T: Clone>(lists: &[Option<Vec<T>>]) -> Vec<Nested<T>> {
    lists
        .iter()
        .map(|list| match list {
            Some(items) => Nested::List(items.iter().cloned().map(Nested::Value).collect()),
            None => Nested::Null,
        })
        .collect()
}

/// Converts a sequence of optional lists of optional elements into nodes.
pub fn from_nullable_lists<T: Clone>(lists: &[Option<Vec<Option<T>>>]) -> Vec<Nested<T>> {
    lists
        .iter()
        .map(|list| match list {
            Some(items) => Nested::List(items.iter().cloned().map(Nested::from).collect()),
            None => Nested::Null,
        })
        .collect()
}
