//! Shared value types used by requests and responses

use serde::{Deserialize, Serialize};

/// Opaque identifier of a node in the knowledge graph
pub type Dcid = String;

/// One or more strings supplied by a caller.
///
/// Most endpoints accept either a single identifier or a list of them; this
/// type normalizes both into an ordered list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StringList(Vec<String>);

impl StringList {
    /// Creates a list from any iterable of string-like values
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(items.into_iter().map(Into::into).collect())
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list holds no entries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the entries
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Iterate over the entries
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    /// Consume the list, returning the entries
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }

    /// Drops repeated entries, keeping the first occurrence of each
    pub fn dedup_stable(self) -> Self {
        let mut seen = std::collections::HashSet::new();
        Self(self.0.into_iter().filter(|s| seen.insert(s.clone())).collect())
    }
}

impl From<&str> for StringList {
    fn from(value: &str) -> Self {
        Self(vec![value.to_string()])
    }
}

impl From<String> for StringList {
    fn from(value: String) -> Self {
        Self(vec![value])
    }
}

impl From<&String> for StringList {
    fn from(value: &String) -> Self {
        Self(vec![value.clone()])
    }
}

impl From<Vec<String>> for StringList {
    fn from(value: Vec<String>) -> Self {
        Self(value)
    }
}

impl From<Vec<&str>> for StringList {
    fn from(value: Vec<&str>) -> Self {
        Self::new(value)
    }
}

impl From<&[&str]> for StringList {
    fn from(value: &[&str]) -> Self {
        Self::new(value.iter().copied())
    }
}

impl From<&[String]> for StringList {
    fn from(value: &[String]) -> Self {
        Self(value.to_vec())
    }
}

impl<const N: usize> From<[&str; N]> for StringList {
    fn from(value: [&str; N]) -> Self {
        Self::new(value)
    }
}

impl IntoIterator for StringList {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// A JSON value that is either a single item or a list of items.
///
/// The service collapses one-element lists in a few places (provenance ids,
/// resolution candidates, parent types), so both shapes must round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    /// Exactly one value
    One(T),
    /// Zero or several values
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Collapses a list into `One` when it has exactly one element
    pub fn from_vec(mut items: Vec<T>) -> Self {
        if items.len() == 1 {
            if let Some(item) = items.pop() {
                return OneOrMany::One(item);
            }
        }
        OneOrMany::Many(items)
    }

    /// Expands into a list regardless of shape
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}
