//! Tag sets and the tag reconciliation diff.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// An unordered set of string key/value tags with unique keys.
///
/// Backed by a `BTreeMap` so iteration order is deterministic, which keeps
/// adapter call logs and test assertions stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet(BTreeMap<String, String>);

impl TagSet {
    /// Creates an empty tag set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a tag, returning the previous value for the key if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Looks up the value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Number of tags in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the set holds no tags.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the tags in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Checks whether an observed tag set matches this desired set.
    ///
    /// A mismatch is reported when the cardinality differs, when any desired
    /// key is absent from the observed set, or when a shared key's value
    /// differs case-insensitively.
    #[must_use]
    pub fn matches(&self, observed: &TagSet) -> bool {
        if self.len() != observed.len() {
            return false;
        }
        self.iter().all(|(key, want)| {
            observed
                .get(key)
                .is_some_and(|have| want.to_lowercase() == have.to_lowercase())
        })
    }
}

impl FromIterator<(String, String)> for TagSet {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for TagSet {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

impl IntoIterator for TagSet {
    type Item = (String, String);
    type IntoIter = std::collections::btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// The tag operations needed to converge an observed set to a desired set.
///
/// The diff is deliberately asymmetric: the adapter contract only supports
/// bulk remove-then-add when the set shrinks, so `to_remove` is either the
/// entire observed set or empty, and `to_add` is always the entire desired
/// set. Individual keys are never patched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDiff {
    /// Tags to remove before re-adding; populated only on shrink.
    pub to_remove: TagSet,
    /// The full desired set, applied after any removal.
    pub to_add: TagSet,
}

impl TagDiff {
    /// Computes the remove/add operations for one update pass.
    #[must_use]
    pub fn between(desired: &TagSet, observed: &TagSet) -> Self {
        let to_remove = if desired.len() < observed.len() {
            observed.clone()
        } else {
            TagSet::new()
        };
        Self {
            to_remove,
            to_add: desired.clone(),
        }
    }

    /// Returns true if neither operation carries any tags.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_remove.is_empty() && self.to_add.is_empty()
    }
}
