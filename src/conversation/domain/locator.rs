//! State-scoped context written by agent turns and read by capabilities.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Mapping from a fragment label (for example a section title) to the
/// opaque locator that retrieves it (for example a page number).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocatorMap(BTreeMap<String, String>);

impl LocatorMap {
    /// Creates an empty locator map.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builds a map from `"label: locator"` entries.
    ///
    /// Each entry is split at its last `:`. Labels and locators are trimmed
    /// and must both be non-empty. When a label repeats, the later entry
    /// wins.
    ///
    /// # Errors
    ///
    /// Returns [`LocatorEntryError`] for the first entry that does not have
    /// the `label: locator` shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use conductor::conversation::domain::LocatorMap;
    ///
    /// let map = LocatorMap::from_entries(["1 Introduction: 1", "2 Motivating Examples: 3"])
    ///     .expect("well-formed entries");
    /// assert_eq!(map.get("2 Motivating Examples"), Some("3"));
    /// ```
    pub fn from_entries<I, S>(entries: I) -> Result<Self, LocatorEntryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = BTreeMap::new();
        for entry in entries {
            let raw = entry.as_ref();
            let (label, locator) = raw
                .rsplit_once(':')
                .map(|(label, locator)| (label.trim(), locator.trim()))
                .filter(|(label, locator)| !label.is_empty() && !locator.is_empty())
                .ok_or_else(|| LocatorEntryError(raw.to_owned()))?;
            map.insert(label.to_owned(), locator.to_owned());
        }
        Ok(Self(map))
    }

    /// Inserts a single locator, replacing any previous value for the label.
    pub fn insert(&mut self, label: impl Into<String>, locator: impl Into<String>) {
        self.0.insert(label.into(), locator.into());
    }

    /// Merges `other` into this map; keys from `other` win on conflict.
    pub fn merge(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    /// Returns the locator recorded for `label`.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&str> {
        self.0.get(label).map(String::as_str)
    }

    /// Returns `true` when no locators are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of recorded locators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over `(label, locator)` pairs in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(label, locator)| (label.as_str(), locator.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for LocatorMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(label, locator)| (label.into(), locator.into()))
                .collect(),
        )
    }
}

/// A locator-list entry that is not of the form `label: locator`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("locator entry '{0}' must have the form 'label: locator'")]
pub struct LocatorEntryError(pub String);

/// Reference to an external resource produced by one turn and consumed by
/// later capability calls (for example a downloaded document's path).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactReference(String);

impl ArtifactReference {
    /// Wraps a reference value. Surrounding whitespace is removed.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_owned())
    }

    /// Returns the reference as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ArtifactReference {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ArtifactReference {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}
