//! The instance store
//!
//! [`InstanceList`] maps canonical primary URLs to [`Instance`] records in
//! insertion order. Two invariants hold at all times:
//! - every primary and additional URL is unique across the whole list
//! - every URL is canonical (see [`crate::url::validate`])
//!
//! Both are enforced by [`InstanceList::insert`], the only way in.

use crate::error::{ModelError, ModelResult};
use crate::instance::Instance;
use crate::url;
use indexmap::IndexMap;
use std::collections::BTreeSet;

/// Ordered, validated mapping of primary URL to instance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceList {
    entries: IndexMap<String, Instance>,
}

impl InstanceList {
    /// Create empty list
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an instance under its primary URL
    ///
    /// # Errors
    /// [`ModelError::Validation`] when the primary or an additional URL is
    /// already declared (or repeated within the instance) or is not
    /// canonical. The list is left unchanged.
    pub fn insert(&mut self, url: impl Into<String>, instance: Instance) -> ModelResult<()> {
        let url = url.into();
        let new_urls: Vec<&str> = std::iter::once(url.as_str())
            .chain(instance.additional_urls.urls())
            .collect();

        let existing = self.urls();
        let mut seen = BTreeSet::new();
        let mut conflicts = BTreeSet::new();
        for candidate in &new_urls {
            if existing.contains(*candidate) || !seen.insert(*candidate) {
                conflicts.insert(*candidate);
            }
        }
        if !conflicts.is_empty() {
            let listed: Vec<&str> = conflicts.into_iter().collect();
            return Err(ModelError::validation(format!(
                "{} already declared",
                listed.join(", ")
            )));
        }

        for candidate in &new_urls {
            url::validate(candidate)
                .map_err(|problem| ModelError::validation(format!("{candidate}: {problem}")))?;
        }

        tracing::trace!(%url, "instance inserted");
        self.entries.insert(url, instance);
        Ok(())
    }

    /// Remove an instance, keeping the order of the others
    ///
    /// # Errors
    /// [`ModelError::Validation`] when the URL is not a primary URL.
    pub fn remove(&mut self, url: &str) -> ModelResult<Instance> {
        self.entries
            .shift_remove(url)
            .ok_or_else(|| ModelError::validation(format!("{url} is not declared")))
    }

    /// Instance registered under a primary URL
    #[inline]
    #[must_use]
    pub fn get(&self, url: &str) -> Option<&Instance> {
        self.entries.get(url)
    }

    /// Check if a primary URL is registered
    #[inline]
    #[must_use]
    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    /// Every primary and additional URL currently registered
    ///
    /// Computed on each call.
    #[must_use]
    pub fn urls(&self) -> BTreeSet<String> {
        self.entries
            .iter()
            .flat_map(|(url, instance)| {
                std::iter::once(url.as_str()).chain(instance.additional_urls.urls())
            })
            .map(str::to_string)
            .collect()
    }

    /// `(primary URL, instance)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Instance)> {
        self.entries.iter().map(|(u, i)| (u.as_str(), i))
    }

    /// Number of instances
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the list is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// JSON dump with sorted keys and two-space indentation
    ///
    /// Every instance carries all three fields, `safe` is `null` when unset.
    ///
    /// # Errors
    /// [`ModelError::Serialize`] if the JSON encoder fails.
    pub fn to_json(&self) -> ModelResult<String> {
        let mut sorted = serde_json::Map::new();
        for (url, instance) in &self.entries {
            let value =
                serde_json::to_value(instance).map_err(|e| ModelError::Serialize(e.to_string()))?;
            sorted.insert(url.clone(), sort_keys(value));
        }
        serde_json::to_string_pretty(&serde_json::Value::Object(sorted))
            .map_err(|e| ModelError::Serialize(e.to_string()))
    }
}

/// Rebuild objects so keys come out sorted regardless of map backing
fn sort_keys(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let mut entries: Vec<_> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            serde_json::Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, sort_keys(v)))
                    .collect(),
            )
        }
        other => other,
    }
}

impl<'a> IntoIterator for &'a InstanceList {
    type Item = (&'a String, &'a Instance);
    type IntoIter = indexmap::map::Iter<'a, String, Instance>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
