//! Instance records
//!
//! An [`Instance`] is the metadata attached to one primary URL: an optional
//! trust flag, free-text comments and the alternate URLs that reach the same
//! service.

use indexmap::IndexMap;
use serde::Serialize;

/// Alternate URLs of an instance, each with a relation tag
///
/// Insertion order is kept and written out verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AdditionalUrls(IndexMap<String, String>);

impl AdditionalUrls {
    /// Create empty list
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an alternate URL with its relation tag
    #[must_use]
    pub fn with(mut self, url: impl Into<String>, relation: impl Into<String>) -> Self {
        self.0.insert(url.into(), relation.into());
        self
    }

    /// Insert or replace an alternate URL
    pub fn insert(&mut self, url: impl Into<String>, relation: impl Into<String>) {
        self.0.insert(url.into(), relation.into());
    }

    /// Relation tag of an alternate URL
    #[inline]
    #[must_use]
    pub fn get(&self, url: &str) -> Option<&str> {
        self.0.get(url).map(String::as_str)
    }

    /// Alternate URLs in order
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// `(url, relation)` pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(u, r)| (u.as_str(), r.as_str()))
    }

    /// Number of alternate URLs
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no alternate URLs
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<U: Into<String>, R: Into<String>> FromIterator<(U, R)> for AdditionalUrls {
    fn from_iter<I: IntoIterator<Item = (U, R)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(u, r)| (u.into(), r.into())).collect())
    }
}

/// One registered service endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Instance {
    /// Trust flag, unset when nobody reviewed the instance
    pub safe: Option<bool>,
    /// Free-text comments
    pub comments: Vec<String>,
    /// Alternate URLs (mirrors, hidden services)
    pub additional_urls: AdditionalUrls,
}

impl Instance {
    /// Create empty instance (the skeleton of an Add request)
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With trust flag
    #[inline]
    #[must_use]
    pub fn with_safe(mut self, safe: bool) -> Self {
        self.safe = Some(safe);
        self
    }

    /// With an extra comment
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comments.push(comment.into());
        self
    }

    /// With alternate URLs
    #[inline]
    #[must_use]
    pub fn with_additional_urls(mut self, additional_urls: AdditionalUrls) -> Self {
        self.additional_urls = additional_urls;
        self
    }

    /// Check if no field is set
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.safe.is_none() && self.comments.is_empty() && self.additional_urls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn additional_urls_keep_insertion_order() {
        let urls = AdditionalUrls::new()
            .with("http://zzz.onion", "Hidden Service")
            .with("https://aaa.example.org", "mirror");

        let order: Vec<_> = urls.urls().collect();
        assert_eq!(order, vec!["http://zzz.onion", "https://aaa.example.org"]);
        assert_eq!(urls.get("https://aaa.example.org"), Some("mirror"));
    }

    #[test]
    fn instance_builder() {
        let instance = Instance::new()
            .with_safe(true)
            .with_comment("hosted in a basement")
            .with_additional_urls([("http://x.onion", "Hidden Service")].into_iter().collect());

        assert_eq!(instance.safe, Some(true));
        assert_eq!(instance.comments.len(), 1);
        assert_eq!(instance.additional_urls.len(), 1);
        assert!(!instance.is_empty());
        assert!(Instance::new().is_empty());
    }
}
