//! Extraction pipeline: fragments in, keyword-value mapping out.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::models::config::ExtractionConfig;

use super::fragments::Fragment;
use super::resolver::ValueResolver;

/// Ordered keyword-to-value mapping.
///
/// Every configured keyword is present, bound to a normalized numeric
/// string or `None`. Serializes to a JSON object in keyword order, with
/// unresolved keywords as `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedValues {
    entries: Vec<(String, Option<String>)>,
}

impl ExtractedValues {
    fn new(keywords: &[String]) -> Self {
        Self {
            entries: keywords.iter().map(|k| (k.clone(), None)).collect(),
        }
    }

    /// Look up the value resolved for `keyword`, if any.
    pub fn get(&self, keyword: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == keyword)
            .and_then(|(_, v)| v.as_deref())
    }

    /// Iterate entries in configured keyword order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Number of configured keywords.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn set(&mut self, keyword: &str, value: String) {
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| k == keyword) {
            entry.1 = Some(value);
        }
    }
}

impl Serialize for ExtractedValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (keyword, value) in &self.entries {
            map.serialize_entry(keyword, value)?;
        }
        map.end()
    }
}

/// Runs keyword lookup and value resolution over a fragment list.
pub struct ValueExtractor {
    keywords: Vec<String>,
    resolver: ValueResolver,
}

impl ValueExtractor {
    /// Build an extractor from configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            keywords: config.keywords.clone(),
            resolver: ValueResolver::new().with_row_tolerance(config.row_tolerance),
        }
    }

    /// Build an extractor with an explicit keyword list and the default
    /// resolver tolerance.
    pub fn with_keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
            resolver: ValueResolver::new(),
        }
    }

    /// The configured keyword list, in output order.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Extract a value for every configured keyword.
    ///
    /// Fragments are visited in their given order; each keyword is checked
    /// independently against each fragment's text. When several fragments
    /// contain the same keyword, the last one that resolves a value wins
    /// and replaces any earlier resolution for that keyword.
    pub fn extract(&self, fragments: &[Fragment]) -> ExtractedValues {
        let mut values = ExtractedValues::new(&self.keywords);

        for (index, fragment) in fragments.iter().enumerate() {
            for keyword in &self.keywords {
                if !fragment.text.contains(keyword.as_str()) {
                    continue;
                }
                if let Some(value) = self.resolver.resolve(keyword, index, fragments) {
                    debug!(keyword = %keyword, %value, "keyword resolved");
                    values.set(keyword, value);
                }
            }
        }

        values
    }
}

impl Default for ValueExtractor {
    fn default() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }
}
