//! Key filtering for listings.

use serde::{Deserialize, Serialize};

/// Prefix/suffix predicate over object keys.
///
/// A key matches when it starts with any of the prefixes AND ends with any of
/// the suffixes. An empty prefix or suffix list places no constraint, and so
/// does an empty string.
///
/// # Example
///
/// ```
/// use as_s3::KeyFilter;
///
/// let filter = KeyFilter::new("logs/2024", ".json");
///
/// assert!(filter.matches("logs/2024/a.json"));
/// assert!(!filter.matches("logs/2024/a.txt"));
/// assert!(!filter.matches("logs/2023/a.json"));
/// assert_eq!(filter.server_prefix(), Some("logs/2024"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyFilter {
    prefixes: Vec<String>,
    suffixes: Vec<String>,
}

impl KeyFilter {
    /// Filter on a single prefix and suffix. Empty strings match everything.
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self::all().with_prefix(prefix).with_suffix(suffix)
    }

    /// A filter that matches every key.
    pub fn all() -> Self {
        Self::default()
    }

    /// Add an accepted prefix. Empty strings are ignored.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        if !prefix.is_empty() {
            self.prefixes.push(prefix);
        }
        self
    }

    /// Add an accepted suffix. Empty strings are ignored.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        let suffix = suffix.into();
        if !suffix.is_empty() {
            self.suffixes.push(suffix);
        }
        self
    }

    /// Add several accepted prefixes.
    pub fn with_prefixes<I, T>(self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        prefixes.into_iter().fold(self, |f, p| f.with_prefix(p))
    }

    /// Add several accepted suffixes.
    pub fn with_suffixes<I, T>(self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        suffixes.into_iter().fold(self, |f, s| f.with_suffix(s))
    }

    /// Accepted prefixes.
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// Accepted suffixes.
    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    /// The prefix that can be sent with the list request.
    ///
    /// Only a single prefix can be filtered server side; with several, the
    /// whole bucket is listed and filtered locally.
    pub fn server_prefix(&self) -> Option<&str> {
        match self.prefixes.as_slice() {
            [prefix] => Some(prefix.as_str()),
            _ => None,
        }
    }

    /// Check if a key passes the filter.
    pub fn matches(&self, key: &str) -> bool {
        let prefix_ok = self.prefixes.is_empty() || self.prefixes.iter().any(|p| key.starts_with(p));
        let suffix_ok = self.suffixes.is_empty() || self.suffixes.iter().any(|s| key.ends_with(s));
        prefix_ok && suffix_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = KeyFilter::new("", "");
        assert!(filter.matches(""));
        assert!(filter.matches("anything/at/all.bin"));
        assert_eq!(filter, KeyFilter::all());
        assert!(filter.server_prefix().is_none());
    }

    #[test]
    fn test_prefix_and_suffix_must_both_match() {
        let filter = KeyFilter::new("data/", ".csv");
        assert!(filter.matches("data/x.csv"));
        assert!(!filter.matches("data/x.csv.gz"));
        assert!(!filter.matches("other/x.csv"));
    }

    #[test]
    fn test_suffix_only() {
        let filter = KeyFilter::new("", ".parquet");
        assert!(filter.matches("a/b/c.parquet"));
        assert!(!filter.matches("a/b/c.json"));
        assert!(filter.server_prefix().is_none());
    }

    #[test]
    fn test_multiple_prefixes_are_any_of() {
        let filter = KeyFilter::all()
            .with_prefixes(["logs/2023", "logs/2024"])
            .with_suffixes([".json", ".jsonl"]);

        assert!(filter.matches("logs/2023/a.json"));
        assert!(filter.matches("logs/2024/b.jsonl"));
        assert!(!filter.matches("logs/2022/a.json"));
        assert!(!filter.matches("logs/2024/a.txt"));
        assert!(filter.server_prefix().is_none());
    }

    #[test]
    fn test_single_prefix_goes_to_server() {
        let filter = KeyFilter::all().with_prefixes(["", "logs/"]);
        assert_eq!(filter.prefixes(), &["logs/".to_string()]);
        assert_eq!(filter.server_prefix(), Some("logs/"));
    }
}
