use crate::constants::SECURE_SCHEME_PREFIX;
use crate::types::{ExistingMonitor, InputRow, SkipReason};
use std::collections::HashSet;

/// URLs known to be registered on the server, including ones added this run
#[derive(Debug, Default, Clone)]
pub struct KnownUrls {
    urls: HashSet<String>,
}

impl KnownUrls {
    pub fn from_monitors(monitors: &[ExistingMonitor]) -> Self {
        let urls = monitors
            .iter()
            .filter_map(|m| m.url.as_deref())
            .filter(|u| !u.is_empty())
            .map(str::to_string)
            .collect();
        Self { urls }
    }

    /// Exact, case-sensitive membership
    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    pub fn insert(&mut self, url: impl Into<String>) -> bool {
        self.urls.insert(url.into())
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// Case-insensitive check for an `https://` prefix
pub fn is_https(url: &str) -> bool {
    url.get(..SECURE_SCHEME_PREFIX.len())
        .map_or(false, |prefix| prefix.eq_ignore_ascii_case(SECURE_SCHEME_PREFIX))
}

/// Decide whether a row must be skipped. Checks run in order:
/// empty name, non-HTTPS URL, already-registered URL.
pub fn skip_reason(row: &InputRow, known: &KnownUrls) -> Option<SkipReason> {
    if row.name.is_empty() {
        return Some(SkipReason::MissingName);
    }
    if !is_https(&row.url) {
        return Some(SkipReason::NotHttps);
    }
    if known.contains(&row.url) {
        return Some(SkipReason::AlreadyExists);
    }
    None
}
