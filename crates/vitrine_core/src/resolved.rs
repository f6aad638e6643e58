//! Resolved display URL.

use serde::Serialize;

/// A string ready to be assigned as an image source.
///
/// Either an absolute external URL, an internal proxy path, or a local static
/// path beginning with `/`. Only the normalizer and the fallback chain build
/// these, so holders can assign them without further checks.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct ResolvedUrl(String);

impl ResolvedUrl {
    /// Wrap an already-normalized URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Borrow the URL.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take the URL out.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Whether the URL carries an `http://` or `https://` scheme.
    pub fn is_absolute(&self) -> bool {
        is_http_url(&self.0)
    }
}

impl AsRef<str> for ResolvedUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ResolvedUrl {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ResolvedUrl {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl From<ResolvedUrl> for String {
    fn from(url: ResolvedUrl) -> Self {
        url.0
    }
}

/// Whether `url` starts with `http://` or `https://`, ignoring scheme case.
pub fn is_http_url(url: &str) -> bool {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
