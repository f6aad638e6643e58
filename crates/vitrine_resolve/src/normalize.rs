//! Reference normalization.
//!
//! Turns heterogeneous references into display URLs. Absolute `http(s)` URLs
//! pass through, relative paths gain a leading `/`, storage keys become proxy
//! paths, and the doubled `/images/images/` segment produced by an upstream
//! data defect is collapsed wherever it appears.

use crate::config::DEFAULT_PROXY_PREFIX;
use vitrine_core::{ImageReference, MediaCategory, ResolvedUrl, is_http_url};

const DOUBLED_SEGMENT: &str = "/images/images/";
const SINGLE_SEGMENT: &str = "/images/";

/// Reference normalizer bound to a proxy route.
///
/// # Example
///
/// ```
/// use vitrine_core::{ImageReference, MediaCategory};
/// use vitrine_resolve::Normalizer;
///
/// let normalizer = Normalizer::default();
/// let url = normalizer
///     .normalize(&ImageReference::url("uploads/news/x.jpg"), MediaCategory::Article)
///     .unwrap();
/// assert_eq!(url, "/uploads/news/x.jpg");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalizer {
    proxy_prefix: String,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_PROXY_PREFIX)
    }
}

impl Normalizer {
    /// Create a normalizer emitting proxy paths under `proxy_prefix`.
    pub fn new(proxy_prefix: impl Into<String>) -> Self {
        let proxy_prefix: String = proxy_prefix.into();
        Self {
            proxy_prefix: proxy_prefix.trim_end_matches('/').to_string(),
        }
    }

    /// Resolve a reference to a display URL.
    ///
    /// Object references prefer `url`, then `thumbnail` (never for
    /// [`MediaCategory::Gallery`]), then the proxy path built from `key`.
    /// Returns `None` when no field is usable.
    pub fn normalize(
        &self,
        reference: &ImageReference,
        category: MediaCategory,
    ) -> Option<ResolvedUrl> {
        match reference {
            ImageReference::Url(raw) => self.normalize_str(raw),
            ImageReference::Parts(parts) => parts
                .url
                .as_deref()
                .and_then(|url| self.normalize_str(url))
                .or_else(|| {
                    parts
                        .thumbnail
                        .as_deref()
                        .filter(|_| category.allows_thumbnail_substitution())
                        .and_then(|thumb| self.normalize_str(thumb))
                })
                .or_else(|| parts.key.as_deref().and_then(|key| self.proxy_path(key))),
        }
    }

    /// Normalize a plain URL string.
    ///
    /// Absolute `http(s)` URLs keep their host and only have doubled segments
    /// collapsed. Anything else is treated as a site path.
    pub fn normalize_str(&self, raw: &str) -> Option<ResolvedUrl> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        if is_http_url(trimmed) {
            return Some(ResolvedUrl::new(collapse_duplicate_segments(trimmed)));
        }

        let rooted = if trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{}", trimmed)
        };
        Some(ResolvedUrl::new(collapse_duplicate_segments(&rooted)))
    }

    /// Proxy path serving the storage object under `key`.
    ///
    /// Returns `None` if nothing remains of the key after normalization.
    pub fn proxy_path(&self, key: &str) -> Option<ResolvedUrl> {
        let key = normalize_key(key);
        if key.is_empty() {
            return None;
        }
        Some(ResolvedUrl::new(format!("{}/{}", self.proxy_prefix, key)))
    }
}

/// Normalize with the default proxy route.
///
/// # Example
///
/// ```
/// use vitrine_core::{ImageReference, MediaCategory};
/// use vitrine_resolve::normalize;
///
/// let reference = ImageReference::parts(None, None, Some("images/images/cars/1.jpg")).unwrap();
/// let url = normalize(&reference, MediaCategory::Vehicle).unwrap();
/// assert_eq!(url, "/api/images/s3-proxy/cars/1.jpg");
/// ```
pub fn normalize(reference: &ImageReference, category: MediaCategory) -> Option<ResolvedUrl> {
    Normalizer::default().normalize(reference, category)
}

/// Replace every `/images/images/` with `/images/` until none remain.
pub fn collapse_duplicate_segments(path: &str) -> String {
    let mut collapsed = path.to_string();
    while collapsed.contains(DOUBLED_SEGMENT) {
        collapsed = collapsed.replace(DOUBLED_SEGMENT, SINGLE_SEGMENT);
    }
    collapsed
}

/// Normalize a storage object key for the proxy route.
///
/// Drops any query or fragment and leading slashes, collapses doubled
/// `images/` segments, then strips one leading `images/` because the proxy
/// already serves from that prefix.
///
/// ```
/// use vitrine_resolve::normalize_key;
///
/// assert_eq!(normalize_key("images/images/foo/bar.jpg"), "foo/bar.jpg");
/// assert_eq!(normalize_key("/cars/images/images/1.jpg?v=2"), "cars/images/1.jpg");
/// ```
pub fn normalize_key(key: &str) -> String {
    let key = strip_query(key.trim());
    let rooted = format!("/{}", key.trim_start_matches('/'));
    let collapsed = collapse_duplicate_segments(&rooted);
    let relative = collapsed.trim_start_matches('/');
    relative
        .strip_prefix("images/")
        .unwrap_or(relative)
        .to_string()
}

/// Split a URL into host and path for absolute or protocol-relative URLs.
///
/// The path keeps its leading `/` and is empty when the URL has none.
pub(crate) fn split_host(url: &str) -> Option<(&str, &str)> {
    let rest = if is_http_url(url) {
        &url[url.find("://")? + 3..]
    } else {
        url.strip_prefix("//")?
    };
    match rest.find('/') {
        Some(slash) => Some((&rest[..slash], &rest[slash..])),
        None => Some((rest, "")),
    }
}

/// Path component of a URL, or the input itself for site paths.
pub(crate) fn path_of(url: &str) -> &str {
    match split_host(url) {
        Some((_, path)) => path,
        None => url,
    }
}

/// Final path segment without query or fragment.
pub(crate) fn file_name(url: &str) -> Option<&str> {
    let path = strip_query(path_of(url));
    path.rsplit('/').next().filter(|name| !name.is_empty())
}

fn strip_query(url: &str) -> &str {
    match url.find(['?', '#']) {
        Some(end) => &url[..end],
        None => url,
    }
}
