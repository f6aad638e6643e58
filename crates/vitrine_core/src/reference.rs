//! Image reference types.

use serde_json::Value as JsonValue;

/// Raw image descriptor received from the backend, parsed once at the
/// boundary so downstream code never re-inspects the JSON shape.
///
/// # Examples
///
/// ```
/// use vitrine_core::ImageReference;
/// use serde_json::json;
///
/// let plain = ImageReference::from_json(&json!("uploads/news/x.jpg"));
/// assert_eq!(plain, Some(ImageReference::url("uploads/news/x.jpg")));
///
/// let object = ImageReference::from_json(&json!({"key": "cars/1.jpg"}));
/// assert!(matches!(object, Some(ImageReference::Parts(_))));
///
/// assert_eq!(ImageReference::from_json(&json!({})), None);
/// assert_eq!(ImageReference::from_json(&json!(null)), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImageReference {
    /// A plain URL string, absolute or relative
    Url(String),
    /// A structured reference with optional resolved URLs and a storage key
    Parts(ReferenceParts),
}

/// Fields of the structured reference form.
///
/// Empty or whitespace-only strings are stored as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ReferenceParts {
    /// Full-size URL
    pub url: Option<String>,
    /// Reduced-size URL
    pub thumbnail: Option<String>,
    /// Storage-backend object key, without scheme or host
    pub key: Option<String>,
}

impl ReferenceParts {
    /// Whether none of the fields carries a value.
    pub fn is_empty(&self) -> bool {
        self.url.is_none() && self.thumbnail.is_none() && self.key.is_none()
    }
}

impl ImageReference {
    /// Plain URL reference.
    pub fn url(url: impl Into<String>) -> Self {
        ImageReference::Url(url.into())
    }

    /// Structured reference. Returns `None` if every field is blank.
    pub fn parts(
        url: Option<&str>,
        thumbnail: Option<&str>,
        key: Option<&str>,
    ) -> Option<Self> {
        let parts = ReferenceParts {
            url: non_blank(url),
            thumbnail: non_blank(thumbnail),
            key: non_blank(key),
        };
        if parts.is_empty() {
            None
        } else {
            Some(ImageReference::Parts(parts))
        }
    }

    /// Parse a backend JSON value.
    ///
    /// Strings become [`ImageReference::Url`], objects become
    /// [`ImageReference::Parts`]. Any other shape, a blank string, or an
    /// object with no usable field is treated as absent.
    pub fn from_json(value: &JsonValue) -> Option<Self> {
        match value {
            JsonValue::String(s) if !s.trim().is_empty() => Some(ImageReference::Url(s.clone())),
            JsonValue::Object(map) => {
                let field = |name: &str| map.get(name).and_then(JsonValue::as_str);
                ImageReference::parts(field("url"), field("thumbnail"), field("key"))
            }
            _ => None,
        }
    }
}

impl From<&str> for ImageReference {
    fn from(url: &str) -> Self {
        ImageReference::Url(url.to_string())
    }
}

impl From<String> for ImageReference {
    fn from(url: String) -> Self {
        ImageReference::Url(url)
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
