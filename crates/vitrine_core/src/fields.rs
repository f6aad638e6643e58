//! Image fields of a backend record.

use crate::ImageReference;
use derive_getters::Getters;
use serde_json::Value as JsonValue;

/// The image-bearing fields of a listing, article, rental or video record.
///
/// Backend records carry `featuredImage`, `thumbnail`, `images[]` and
/// `gallery[]`, each following the [`ImageReference`] shape. Entries that do
/// not parse are dropped, so a record with no usable image yields an empty
/// value rather than an error.
///
/// # Examples
///
/// ```
/// use vitrine_core::{ImageReference, MediaFields};
/// use serde_json::json;
///
/// let record = json!({
///     "title": "Hatchback",
///     "featuredImage": {"key": "cars/1.jpg"},
///     "images": ["/uploads/vehicles/2.jpg", null, {}],
/// });
///
/// let fields = MediaFields::from_json(&record);
/// assert_eq!(fields.images().len(), 1);
/// assert!(fields.featured_image().is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters)]
pub struct MediaFields {
    featured_image: Option<ImageReference>,
    thumbnail: Option<ImageReference>,
    images: Vec<ImageReference>,
    gallery: Vec<ImageReference>,
}

impl MediaFields {
    /// Extract the image fields from a backend JSON record.
    ///
    /// `images` and `gallery` may also be a single reference instead of an
    /// array; non-object records produce an empty value.
    pub fn from_json(record: &JsonValue) -> Self {
        let Some(map) = record.as_object() else {
            return Self::default();
        };

        let single = |name: &str| map.get(name).and_then(ImageReference::from_json);
        let list = |name: &str| match map.get(name) {
            Some(JsonValue::Array(items)) => items
                .iter()
                .filter_map(ImageReference::from_json)
                .collect(),
            Some(other) => ImageReference::from_json(other).into_iter().collect(),
            None => Vec::new(),
        };

        Self {
            featured_image: single("featuredImage"),
            thumbnail: single("thumbnail"),
            images: list("images"),
            gallery: list("gallery"),
        }
    }

    /// The reference a card or list row should show first.
    ///
    /// Prefers the featured image, then the first listed image, then the
    /// first gallery image, then the thumbnail.
    pub fn primary(&self) -> Option<&ImageReference> {
        self.featured_image
            .as_ref()
            .or_else(|| self.images.first())
            .or_else(|| self.gallery.first())
            .or(self.thumbnail.as_ref())
    }

    /// Whether no image field carried a usable reference.
    pub fn is_empty(&self) -> bool {
        self.primary().is_none()
    }
}
