//! Media category enumeration.

use serde::{Deserialize, Serialize};

/// Logical grouping of images on the site.
///
/// A category selects the placeholder image, the conventional upload
/// directory used to rebuild broken paths, and the storage key of its
/// failure cache. Each category keeps its own cache so that an article image
/// failing never shadows a rental image with a coincidentally identical path.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum MediaCategory {
    /// News articles
    #[display("article")]
    Article,
    /// Rental offers
    #[display("rental")]
    Rental,
    /// Vehicle listings
    #[display("vehicle")]
    Vehicle,
    /// Trailer listings
    #[display("trailer")]
    Trailer,
    /// Transport routes
    #[display("transport")]
    Transport,
    /// Video thumbnails
    #[display("video")]
    Video,
    /// Full-resolution galleries
    #[display("gallery")]
    Gallery,
    /// Anything without a dedicated category
    #[display("default")]
    Default,
}

impl MediaCategory {
    /// Slug used in placeholder file names and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaCategory::Article => "article",
            MediaCategory::Rental => "rental",
            MediaCategory::Vehicle => "vehicle",
            MediaCategory::Trailer => "trailer",
            MediaCategory::Transport => "transport",
            MediaCategory::Video => "video",
            MediaCategory::Gallery => "gallery",
            MediaCategory::Default => "default",
        }
    }

    /// Storage key under which this category's failure cache is persisted.
    pub fn cache_key(&self) -> &'static str {
        match self {
            MediaCategory::Article => "failedNewsImages",
            MediaCategory::Rental => "failedRentalImages",
            MediaCategory::Vehicle => "failedVehicleImages",
            MediaCategory::Trailer => "failedTrailerImages",
            MediaCategory::Transport => "failedTransportImages",
            MediaCategory::Video => "failedVideoThumbnails",
            MediaCategory::Gallery => "failedGalleryImages",
            MediaCategory::Default => "failedImages",
        }
    }

    /// Conventional upload directory, if the category has one.
    pub fn upload_dir(&self) -> Option<&'static str> {
        match self {
            MediaCategory::Article => Some("/uploads/news"),
            MediaCategory::Rental => Some("/uploads/rentals"),
            MediaCategory::Vehicle => Some("/uploads/vehicles"),
            MediaCategory::Trailer => Some("/uploads/trailers"),
            MediaCategory::Transport => Some("/uploads/transport"),
            MediaCategory::Gallery => Some("/uploads/gallery"),
            MediaCategory::Video | MediaCategory::Default => None,
        }
    }

    /// Whether a thumbnail may stand in for a missing full-size URL.
    ///
    /// Galleries display full-resolution images and never downgrade.
    pub fn allows_thumbnail_substitution(&self) -> bool {
        !matches!(self, MediaCategory::Gallery)
    }

    /// Whether the category can fall back to external video thumbnails.
    pub fn supports_video_thumbnails(&self) -> bool {
        matches!(self, MediaCategory::Video)
    }
}

impl std::str::FromStr for MediaCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "article" | "news" => Ok(MediaCategory::Article),
            "rental" | "rentals" => Ok(MediaCategory::Rental),
            "vehicle" | "vehicles" => Ok(MediaCategory::Vehicle),
            "trailer" | "trailers" => Ok(MediaCategory::Trailer),
            "transport" => Ok(MediaCategory::Transport),
            "video" | "videos" => Ok(MediaCategory::Video),
            "gallery" => Ok(MediaCategory::Gallery),
            "default" => Ok(MediaCategory::Default),
            other => Err(format!("Unknown media category: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use strum::IntoEnumIterator;

    #[test]
    fn cache_keys_are_distinct() {
        let keys: HashSet<_> = MediaCategory::iter().map(|c| c.cache_key()).collect();
        assert_eq!(keys.len(), MediaCategory::iter().count());
    }

    #[test]
    fn slug_round_trips_through_from_str() {
        for category in MediaCategory::iter() {
            assert_eq!(category.as_str().parse::<MediaCategory>(), Ok(category));
            assert_eq!(category.to_string(), category.as_str());
        }
    }

    #[test]
    fn only_gallery_forbids_thumbnails() {
        for category in MediaCategory::iter() {
            assert_eq!(
                category.allows_thumbnail_substitution(),
                category != MediaCategory::Gallery
            );
        }
    }
}
