//! External video thumbnail helpers.

use regex::Regex;
use std::sync::LazyLock;

static VIDEO_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:youtube\.com/(?:watch\?(?:[^#]*&)?v=|embed/|shorts/|v/)|youtu\.be/|img\.youtube\.com/vi(?:_webp)?/|i\d?\.ytimg\.com/vi(?:_webp)?/)([A-Za-z0-9_-]+)",
    )
    .expect("Valid video id regex")
});

static THUMBNAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^https?://(?:img\.youtube\.com|i\d?\.ytimg\.com)/vi(?:_webp)?/([A-Za-z0-9_-]+)/([A-Za-z0-9_]+)\.(?:jpg|webp)(?:[?#].*)?$",
    )
    .expect("Valid thumbnail regex")
});

/// Thumbnail sizes tried, in order, when a video thumbnail fails to load.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter, derive_more::Display,
)]
pub enum ThumbnailQuality {
    /// Highest resolution, missing for many uploads
    #[display("maxresdefault")]
    MaxResDefault,
    /// Medium resolution
    #[display("mqdefault")]
    MqDefault,
    /// First generated frame, always present
    #[display("0")]
    Frame,
}

impl ThumbnailQuality {
    /// First quality attempted.
    pub const FIRST: ThumbnailQuality = ThumbnailQuality::MaxResDefault;

    /// File stem used in the thumbnail URL.
    pub fn as_str(&self) -> &'static str {
        match self {
            ThumbnailQuality::MaxResDefault => "maxresdefault",
            ThumbnailQuality::MqDefault => "mqdefault",
            ThumbnailQuality::Frame => "0",
        }
    }

    /// The next quality to try, or `None` after the last one.
    pub fn next(&self) -> Option<ThumbnailQuality> {
        match self {
            ThumbnailQuality::MaxResDefault => Some(ThumbnailQuality::MqDefault),
            ThumbnailQuality::MqDefault => Some(ThumbnailQuality::Frame),
            ThumbnailQuality::Frame => None,
        }
    }

    /// Parse a URL file stem.
    pub fn from_stem(stem: &str) -> Option<ThumbnailQuality> {
        match stem {
            "maxresdefault" => Some(ThumbnailQuality::MaxResDefault),
            "mqdefault" => Some(ThumbnailQuality::MqDefault),
            "0" => Some(ThumbnailQuality::Frame),
            _ => None,
        }
    }
}

/// Extract a video id from a watch, short, embed or thumbnail URL.
///
/// # Examples
///
/// ```
/// use vitrine_core::youtube_id;
///
/// assert_eq!(youtube_id("https://www.youtube.com/watch?v=abc123").as_deref(), Some("abc123"));
/// assert_eq!(youtube_id("https://youtu.be/abc123?t=4").as_deref(), Some("abc123"));
/// assert_eq!(youtube_id("/uploads/videos/clip.jpg"), None);
/// ```
pub fn youtube_id(url: &str) -> Option<String> {
    VIDEO_ID
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Thumbnail URL for a video id at the given quality.
pub fn youtube_thumbnail(id: &str, quality: ThumbnailQuality) -> String {
    format!("https://img.youtube.com/vi/{}/{}.jpg", id, quality.as_str())
}

/// Split a thumbnail URL into its video id and file stem.
///
/// The stem is returned verbatim so callers can tell ladder qualities from
/// other sizes such as `hqdefault`.
pub fn youtube_thumbnail_parts(url: &str) -> Option<(String, String)> {
    let caps = THUMBNAIL.captures(url.trim())?;
    Some((caps.get(1)?.as_str().to_string(), caps.get(2)?.as_str().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ladder_ends_at_frame() {
        let mut quality = ThumbnailQuality::FIRST;
        let mut seen = vec![quality];
        while let Some(next) = quality.next() {
            seen.push(next);
            quality = next;
        }
        assert_eq!(
            seen,
            vec![
                ThumbnailQuality::MaxResDefault,
                ThumbnailQuality::MqDefault,
                ThumbnailQuality::Frame
            ]
        );
    }

    #[test]
    fn thumbnail_parts_round_trip() {
        let url = youtube_thumbnail("abc123", ThumbnailQuality::MqDefault);
        assert_eq!(url, "https://img.youtube.com/vi/abc123/mqdefault.jpg");
        assert_eq!(
            youtube_thumbnail_parts(&url),
            Some(("abc123".to_string(), "mqdefault".to_string()))
        );
    }

    #[test]
    fn ids_from_embed_and_thumbnail_hosts() {
        assert_eq!(
            youtube_id("https://www.youtube.com/embed/XyZ_9-k").as_deref(),
            Some("XyZ_9-k")
        );
        assert_eq!(
            youtube_id("https://i.ytimg.com/vi/abc123/hqdefault.jpg").as_deref(),
            Some("abc123")
        );
        assert_eq!(
            youtube_id("https://www.youtube.com/watch?feature=share&v=abc123").as_deref(),
            Some("abc123")
        );
    }

    #[test]
    fn non_thumbnail_urls_have_no_parts() {
        assert_eq!(youtube_thumbnail_parts("https://youtu.be/abc123"), None);
        assert_eq!(youtube_thumbnail_parts("/images/placeholders/video.jpg"), None);
    }
}
