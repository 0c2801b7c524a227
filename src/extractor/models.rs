//! Raw extractor output
//!
//! These mirror the subset of yt-dlp's JSON the pipeline reads. Every field
//! except `format_id` may be missing upstream, so they are all optional and
//! missing values stay `None` rather than collapsing to zero.

use serde::{Deserialize, Deserializer, Serialize};

/// Candidate media stream as reported by the extractor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormatDescriptor {
    #[serde(default)]
    pub format_id: String,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default, deserialize_with = "lenient_size")]
    pub filesize: Option<u64>,
    #[serde(default, deserialize_with = "lenient_size")]
    pub filesize_approx: Option<u64>,
    #[serde(default)]
    pub acodec: Option<String>,
    #[serde(default)]
    pub vcodec: Option<String>,
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(default)]
    pub abr: Option<f64>, // Audio bitrate (kbps)
    #[serde(default)]
    pub url: Option<String>,
}

impl FormatDescriptor {
    /// Exact size when known, otherwise the estimate
    pub fn best_filesize(&self) -> Option<u64> {
        self.filesize.or(self.filesize_approx)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThumbnailDescriptor {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
}

/// Metadata returned for a single resolved URL
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMediaInfo {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub formats: Vec<FormatDescriptor>,
    #[serde(default)]
    pub thumbnails: Vec<ThumbnailDescriptor>,
    /// Single default thumbnail
    #[serde(default)]
    pub thumbnail: Option<String>,
}

/// One hit of a flat search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Playlist-shaped answer to a search query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    /// Entries in ranking order; yt-dlp emits `null` for entries it could not resolve
    #[serde(default)]
    pub entries: Vec<Option<SearchEntry>>,
}

impl SearchResults {
    /// URL of the top-ranked entry, if it has one
    pub fn first_url(&self) -> Option<&str> {
        self.entries
            .first()
            .and_then(|entry| entry.as_ref())
            .and_then(|entry| entry.url.as_deref())
    }
}

/// yt-dlp reports sizes as integers but estimates occasionally arrive as floats
fn lenient_size<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Number>::deserialize(deserializer)?;
    Ok(value.and_then(|n| {
        n.as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64))
    }))
}
