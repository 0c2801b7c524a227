//! Format selection over raw extractor output
//!
//! Pure functions: no I/O, no logging. Missing upstream fields are treated as
//! unknown, with two exceptions: a missing audio bitrate ranks as 0 and a
//! missing thumbnail width ranks as 0.

use crate::extractor::models::{FormatDescriptor, RawMediaInfo, ThumbnailDescriptor};
use serde::{Deserialize, Serialize};

/// Container the platform uses for its audio-only streams
pub const AUDIO_ONLY_EXT: &str = "m4a";

pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// A stream carrying both audio and video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedFormat {
    pub format_id: String,
    pub resolution: String,
    pub filesize: Option<u64>,
    pub url: Option<String>,
}

/// The highest-bitrate audio-only stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioFormat {
    pub format_id: String,
    pub bitrate: Option<f64>,
    pub filesize: Option<u64>,
    pub url: Option<String>,
}

/// Final output of the pipeline for one media resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedMedia {
    pub title: String,
    /// Upstream order, filtered but never re-sorted
    #[serde(rename = "formats")]
    pub combined_formats: Vec<CombinedFormat>,
    #[serde(rename = "highest_audio")]
    pub best_audio: Option<AudioFormat>,
    pub thumbnail: Option<String>,
}

fn codec_present(codec: Option<&str>) -> bool {
    codec != Some("none")
}

/// True when neither codec is marked "none"
pub fn is_combined(format: &FormatDescriptor) -> bool {
    codec_present(format.acodec.as_deref()) && codec_present(format.vcodec.as_deref())
}

/// True for audio-only streams in the platform's audio container
pub fn is_audio_only_candidate(format: &FormatDescriptor) -> bool {
    codec_present(format.acodec.as_deref())
        && format.vcodec.as_deref() == Some("none")
        && format.ext.as_deref() == Some(AUDIO_ONLY_EXT)
}

pub fn combined_formats(formats: &[FormatDescriptor]) -> Vec<CombinedFormat> {
    formats
        .iter()
        .filter(|f| is_combined(f))
        .map(|f| CombinedFormat {
            format_id: f.format_id.clone(),
            resolution: f.resolution.clone().unwrap_or_else(|| "N/A".to_string()),
            filesize: f.best_filesize(),
            url: f.url.clone(),
        })
        .collect()
}

/// Highest `abr` among audio-only candidates; the first one wins ties.
pub fn best_audio(formats: &[FormatDescriptor]) -> Option<AudioFormat> {
    let mut best: Option<&FormatDescriptor> = None;
    for candidate in formats.iter().filter(|f| is_audio_only_candidate(f)) {
        let bitrate = candidate.abr.unwrap_or(0.0);
        match best {
            Some(current) if bitrate <= current.abr.unwrap_or(0.0) => {}
            _ => best = Some(candidate),
        }
    }

    best.map(|f| AudioFormat {
        format_id: f.format_id.clone(),
        bitrate: f.abr,
        filesize: f.best_filesize(),
        url: f.url.clone(),
    })
}

/// Widest thumbnail's URL, falling back to the default thumbnail.
///
/// The running maximum starts at width 0 and only a strictly wider entry
/// replaces it, so entries without a width never win and ties keep the first.
pub fn best_thumbnail(thumbnails: &[ThumbnailDescriptor], default: Option<&str>) -> Option<String> {
    let mut max_width = 0;
    let mut best: Option<&ThumbnailDescriptor> = None;
    for thumb in thumbnails {
        let width = thumb.width.unwrap_or(0);
        if width > max_width {
            max_width = width;
            best = Some(thumb);
        }
    }

    best.and_then(|t| t.url.clone())
        .or_else(|| default.map(str::to_string))
}

/// Derive the canonical media description from a raw extractor result
pub fn select(info: &RawMediaInfo) -> ResolvedMedia {
    ResolvedMedia {
        title: info
            .title
            .clone()
            .unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
        combined_formats: combined_formats(&info.formats),
        best_audio: best_audio(&info.formats),
        thumbnail: best_thumbnail(&info.thumbnails, info.thumbnail.as_deref()),
    }
}
