//! Error handling for the resolution pipeline

use thiserror::Error;

/// Main error type for mediaresolver
#[derive(Debug, Error)]
pub enum ResolverError {
    /// Primary DNS resolution of the reference host failed
    #[error("DNS resolution failed for YouTube: {0}. Please check your network connection or DNS settings.")]
    DnsUnavailable(String),

    /// Every search variant was exhausted without a usable result
    #[error("No videos found for '{0}'. This might be due to network issues or the video not existing.")]
    NotFound(String),

    /// The extractor raised for a resolvable URL
    #[error("Error extracting video info: {0}")]
    ExtractionFailed(String),

    #[error("yt-dlp not found. Please install yt-dlp")]
    YtDlpNotFound,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
