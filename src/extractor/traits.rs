use crate::extractor::models::{RawMediaInfo, SearchResults};
use crate::extractor::options::ExtractorConfig;
use anyhow::Result;
use async_trait::async_trait;

/// Capability interface over the external media-metadata extractor
///
/// The pipeline only decides *what* to ask and *how* to read the answer; any
/// backend (yt-dlp, a mock in tests) can sit behind this trait.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Returns a unique identifier for this extractor (e.g., "ytdlp")
    fn id(&self) -> &'static str;

    /// Runs a search-engine style query (e.g. `ytsearch1:<title>`)
    async fn search(&self, query: &str, config: &ExtractorConfig) -> Result<SearchResults>;

    /// Extracts full metadata for a media URL without downloading it
    async fn extract_info(&self, url: &str, config: &ExtractorConfig) -> Result<RawMediaInfo>;
}
