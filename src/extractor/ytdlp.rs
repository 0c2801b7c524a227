//! yt-dlp wrapper for metadata extraction
//!
//! Each call spawns `yt-dlp --dump-single-json --skip-download` with the flags
//! rendered from the call's [`ExtractorConfig`]. The binary is located once,
//! when the extractor is constructed.

use crate::extractor::models::{RawMediaInfo, SearchResults};
use crate::extractor::options::ExtractorConfig;
use crate::extractor::traits::Extractor;
use crate::utils::error::ResolverError;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, error, info, warn};

/// Extractor backed by the yt-dlp command-line tool
///
/// A missing binary does not stop construction: every call then fails with
/// [`ResolverError::YtDlpNotFound`], which the diagnostics report as a broken
/// extractor instead of the service refusing to start.
pub struct YtDlpExtractor {
    ytdlp_path: Option<PathBuf>,
}

impl YtDlpExtractor {
    /// Locate yt-dlp, preferring an explicitly configured binary
    pub fn new(explicit: Option<&Path>) -> Self {
        if let Some(path) = explicit {
            if is_executable(path) {
                info!("Using configured yt-dlp: {}", path.display());
                return Self::with_path(Some(path.to_path_buf()));
            }
            warn!(
                "Configured yt-dlp {} is not executable, falling back to discovery",
                path.display()
            );
        }

        let found = find_ytdlp();
        if found.is_none() {
            error!("yt-dlp not found anywhere! Extraction requests will fail until it is installed");
        }
        Self::with_path(found)
    }

    /// Use a known binary, or none at all
    pub fn with_path(ytdlp_path: Option<PathBuf>) -> Self {
        Self { ytdlp_path }
    }

    /// Get the path to yt-dlp being used
    pub fn ytdlp_path(&self) -> Option<&Path> {
        self.ytdlp_path.as_deref()
    }

    async fn run_json<T: DeserializeOwned>(
        &self,
        target: &str,
        config: &ExtractorConfig,
    ) -> Result<T> {
        let ytdlp_path = self.ytdlp_path.as_ref().ok_or(ResolverError::YtDlpNotFound)?;

        let output = Command::new(ytdlp_path)
            .arg("--dump-single-json")
            .arg("--skip-download")
            .args(config.to_args())
            .arg("--")
            .arg(target)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(ResolverError::from)?;

        if !output.status.success() {
            let error_msg = String::from_utf8_lossy(&output.stderr);
            error!("yt-dlp failed for {}: {}", target, error_msg.trim());
            return Err(anyhow!(
                "yt-dlp exited with {}: {}",
                output.status,
                error_msg.trim()
            ));
        }

        let parsed = serde_json::from_slice(&output.stdout).map_err(ResolverError::from)?;
        Ok(parsed)
    }
}

#[async_trait]
impl Extractor for YtDlpExtractor {
    fn id(&self) -> &'static str {
        "yt-dlp"
    }

    async fn search(&self, query: &str, config: &ExtractorConfig) -> Result<SearchResults> {
        debug!("Running search query: {}", query);
        self.run_json(query, config).await
    }

    async fn extract_info(&self, url: &str, config: &ExtractorConfig) -> Result<RawMediaInfo> {
        debug!("Extracting media info for URL: {}", url);
        self.run_json(url, config).await
    }
}

// ============================================================
// yt-dlp Detection Functions
// ============================================================

/// Find yt-dlp binary with priority:
/// 1. System PATH
/// 2. Common installation paths
pub fn find_ytdlp() -> Option<PathBuf> {
    if let Ok(path) = which::which("yt-dlp") {
        info!("✓ Using system yt-dlp: {:?}", path);
        return Some(path);
    }

    if let Some(common) = find_in_common_paths() {
        info!("✓ Using yt-dlp from common path: {:?}", common);
        return Some(common);
    }

    warn!("✗ yt-dlp not found anywhere!");
    None
}

/// Find yt-dlp in common installation paths
fn find_in_common_paths() -> Option<PathBuf> {
    let mut candidates: Vec<PathBuf> = [
        // Homebrew (Apple Silicon)
        "/opt/homebrew/bin/yt-dlp",
        // Homebrew (Intel) / manual installs
        "/usr/local/bin/yt-dlp",
        // Distribution packages
        "/usr/bin/yt-dlp",
    ]
    .iter()
    .map(PathBuf::from)
    .collect();

    // pip --user
    if let Some(home) = std::env::var_os("HOME") {
        candidates.push(PathBuf::from(home).join(".local/bin/yt-dlp"));
    }

    candidates.into_iter().find(|path| is_executable(path))
}

/// Check if a file is executable
fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        std::fs::metadata(path)
            .map(|metadata| metadata.is_file() && metadata.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }

    #[cfg(not(unix))]
    {
        path.is_file()
    }
}

// ============================================================
// Tests
// ============================================================
