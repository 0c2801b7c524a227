//! Title and URL resolution
//!
//! Both entry points refuse to touch the extractor when the primary DNS
//! probe fails. Each call builds its own [`ExtractorConfig`] and releases it
//! (and its cookie file) before returning.

use crate::extractor::options::ConfigBuilder;
use crate::extractor::traits::Extractor;
use crate::network::NetworkProbe;
use crate::resolver::search;
use crate::resolver::selector::{self, ResolvedMedia};
use crate::utils::error::ResolverError;
use std::sync::Arc;
use tracing::{error, info};

/// What a caller asked to resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaRequest {
    Url(String),
    Title(String),
}

pub struct MediaResolver {
    probe: Arc<dyn NetworkProbe>,
    extractor: Arc<dyn Extractor>,
    config_builder: ConfigBuilder,
}

impl MediaResolver {
    pub fn new(
        probe: Arc<dyn NetworkProbe>,
        extractor: Arc<dyn Extractor>,
        config_builder: ConfigBuilder,
    ) -> Self {
        Self {
            probe,
            extractor,
            config_builder,
        }
    }

    async fn ensure_dns(&self) -> Result<(), ResolverError> {
        let dns = self.probe.probe_primary().await;
        if dns.resolved {
            Ok(())
        } else {
            error!("Refusing to call extractor: {}", dns.message);
            Err(ResolverError::DnsUnavailable(dns.message))
        }
    }

    /// Turn a free-text title into a canonical media URL
    pub async fn resolve_title(&self, title: &str) -> Result<String, ResolverError> {
        self.ensure_dns().await?;

        let config = self.config_builder.build().await.for_search();
        let found = search::first_match(self.extractor.as_ref(), &config, title).await;
        config.release();

        found.ok_or_else(|| ResolverError::NotFound(title.to_string()))
    }

    /// Extract a URL and select its combined formats, best audio and thumbnail
    pub async fn resolve_url(&self, url: &str) -> Result<ResolvedMedia, ResolverError> {
        self.ensure_dns().await?;

        let config = self.config_builder.build().await;
        let result = self.extractor.extract_info(url, &config).await;
        config.release();

        match result {
            Ok(info) => {
                let media = selector::select(&info);
                info!(
                    "Resolved {} ({} combined formats, audio: {})",
                    url,
                    media.combined_formats.len(),
                    media.best_audio.is_some()
                );
                Ok(media)
            }
            Err(e) => {
                error!("Extraction failed for {}: {}", url, e);
                Err(ResolverError::ExtractionFailed(e.to_string()))
            }
        }
    }

    /// Resolve either shape of request; titles go through the search cascade first
    pub async fn resolve(&self, request: MediaRequest) -> Result<ResolvedMedia, ResolverError> {
        match request {
            MediaRequest::Url(url) => self.resolve_url(&url).await,
            MediaRequest::Title(title) => {
                let url = self.resolve_title(&title).await?;
                self.resolve_url(&url).await
            }
        }
    }
}
