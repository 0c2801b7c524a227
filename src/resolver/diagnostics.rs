//! Troubleshooting report
//!
//! Runs both DNS probes, the HTTP reachability check and one live smoke
//! extraction, then attaches remediation advice for every failing dimension.
//! The smoke extraction always runs, even when DNS is already known to be
//! broken.

use crate::extractor::options::ConfigBuilder;
use crate::extractor::traits::Extractor;
use crate::network::{CheckOutcome, HealthProbe, NetworkProbe};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

const DNS_RECOMMENDATIONS: [&str; 4] = [
    "Check your internet connection",
    "Try using Google DNS (8.8.8.8, 8.8.4.4) or Cloudflare DNS (1.1.1.1)",
    "Flush your DNS cache",
    "Check if you're behind a firewall or proxy that blocks YouTube",
];

const HTTP_RECOMMENDATIONS: [&str; 3] = [
    "Check if YouTube is accessible from your location",
    "Try using a VPN if YouTube is blocked",
    "Check proxy settings if you're in a corporate environment",
];

const EXTRACTOR_RECOMMENDATIONS: [&str; 3] = [
    "Update yt-dlp to the latest version",
    "Check if your IP is rate-limited by YouTube",
    "Try using cookies if you have a YouTube account",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticReport {
    #[serde(rename = "dns_resolution")]
    pub dns: HealthProbe,
    pub alternative_dns: HealthProbe,
    #[serde(rename = "http_connection")]
    pub http: CheckOutcome,
    #[serde(rename = "ytdlp_functionality")]
    pub extractor: CheckOutcome,
    pub recommendations: Vec<String>,
}

impl DiagnosticReport {
    pub fn http_reachable(&self) -> bool {
        self.http.works
    }

    pub fn extractor_functional(&self) -> bool {
        self.extractor.works
    }
}

/// What the diagnostics endpoint returns: a full report, or a minimal
/// error shape when building the report blew up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReportOutcome {
    Report(DiagnosticReport),
    Failed { error: String, status: String },
}

/// Remediation advice, concatenated in DNS, HTTP, extractor order
pub fn recommendations(dns_works: bool, http_works: bool, extractor_works: bool) -> Vec<String> {
    let mut advice = Vec::new();
    if !dns_works {
        advice.extend(DNS_RECOMMENDATIONS.iter().map(|s| s.to_string()));
    }
    if !http_works {
        advice.extend(HTTP_RECOMMENDATIONS.iter().map(|s| s.to_string()));
    }
    if !extractor_works {
        advice.extend(EXTRACTOR_RECOMMENDATIONS.iter().map(|s| s.to_string()));
    }
    advice
}

pub struct DiagnosticsBuilder {
    probe: Arc<dyn NetworkProbe>,
    extractor: Arc<dyn Extractor>,
    config_builder: ConfigBuilder,
    smoke_test_url: String,
}

impl DiagnosticsBuilder {
    pub fn new(
        probe: Arc<dyn NetworkProbe>,
        extractor: Arc<dyn Extractor>,
        config_builder: ConfigBuilder,
        smoke_test_url: impl Into<String>,
    ) -> Self {
        Self {
            probe,
            extractor,
            config_builder,
            smoke_test_url: smoke_test_url.into(),
        }
    }

    async fn smoke_test(&self) -> CheckOutcome {
        let config = self.config_builder.build().await;
        let result = self
            .extractor
            .extract_info(&self.smoke_test_url, &config)
            .await;
        config.release();

        match result {
            Ok(_) => CheckOutcome::passed(format!("{} working correctly", self.extractor.id())),
            Err(e) => CheckOutcome::failed(format!("{} failed: {}", self.extractor.id(), e)),
        }
    }

    pub async fn build_report(&self) -> DiagnosticReport {
        let (dns, alternative_dns, http, extractor) = tokio::join!(
            self.probe.probe_primary(),
            self.probe.probe_alternative(),
            self.probe.check_http(),
            self.smoke_test(),
        );

        let recommendations = recommendations(dns.resolved, http.works, extractor.works);
        info!(
            "Diagnostics: dns={} alternative_dns={} http={} extractor={}",
            dns.resolved, alternative_dns.resolved, http.works, extractor.works
        );

        DiagnosticReport {
            dns,
            alternative_dns,
            http,
            extractor,
            recommendations,
        }
    }

    /// Build the report on its own task so a panic anywhere inside becomes
    /// an error-shaped outcome instead of tearing down the request.
    pub async fn run(self: &Arc<Self>) -> ReportOutcome {
        let builder = Arc::clone(self);
        match tokio::spawn(async move { builder.build_report().await }).await {
            Ok(report) => ReportOutcome::Report(report),
            Err(e) => {
                error!("Diagnostics task failed: {}", e);
                ReportOutcome::Failed {
                    error: e.to_string(),
                    status: "failed".to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::models::{RawMediaInfo, SearchResults};
    use crate::extractor::options::ExtractorConfig;
    use crate::utils::config::ResolverSettings;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Probe {
        dns: bool,
        http: bool,
    }

    #[async_trait]
    impl NetworkProbe for Probe {
        async fn probe_primary(&self) -> HealthProbe {
            if self.dns {
                HealthProbe::ok("DNS resolution working")
            } else {
                HealthProbe::failed("DNS resolution failed: test")
            }
        }

        async fn probe_alternative(&self) -> HealthProbe {
            HealthProbe::ok("Alternative DNS works: 142.250.74.46")
        }

        async fn check_http(&self) -> CheckOutcome {
            if self.http {
                CheckOutcome::passed("HTTP connection successful: 200")
            } else {
                CheckOutcome::failed("HTTP connection failed: timed out")
            }
        }
    }

    struct Smoke {
        works: bool,
        panics: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Extractor for Smoke {
        fn id(&self) -> &'static str {
            "yt-dlp"
        }

        async fn search(&self, _query: &str, _config: &ExtractorConfig) -> Result<SearchResults> {
            Ok(SearchResults::default())
        }

        async fn extract_info(&self, _url: &str, _config: &ExtractorConfig) -> Result<RawMediaInfo> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.panics {
                panic!("extractor exploded");
            }
            if self.works {
                Ok(RawMediaInfo::default())
            } else {
                Err(anyhow!("HTTP Error 403: Forbidden"))
            }
        }
    }

    fn builder(dns: bool, http: bool, extractor: Arc<Smoke>) -> Arc<DiagnosticsBuilder> {
        let probe: Arc<dyn NetworkProbe> = Arc::new(Probe { dns, http });
        let settings = ResolverSettings::default();
        let url = settings.smoke_test_url.clone();
        Arc::new(DiagnosticsBuilder::new(
            probe.clone(),
            extractor,
            ConfigBuilder::new(settings, probe),
            url,
        ))
    }

    fn smoke(works: bool) -> Arc<Smoke> {
        Arc::new(Smoke {
            works,
            panics: false,
            calls: AtomicUsize::new(0),
        })
    }

    #[test]
    fn test_all_healthy_has_no_advice() {
        assert!(recommendations(true, true, true).is_empty());
    }

    #[test]
    fn test_advice_order_and_sizes() {
        let all = recommendations(false, false, false);
        assert_eq!(all.len(), 10);
        assert_eq!(all[0], "Check your internet connection");
        assert_eq!(all[4], "Check if YouTube is accessible from your location");
        assert_eq!(all[7], "Update yt-dlp to the latest version");

        assert_eq!(recommendations(true, false, true).len(), 3);
        assert_eq!(
            recommendations(false, true, false),
            DNS_RECOMMENDATIONS
                .iter()
                .chain(EXTRACTOR_RECOMMENDATIONS.iter())
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
        );
    }

    #[tokio::test]
    async fn test_smoke_test_runs_even_when_dns_fails() {
        let extractor = smoke(false);
        let report = builder(false, false, extractor.clone()).build_report().await;

        assert_eq!(extractor.calls.load(Ordering::SeqCst), 1);
        assert!(!report.dns.resolved);
        assert!(!report.http_reachable());
        assert!(!report.extractor_functional());
        assert_eq!(report.extractor.message, "yt-dlp failed: HTTP Error 403: Forbidden");
        assert_eq!(report.recommendations.len(), 10);
    }

    #[tokio::test]
    async fn test_healthy_report_json_shape() {
        let report = builder(true, true, smoke(true)).build_report().await;
        let json = serde_json::to_value(ReportOutcome::Report(report)).unwrap();

        for dimension in [
            "dns_resolution",
            "alternative_dns",
            "http_connection",
            "ytdlp_functionality",
        ] {
            assert!(json[dimension]["works"].is_boolean(), "{dimension} lacks works");
            assert!(json[dimension]["message"].is_string());
        }
        assert_eq!(json["dns_resolution"]["works"], true);
        assert_eq!(json["http_connection"]["works"], true);
        assert_eq!(json["ytdlp_functionality"]["message"], "yt-dlp working correctly");
        assert_eq!(json["recommendations"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_panic_degrades_to_failed_outcome() {
        let extractor = Arc::new(Smoke {
            works: true,
            panics: true,
            calls: AtomicUsize::new(0),
        });
        let outcome = builder(true, true, extractor).run().await;

        match outcome {
            ReportOutcome::Failed { status, .. } => assert_eq!(status, "failed"),
            other => panic!("expected failure shape, got {other:?}"),
        }
        let json = serde_json::to_value(ReportOutcome::Failed {
            error: "boom".to_string(),
            status: "failed".to_string(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"error": "boom", "status": "failed"}));
    }
}
