//! Per-call extractor configuration
//!
//! Every extractor invocation gets its own [`ExtractorConfig`]. When cookies
//! are configured the config owns a [`CredentialFile`] that lives exactly as
//! long as the config: [`ExtractorConfig::release`] deletes it explicitly, and
//! dropping the config on any other path (early return, `?`, panic) deletes it
//! as well.

use crate::network::NetworkProbe;
use crate::utils::config::{ResolverSettings, DEFAULT_USER_AGENT};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Temporary cookie file handed to the extractor
#[derive(Debug)]
pub struct CredentialFile {
    file: NamedTempFile,
}

impl CredentialFile {
    /// Write the cookie blob into a new, uniquely named temp file
    pub fn create(contents: &str) -> std::io::Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("cookies-")
            .suffix(".txt")
            .tempfile()?;
        file.write_all(contents.as_bytes())?;
        file.flush()?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Delete the file. Failures are logged and swallowed.
    pub fn release(self) {
        let path = self.file.path().to_path_buf();
        if let Err(e) = self.file.close() {
            debug!("Failed to remove cookie file {}: {}", path.display(), e);
        }
    }
}

/// Options passed to the extractor for one invocation
#[derive(Debug)]
pub struct ExtractorConfig {
    pub timeout_seconds: u32,
    pub retry_budget: u32,
    pub fragment_retry_budget: u32,
    pub extractor_retry_budget: u32,
    pub file_retry_budget: u32,
    pub sleep_interval: u32,
    pub max_sleep_interval: u32,
    pub force_ipv4: bool,
    pub source_address: String,
    pub user_agent: String,
    pub proxy: Option<String>,
    pub credential_file: Option<CredentialFile>,

    // Search-only switches
    pub flat_extraction: bool,
    pub playlist_window: Option<u32>,
    pub suppress_warnings: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            retry_budget: 5,
            fragment_retry_budget: 5,
            extractor_retry_budget: 3,
            file_retry_budget: 3,
            sleep_interval: 1,
            max_sleep_interval: 5,
            force_ipv4: true,
            source_address: "0.0.0.0".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            proxy: None,
            credential_file: None,
            flat_extraction: false,
            playlist_window: None,
            suppress_warnings: false,
        }
    }
}

impl ExtractorConfig {
    /// Narrow the config for flat, single-window search queries
    pub fn for_search(mut self) -> Self {
        self.flat_extraction = true;
        self.playlist_window = Some(1);
        self.suppress_warnings = true;
        self
    }

    pub fn cookie_path(&self) -> Option<&Path> {
        self.credential_file.as_ref().map(CredentialFile::path)
    }

    /// Release the credential file, if any
    pub fn release(self) {
        if let Some(file) = self.credential_file {
            file.release();
        }
    }

    /// Render the options as yt-dlp command-line flags
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "--socket-timeout".to_string(),
            self.timeout_seconds.to_string(),
            "--retries".to_string(),
            self.retry_budget.to_string(),
            "--fragment-retries".to_string(),
            self.fragment_retry_budget.to_string(),
            "--extractor-retries".to_string(),
            self.extractor_retry_budget.to_string(),
            "--file-access-retries".to_string(),
            self.file_retry_budget.to_string(),
            "--sleep-interval".to_string(),
            self.sleep_interval.to_string(),
            "--max-sleep-interval".to_string(),
            self.max_sleep_interval.to_string(),
            "--source-address".to_string(),
            self.source_address.clone(),
            "--user-agent".to_string(),
            self.user_agent.clone(),
        ];

        if self.force_ipv4 {
            args.push("--force-ipv4".to_string());
        }
        if let Some(proxy) = &self.proxy {
            args.push("--proxy".to_string());
            args.push(proxy.clone());
        }
        if let Some(path) = self.cookie_path() {
            args.push("--cookies".to_string());
            args.push(path.to_string_lossy().to_string());
        }
        if self.flat_extraction {
            args.push("--flat-playlist".to_string());
        }
        if let Some(window) = self.playlist_window {
            args.push("--playlist-items".to_string());
            args.push(window.to_string());
        }
        if self.suppress_warnings {
            args.push("--no-warnings".to_string());
        }

        args
    }
}

/// Assembles a fresh [`ExtractorConfig`] for every extractor call
#[derive(Clone)]
pub struct ConfigBuilder {
    settings: ResolverSettings,
    probe: Arc<dyn NetworkProbe>,
}

impl ConfigBuilder {
    pub fn new(settings: ResolverSettings, probe: Arc<dyn NetworkProbe>) -> Self {
        Self { settings, probe }
    }

    /// Build the baseline config.
    ///
    /// DNS health is probed and logged but never blocks construction; callers
    /// that need a healthy resolver check it themselves.
    pub async fn build(&self) -> ExtractorConfig {
        let dns = self.probe.probe_primary().await;
        if dns.resolved {
            debug!("DNS check before extraction: {}", dns.message);
        } else {
            warn!("DNS issue: {}", dns.message);
            let alternative = self.probe.probe_alternative().await;
            info!("Alternative DNS: {}", alternative.message);
        }

        let credential_file = match self.settings.cookies.as_deref() {
            Some(cookies) => match CredentialFile::create(cookies) {
                Ok(file) => {
                    debug!("Wrote cookie file to {}", file.path().display());
                    Some(file)
                }
                Err(e) => {
                    warn!("Failed to create cookie file: {}", e);
                    None
                }
            },
            None => None,
        };

        ExtractorConfig {
            user_agent: self.settings.user_agent.clone(),
            proxy: self.settings.proxy.clone(),
            credential_file,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{CheckOutcome, HealthProbe};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProbe {
        healthy: bool,
        alternative_calls: AtomicUsize,
    }

    #[async_trait]
    impl NetworkProbe for CountingProbe {
        async fn probe_primary(&self) -> HealthProbe {
            if self.healthy {
                HealthProbe::ok("DNS resolution working")
            } else {
                HealthProbe::failed("DNS resolution failed: test")
            }
        }

        async fn probe_alternative(&self) -> HealthProbe {
            self.alternative_calls.fetch_add(1, Ordering::SeqCst);
            HealthProbe::failed("Alternative DNS failed: test")
        }

        async fn check_http(&self) -> CheckOutcome {
            CheckOutcome::passed("HTTP connection successful: 200")
        }
    }

    fn builder(settings: ResolverSettings, healthy: bool) -> (ConfigBuilder, Arc<CountingProbe>) {
        let probe = Arc::new(CountingProbe {
            healthy,
            alternative_calls: AtomicUsize::new(0),
        });
        (ConfigBuilder::new(settings, probe.clone()), probe)
    }

    #[test]
    fn test_baseline_args() {
        let args = ExtractorConfig::default().to_args();
        let joined = args.join(" ");
        assert!(joined.contains("--socket-timeout 30"));
        assert!(joined.contains("--retries 5"));
        assert!(joined.contains("--fragment-retries 5"));
        assert!(joined.contains("--extractor-retries 3"));
        assert!(joined.contains("--file-access-retries 3"));
        assert!(joined.contains("--sleep-interval 1"));
        assert!(joined.contains("--max-sleep-interval 5"));
        assert!(joined.contains("--source-address 0.0.0.0"));
        assert!(args.contains(&"--force-ipv4".to_string()));
        assert!(!args.contains(&"--proxy".to_string()));
        assert!(!args.contains(&"--cookies".to_string()));
        assert!(!args.contains(&"--flat-playlist".to_string()));
    }

    #[test]
    fn test_search_args() {
        let args = ExtractorConfig::default().for_search().to_args();
        let joined = args.join(" ");
        assert!(joined.contains("--flat-playlist"));
        assert!(joined.contains("--playlist-items 1"));
        assert!(joined.contains("--no-warnings"));
    }

    #[tokio::test]
    async fn test_build_copies_proxy() {
        let settings = ResolverSettings {
            proxy: Some("socks5://127.0.0.1:1080".to_string()),
            ..Default::default()
        };
        let (builder, _) = builder(settings, true);
        let config = builder.build().await;
        assert_eq!(config.proxy.as_deref(), Some("socks5://127.0.0.1:1080"));
        assert!(config.credential_file.is_none());
        assert!(config
            .to_args()
            .windows(2)
            .any(|w| w[0] == "--proxy" && w[1] == "socks5://127.0.0.1:1080"));
    }

    #[tokio::test]
    async fn test_cookie_file_written_and_released() {
        let settings = ResolverSettings {
            cookies: Some("# Netscape HTTP Cookie File\n".to_string()),
            ..Default::default()
        };
        let (builder, _) = builder(settings, true);
        let config = builder.build().await;

        let path = config.cookie_path().expect("cookie file").to_path_buf();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "# Netscape HTTP Cookie File\n"
        );
        assert!(config.to_args().contains(&path.to_string_lossy().to_string()));

        config.release();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_cookie_file_removed_on_drop() {
        let settings = ResolverSettings {
            cookies: Some("cookie".to_string()),
            ..Default::default()
        };
        let (builder, _) = builder(settings, true);
        let config = builder.build().await;
        let path = config.cookie_path().unwrap().to_path_buf();

        drop(config);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_release_swallows_missing_file() {
        let file = CredentialFile::create("cookie").unwrap();
        std::fs::remove_file(file.path()).unwrap();
        file.release();
    }

    #[tokio::test]
    async fn test_dns_failure_does_not_block_build() {
        let (builder, probe) = builder(ResolverSettings::default(), false);
        let config = builder.build().await;
        assert_eq!(config.timeout_seconds, 30);
        assert_eq!(probe.alternative_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_healthy_dns_skips_alternative_probe() {
        let (builder, probe) = builder(ResolverSettings::default(), true);
        builder.build().await;
        assert_eq!(probe.alternative_calls.load(Ordering::SeqCst), 0);
    }
}
