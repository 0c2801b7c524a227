//! Resolver configuration

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::time::Duration;

/// Desktop Chrome user-agent sent to the extractor
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Settings shared by the probes, the config builder and the pipeline.
///
/// Built once at startup and handed to every component explicitly; nothing in
/// the pipeline reads the process environment on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverSettings {
    /// Hostname used by the DNS probes
    pub reference_host: String,

    /// Page fetched by the plain HTTP connectivity check
    pub reference_url: String,

    /// Known-good media URL used by the extractor smoke test
    pub smoke_test_url: String,

    /// Public resolvers queried by the alternative DNS probe
    pub alternative_nameservers: Vec<IpAddr>,

    /// Timeout for the HTTP connectivity check
    pub http_check_timeout: Duration,

    pub user_agent: String,

    /// Proxy URL forwarded to the extractor
    pub proxy: Option<String>,

    /// Raw Netscape cookie-file content
    pub cookies: Option<String>,

    /// Explicit yt-dlp binary, skips discovery when set
    pub ytdlp_path: Option<PathBuf>,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            reference_host: "www.youtube.com".to_string(),
            reference_url: "https://www.youtube.com".to_string(),
            smoke_test_url: "https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string(),
            alternative_nameservers: vec![
                IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)),
                IpAddr::V4(Ipv4Addr::new(8, 8, 4, 4)),
            ],
            http_check_timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            proxy: None,
            cookies: None,
            ytdlp_path: None,
        }
    }
}

impl ResolverSettings {
    /// Read the recognized inputs from the process environment
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Build settings from an arbitrary set of variables.
    ///
    /// `HTTP_PROXY` wins over `HTTPS_PROXY`; empty values count as unset.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut http_proxy = None;
        let mut https_proxy = None;
        let mut cookies = None;
        let mut ytdlp_path = None;

        for (key, value) in vars {
            let value: String = value.into();
            if value.trim().is_empty() {
                continue;
            }
            match key.as_ref() {
                "HTTP_PROXY" => http_proxy = Some(value),
                "HTTPS_PROXY" => https_proxy = Some(value),
                "YOUTUBE_COOKIES" => cookies = Some(value),
                "YTDLP_PATH" => ytdlp_path = Some(PathBuf::from(value)),
                _ => {}
            }
        }

        Self {
            proxy: http_proxy.or(https_proxy),
            cookies,
            ytdlp_path,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = ResolverSettings::default();
        assert_eq!(settings.reference_host, "www.youtube.com");
        assert_eq!(settings.alternative_nameservers.len(), 2);
        assert_eq!(settings.http_check_timeout, Duration::from_secs(10));
        assert!(settings.proxy.is_none());
        assert!(settings.cookies.is_none());
    }

    #[test]
    fn test_http_proxy_preferred_over_https() {
        let settings = ResolverSettings::from_vars([
            ("HTTPS_PROXY", "http://secure:3128"),
            ("HTTP_PROXY", "http://plain:3128"),
        ]);
        assert_eq!(settings.proxy.as_deref(), Some("http://plain:3128"));
    }

    #[test]
    fn test_https_proxy_used_when_http_missing() {
        let settings = ResolverSettings::from_vars([("HTTPS_PROXY", "http://secure:3128")]);
        assert_eq!(settings.proxy.as_deref(), Some("http://secure:3128"));
    }

    #[test]
    fn test_empty_values_are_ignored() {
        let settings = ResolverSettings::from_vars([
            ("HTTP_PROXY", ""),
            ("YOUTUBE_COOKIES", "   "),
            ("PATH", "/usr/bin"),
        ]);
        assert!(settings.proxy.is_none());
        assert!(settings.cookies.is_none());
        assert!(settings.ytdlp_path.is_none());
    }

    #[test]
    fn test_cookies_and_binary_path() {
        let settings = ResolverSettings::from_vars([
            ("YOUTUBE_COOKIES", "# Netscape HTTP Cookie File"),
            ("YTDLP_PATH", "/opt/bin/yt-dlp"),
        ]);
        assert_eq!(
            settings.cookies.as_deref(),
            Some("# Netscape HTTP Cookie File")
        );
        assert_eq!(settings.ytdlp_path, Some(PathBuf::from("/opt/bin/yt-dlp")));
    }
}
