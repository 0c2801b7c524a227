//! Network health probes
//!
//! Two independent DNS checks against the reference host plus a plain HTTP
//! reachability check. None of them return an error: every resolver or
//! transport failure is folded into the probe result so diagnostic callers
//! always get an answer.

use crate::utils::config::ResolverSettings;
use async_trait::async_trait;
use hickory_resolver::config::{NameServerConfigGroup, ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Outcome of a single DNS probe
///
/// Serializes as `{works, message}` like every other diagnostic dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthProbe {
    #[serde(rename = "works")]
    pub resolved: bool,
    pub message: String,
}

impl HealthProbe {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            resolved: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            resolved: false,
            message: message.into(),
        }
    }
}

/// Outcome of a connectivity or smoke check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub works: bool,
    pub message: String,
}

impl CheckOutcome {
    pub fn passed(message: impl Into<String>) -> Self {
        Self {
            works: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            works: false,
            message: message.into(),
        }
    }
}

/// Network health capability consumed by the pipeline and the diagnostics.
///
/// Implementations must be safe to call repeatedly and concurrently.
#[async_trait]
pub trait NetworkProbe: Send + Sync {
    /// Resolve the reference host through the system resolver
    async fn probe_primary(&self) -> HealthProbe;

    /// Resolve the reference host's A record through explicit public nameservers
    async fn probe_alternative(&self) -> HealthProbe;

    /// Fetch the reference page and expect a 200
    async fn check_http(&self) -> CheckOutcome;
}

/// Probe backed by the operating system resolver, hickory and reqwest
pub struct SystemProbe {
    settings: ResolverSettings,
}

impl SystemProbe {
    pub fn new(settings: ResolverSettings) -> Self {
        Self { settings }
    }

    fn alternative_resolver(&self) -> TokioAsyncResolver {
        let group =
            NameServerConfigGroup::from_ips_clear(&self.settings.alternative_nameservers, 53, true);
        let config = ResolverConfig::from_parts(None, vec![], group);
        TokioAsyncResolver::tokio(config, ResolverOpts::default())
    }
}

#[async_trait]
impl NetworkProbe for SystemProbe {
    async fn probe_primary(&self) -> HealthProbe {
        let host = self.settings.reference_host.as_str();
        debug!("Resolving {} via system resolver", host);

        match tokio::net::lookup_host((host, 443)).await {
            Ok(mut addrs) => match addrs.next() {
                Some(_) => HealthProbe::ok("DNS resolution working"),
                None => HealthProbe::failed(format!(
                    "DNS resolution failed: no addresses returned for {}",
                    host
                )),
            },
            Err(e) => HealthProbe::failed(format!("DNS resolution failed: {}", e)),
        }
    }

    async fn probe_alternative(&self) -> HealthProbe {
        let host = self.settings.reference_host.as_str();
        debug!(
            "Resolving {} via {:?}",
            host, self.settings.alternative_nameservers
        );

        match self.alternative_resolver().ipv4_lookup(host).await {
            Ok(answer) => match answer.iter().next() {
                Some(record) => HealthProbe::ok(format!("Alternative DNS works: {}", record)),
                None => HealthProbe::failed("Alternative DNS failed: empty answer"),
            },
            Err(e) => HealthProbe::failed(format!("Alternative DNS failed: {}", e)),
        }
    }

    async fn check_http(&self) -> CheckOutcome {
        let client = match reqwest::Client::builder()
            .timeout(self.settings.http_check_timeout)
            .build()
        {
            Ok(client) => client,
            Err(e) => return CheckOutcome::failed(format!("HTTP connection failed: {}", e)),
        };

        match client.get(&self.settings.reference_url).send().await {
            Ok(response) if response.status() == reqwest::StatusCode::OK => CheckOutcome::passed(
                format!("HTTP connection successful: {}", response.status().as_u16()),
            ),
            Ok(response) => CheckOutcome::failed(format!(
                "HTTP connection returned unexpected status: {}",
                response.status().as_u16()
            )),
            Err(e) => CheckOutcome::failed(format!("HTTP connection failed: {}", e)),
        }
    }
}
