//! mediaresolver - title/URL to media variant resolution service
//!
//! Serves the health, diagnostics and video-info endpoints on top of yt-dlp.

use anyhow::Result;
use clap::Parser;
use mediaresolver::extractor::{ConfigBuilder, Extractor, YtDlpExtractor};
use mediaresolver::network::{NetworkProbe, SystemProbe};
use mediaresolver::resolver::{DiagnosticsBuilder, MediaRequest, MediaResolver};
use mediaresolver::server::{self, AppState};
use mediaresolver::utils::ResolverSettings;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Address to bind the HTTP server to
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    host: IpAddr,

    /// Port to listen on
    #[arg(long, env = "MEDIARESOLVER_PORT", default_value_t = 8000)]
    port: u16,

    /// Resolve a URL (or a title) once, print the JSON and exit
    #[arg(long)]
    resolve: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = ResolverSettings::from_env();
    let probe: Arc<dyn NetworkProbe> = Arc::new(SystemProbe::new(settings.clone()));
    let extractor: Arc<dyn Extractor> =
        Arc::new(YtDlpExtractor::new(settings.ytdlp_path.as_deref()));
    let config_builder = ConfigBuilder::new(settings.clone(), probe.clone());

    let resolver = Arc::new(MediaResolver::new(
        probe.clone(),
        extractor.clone(),
        config_builder.clone(),
    ));

    if let Some(target) = args.resolve {
        return resolve_once(&resolver, target).await;
    }

    let diagnostics = Arc::new(DiagnosticsBuilder::new(
        probe.clone(),
        extractor,
        config_builder,
        settings.smoke_test_url.clone(),
    ));

    let state = AppState {
        probe,
        resolver,
        diagnostics,
    };

    server::serve(SocketAddr::new(args.host, args.port), state).await
}

async fn resolve_once(resolver: &MediaResolver, target: String) -> Result<()> {
    let request = if target.starts_with("http://") || target.starts_with("https://") {
        MediaRequest::Url(target)
    } else {
        MediaRequest::Title(target)
    };

    let media = resolver.resolve(request).await?;
    println!("{}", serde_json::to_string_pretty(&media)?);
    Ok(())
}
