//! mediaresolver library
//!
//! Resolves a title or media URL into downloadable variants, with DNS and
//! connectivity diagnostics around an external extractor.

pub mod extractor;
pub mod network;
pub mod resolver;
pub mod server;
pub mod utils;

// Re-export main types for easier use
pub use extractor::{ConfigBuilder, Extractor, ExtractorConfig, YtDlpExtractor};
pub use network::{HealthProbe, NetworkProbe, SystemProbe};
pub use resolver::{DiagnosticReport, DiagnosticsBuilder, MediaRequest, MediaResolver, ResolvedMedia};
pub use utils::{ResolverError, ResolverSettings};
