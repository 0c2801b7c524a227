pub mod diagnostics;
pub mod pipeline;
pub mod search;
pub mod selector;

pub use diagnostics::{DiagnosticReport, DiagnosticsBuilder, ReportOutcome};
pub use pipeline::{MediaRequest, MediaResolver};
pub use selector::{AudioFormat, CombinedFormat, ResolvedMedia};
