pub mod models;
pub mod options;
pub mod traits;
pub mod ytdlp;

pub use models::{FormatDescriptor, RawMediaInfo, SearchEntry, SearchResults, ThumbnailDescriptor};
pub use options::{ConfigBuilder, CredentialFile, ExtractorConfig};
pub use traits::Extractor;
pub use ytdlp::YtDlpExtractor;
