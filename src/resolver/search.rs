//! Cascading title search
//!
//! A title is tried against the search index with a short, fixed list of
//! query shapes. The first attempt whose top entry carries a URL wins; a
//! failing attempt is logged and the next one is tried.

use crate::extractor::options::ExtractorConfig;
use crate::extractor::traits::Extractor;
use tracing::{debug, info, warn};

/// Result counts requested by each attempt, narrowest first
pub const SEARCH_WINDOWS: [usize; 2] = [1, 5];

/// Query strings for every attempt, in the order they are tried
pub fn search_queries(title: &str) -> Vec<String> {
    SEARCH_WINDOWS
        .iter()
        .map(|count| format!("ytsearch{}:{}", count, title))
        .collect()
}

/// Run the cascade and return the first usable URL.
///
/// Makes at most one extractor call per entry of [`SEARCH_WINDOWS`]. Errors
/// never escape: each one just moves the cascade to the next query.
pub async fn first_match(
    extractor: &dyn Extractor,
    config: &ExtractorConfig,
    title: &str,
) -> Option<String> {
    for query in search_queries(title) {
        info!("Searching with query: {}", query);

        match extractor.search(&query, config).await {
            Ok(results) => match results.first_url() {
                Some(url) => {
                    debug!("Query {} matched {}", query, url);
                    return Some(url.to_string());
                }
                None => debug!("Query {} returned no usable entry", query),
            },
            Err(e) => {
                warn!("Search attempt failed with {}: {}", query, e);
            }
        }
    }

    None
}
