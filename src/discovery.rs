use log::info;
use serde::{Deserialize, Serialize};

use crate::catalog::{BookSummary, CatalogSearch};
use crate::extractor::PreferenceExtractor;
use crate::preferences::PreferenceRecord;

/// Everything shown for a single query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchReport {
    pub query: String,
    pub books: Vec<BookSummary>,
    pub preferences: PreferenceRecord,
}

/// Runs the preference extraction and the catalog search for one query.
pub struct Discovery {
    extractor: PreferenceExtractor,
    catalog: CatalogSearch,
    max_results: usize,
}

impl Discovery {
    pub fn new(extractor: PreferenceExtractor, catalog: CatalogSearch, max_results: usize) -> Self {
        Self {
            extractor,
            catalog,
            max_results,
        }
    }

    /// Both lookups are independent, so they run concurrently.
    pub async fn run(&self, query: &str) -> SearchReport {
        info!("Searching for '{}'", query);
        let (preferences, books) = tokio::join!(
            self.extractor.extract(query),
            self.catalog.search(query, self.max_results)
        );

        SearchReport {
            query: query.to_string(),
            books,
            preferences,
        }
    }
}
