use anyhow::{Context, Result, anyhow};
use log::{debug, info, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::CatalogConfig;

const PLACEHOLDER: &str = "N/A";
const NO_DESCRIPTION: &str = "No description available.";
const NO_PREVIEW: &str = "#";
/// Upper bound the volumes endpoint accepts for `maxResults`.
const MAX_RESULTS_LIMIT: usize = 40;

/// A display-ready book from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSummary {
    pub title: String,
    pub authors: String,
    pub published_date: String,
    pub categories: String,
    pub description: String,
    pub image_url: String,
    pub preview_link: String,
}

#[derive(Debug, Deserialize)]
struct VolumesResponse {
    #[serde(default)]
    items: Vec<Volume>,
}

#[derive(Debug, Deserialize)]
struct Volume {
    #[serde(rename = "volumeInfo", default)]
    volume_info: VolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    title: Option<String>,
    authors: Option<Vec<String>>,
    published_date: Option<String>,
    categories: Option<Vec<String>>,
    description: Option<String>,
    image_links: Option<ImageLinks>,
    preview_link: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ImageLinks {
    thumbnail: Option<String>,
}

impl From<VolumeInfo> for BookSummary {
    fn from(info: VolumeInfo) -> Self {
        let join = |list: Option<Vec<String>>| match list {
            Some(list) if !list.is_empty() => list.join(", "),
            _ => PLACEHOLDER.to_string(),
        };

        BookSummary {
            title: info.title.unwrap_or_else(|| PLACEHOLDER.to_string()),
            authors: join(info.authors),
            published_date: info.published_date.unwrap_or_else(|| PLACEHOLDER.to_string()),
            categories: join(info.categories),
            description: info.description.unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            image_url: info
                .image_links
                .and_then(|links| links.thumbnail)
                .map(|url| url.replace("http://", "https://"))
                .unwrap_or_default(),
            preview_link: info.preview_link.unwrap_or_else(|| NO_PREVIEW.to_string()),
        }
    }
}

/// Keyword search against the Google Books volumes API.
pub struct CatalogSearch {
    base_url: String,
    client: Client,
}

impl CatalogSearch {
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client: builder.build().context("Failed to build HTTP client")?,
        })
    }

    /// Search the catalog. Any failure is logged and yields an empty list.
    pub async fn search(&self, query: &str, max_results: usize) -> Vec<BookSummary> {
        match self.try_search(query, max_results).await {
            Ok(books) => {
                info!("Catalog returned {} books for '{}'", books.len(), query);
                books
            }
            Err(e) => {
                warn!("Catalog search failed: {:#}", e);
                Vec::new()
            }
        }
    }

    async fn try_search(&self, query: &str, max_results: usize) -> Result<Vec<BookSummary>> {
        let max_results = max_results.clamp(1, MAX_RESULTS_LIMIT);
        let response = self
            .client
            .get(format!("{}/volumes", self.base_url))
            .query(&[("q", query.to_string()), ("maxResults", max_results.to_string())])
            .send()
            .await
            .context("Failed to send request to the book catalog")?;

        if !response.status().is_success() {
            return Err(anyhow!("Book catalog error: {}", response.status()));
        }

        let body = response.text().await.context("Failed to read catalog response")?;
        debug!("Raw catalog response: {} bytes", body.len());
        parse_volumes(&body)
    }
}

/// Map a volumes payload into summaries, in catalog order.
fn parse_volumes(body: &str) -> Result<Vec<BookSummary>> {
    let response: VolumesResponse =
        serde_json::from_str(body).context("Failed to parse catalog response")?;
    Ok(response
        .items
        .into_iter()
        .map(|volume| BookSummary::from(volume.volume_info))
        .collect())
}
