use super::extractor::{extract_page, subject_links};
use super::registry::Registry;
use crate::config::Config;
use crate::error::{config_error, scrape_error, BotResult};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Anything that can produce a fresh registry
#[async_trait]
pub trait RoomSource: Send + Sync {
    async fn scrape(&self) -> BotResult<Registry>;
}

/// Scrapes the class schedule website: the subject index, then every subject page
#[derive(Debug, Clone)]
pub struct ScheduleFetcher {
    client: Client,
    index_url: Url,
    max_concurrent_requests: usize,
}

impl ScheduleFetcher {
    pub fn new(
        index_url: &str,
        request_timeout: Duration,
        max_concurrent_requests: usize,
    ) -> BotResult<Self> {
        let index_url = Url::parse(index_url)
            .map_err(|e| config_error(&format!("Invalid course schedule URL: {}", e)))?;

        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| scrape_error(&format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            index_url,
            max_concurrent_requests: max_concurrent_requests.max(1),
        })
    }

    pub fn from_config(config: &Config) -> BotResult<Self> {
        Self::new(
            &config.course_schedule_url,
            Duration::from_secs(config.request_timeout_secs),
            config.max_concurrent_requests,
        )
    }

    /// Fetch one page; transport failures and non-success statuses are errors
    async fn fetch_page(&self, url: &Url) -> BotResult<String> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| scrape_error(&format!("Failed to fetch {}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(scrape_error(&format!(
                "Failed to fetch {}: HTTP {}",
                url,
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| scrape_error(&format!("Failed to read {}: {}", url, e)))
    }

    /// Resolve subject links against the index page, dropping ones that do not parse
    fn subject_urls(&self, links: Vec<String>) -> Vec<Url> {
        links
            .into_iter()
            .filter_map(|link| match self.index_url.join(&link) {
                Ok(url) => Some(url),
                Err(e) => {
                    warn!("Skipping subject link '{}': {}", link, e);
                    None
                }
            })
            .collect()
    }
}

#[async_trait]
impl RoomSource for ScheduleFetcher {
    /// Without the index page there is nothing to scrape, so that failure is
    /// returned. A subject page that fails only loses its own rooms.
    async fn scrape(&self) -> BotResult<Registry> {
        let index = self.fetch_page(&self.index_url).await?;
        let urls = self.subject_urls(subject_links(&index));
        info!("Scraping {} subject pages", urls.len());

        let mut pages: Vec<(usize, Option<String>)> = stream::iter(urls.into_iter().enumerate())
            .map(|(position, url)| async move {
                match self.fetch_page(&url).await {
                    Ok(html) => {
                        debug!("Fetched {}", url);
                        (position, Some(html))
                    }
                    Err(e) => {
                        warn!("{}", e);
                        (position, None)
                    }
                }
            })
            .buffer_unordered(self.max_concurrent_requests)
            .collect()
            .await;

        // Ingest in link order so the registry is the same on every run
        pages.sort_by_key(|(position, _)| *position);

        let failed = pages.iter().filter(|(_, html)| html.is_none()).count();
        let registry = Registry::from_slots(
            pages
                .iter()
                .filter_map(|(_, html)| html.as_deref())
                .flat_map(extract_page),
        );

        if failed > 0 {
            warn!("{} subject pages could not be fetched", failed);
        }
        info!("Scraped {} rooms", registry.len());

        Ok(registry)
    }
}
