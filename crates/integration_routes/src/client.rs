//! HTTP route scraper
//!
//! Fetches a route page, runs the matching provider's extraction rule,
//! fetches the preview image and hands it to the annotator. Implements
//! the application's scraper port.

use std::time::Duration;

use application::ApplicationError;
use application::ports::RouteScraperPort;
use async_trait::async_trait;
use domain::Route;
use reqwest::Client;
use tokio::task;
use tracing::{debug, instrument};
use url::Url;

use crate::annotate;
use crate::error::RouteScrapeError;
use crate::provider::ProviderRegistry;

/// Provider-dispatching route loader over a shared HTTP client
#[derive(Debug)]
pub struct RouteScraper {
    http: Client,
    registry: ProviderRegistry,
}

impl RouteScraper {
    /// Create a scraper with a bounded per-request timeout
    pub fn new(timeout: Duration) -> Result<Self, RouteScrapeError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http))
    }

    /// Create a scraper over an existing HTTP client
    #[must_use]
    pub fn with_client(http: Client) -> Self {
        Self {
            http,
            registry: ProviderRegistry::default(),
        }
    }

    /// Load and annotate one route
    ///
    /// `name_override` replaces the extracted name (the manifest name
    /// wins over the page title); `preview_override` replaces the
    /// extracted preview image URL.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn load(
        &self,
        url: &str,
        name_override: Option<&str>,
        preview_override: Option<&str>,
    ) -> Result<Route, RouteScrapeError> {
        let parsed =
            Url::parse(url).map_err(|e| RouteScrapeError::InvalidUrl(e.to_string()))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| RouteScrapeError::InvalidUrl(format!("no host in {url}")))?;
        let provider = self.registry.resolve(host)?;
        debug!(provider = provider.name(), "Loading route page");

        let page = self.fetch_text(url).await?;
        let meta = provider.extract(&page)?;

        let image_url = preview_override.unwrap_or(&meta.image_url);
        let image = self.fetch_bytes(image_url).await?;

        let name = name_override.unwrap_or(&meta.name).to_string();
        let image = if provider.annotates() {
            let caption = format!("{name} | {} | {}", meta.length, meta.elevation);
            task::spawn_blocking(move || annotate::annotate(&image, &caption)).await??
        } else {
            image
        };

        Ok(Route::new(name, meta.length, meta.elevation, url, image))
    }

    async fn fetch_text(&self, url: &str) -> Result<String, RouteScrapeError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RouteScrapeError::Fetch {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, RouteScrapeError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RouteScrapeError::Fetch {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl RouteScraperPort for RouteScraper {
    async fn load_route(
        &self,
        url: &str,
        name_override: Option<&str>,
        preview_override: Option<&str>,
    ) -> Result<Route, ApplicationError> {
        self.load(url, name_override, preview_override)
            .await
            .map_err(|e| ApplicationError::Scrape(e.to_string()))
    }
}
