//! Provider registry and the extraction contract
//!
//! Each supported route host implements [`Provider`]: a host predicate
//! plus an extraction rule over the fetched page. The registry tries the
//! providers in a fixed priority order and the first host match wins; no
//! match is an [`RouteScrapeError::UnsupportedProvider`].

use scraper::{Html, Selector};

use crate::error::RouteScrapeError;
use crate::komoot::Komoot;
use crate::ridewithgps::RideWithGps;
use crate::strava::Strava;

/// Fields extracted from a route page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMetadata {
    /// Route display name
    pub name: String,
    /// Provider-formatted length (e.g. "42.3 km")
    pub length: String,
    /// Provider-formatted elevation gain (e.g. "512 m")
    pub elevation: String,
    /// URL of the preview image referenced by the page
    pub image_url: String,
}

/// One route hosting provider's extraction rule
///
/// `extract` is synchronous over the already-fetched page text; parsed
/// documents never cross an await point.
pub trait Provider: Send + Sync {
    /// Provider name for logs
    fn name(&self) -> &'static str;

    /// Whether this provider serves the given URL host
    fn matches(&self, host: &str) -> bool;

    /// Extract the route fields from the page text
    fn extract(&self, html: &str) -> Result<RouteMetadata, RouteScrapeError>;

    /// Whether the preview image gets the caption overlay
    ///
    /// Providers whose images already carry route stats opt out.
    fn annotates(&self) -> bool {
        true
    }
}

/// Ordered set of registered providers
pub struct ProviderRegistry {
    providers: Vec<Box<dyn Provider>>,
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.providers.iter().map(|p| p.name()).collect();
        f.debug_struct("ProviderRegistry").field("providers", &names).finish()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self {
            providers: vec![
                Box::new(Strava),
                Box::new(Komoot),
                Box::new(RideWithGps),
            ],
        }
    }
}

impl ProviderRegistry {
    /// First provider whose host predicate matches
    pub fn resolve(&self, host: &str) -> Result<&dyn Provider, RouteScrapeError> {
        self.providers
            .iter()
            .find(|p| p.matches(host))
            .map(Box::as_ref)
            .ok_or_else(|| RouteScrapeError::UnsupportedProvider(host.to_string()))
    }
}

/// Content of an OpenGraph `<meta property=.. content=..>` tag
pub(crate) fn og_content(doc: &Html, property: &str) -> Result<String, RouteScrapeError> {
    let selector = Selector::parse(&format!(r#"meta[property="{property}"]"#))
        .map_err(|e| RouteScrapeError::Extraction(e.to_string()))?;
    doc.select(&selector)
        .find_map(|el| el.value().attr("content"))
        .map(str::to_string)
        .ok_or_else(|| RouteScrapeError::Extraction(format!("missing {property} metadata")))
}

/// Joined text of the n-th element matching the selector
pub(crate) fn nth_text(doc: &Html, selector: &str, index: usize) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    doc.select(&selector)
        .nth(index)
        .map(|el| el.text().collect::<String>().trim().to_string())
}
