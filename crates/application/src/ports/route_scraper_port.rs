//! Route scraper port
//!
//! Implemented by the routes integration crate; consumed by the catalog
//! loader at startup and by the on-demand `/preview` command. Tests
//! substitute hand-rolled recording stubs.

use async_trait::async_trait;
use domain::Route;

use crate::error::ApplicationError;

/// Resolve a route page URL into a fully built [`Route`]
#[async_trait]
pub trait RouteScraperPort: Send + Sync {
    /// Fetch and extract a route, including its annotated preview image
    ///
    /// `name_override` replaces the extracted name (manifests key routes
    /// by display name); `preview_override` replaces the extracted
    /// preview-image URL.
    async fn load_route(
        &self,
        url: &str,
        name_override: Option<&str>,
        preview_override: Option<&str>,
    ) -> Result<Route, ApplicationError>;
}
