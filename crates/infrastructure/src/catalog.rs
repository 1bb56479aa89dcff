//! Route catalog startup loader
//!
//! Resolves the routes manifest through the scraper port, sorts the
//! result into a [`RouteCatalog`] and serializes it to the cache
//! artifact. A present cache short-circuits all network activity; the
//! cache carries no invalidation signal, so manifest edits take effect
//! only after the cache file is deleted.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use application::ports::RouteScraperPort;
use domain::RouteCatalog;
use tracing::{info, warn};

use crate::error::InfrastructureError;

fn io_error(path: &Path, source: std::io::Error) -> InfrastructureError {
    InfrastructureError::Io { path: path.display().to_string(), source }
}

fn serde_error(path: &Path, source: serde_json::Error) -> InfrastructureError {
    InfrastructureError::Serialization { path: path.display().to_string(), source }
}

/// Read a JSON manifest mapping names to URL strings
///
/// Used for both the routes manifest and the preview-override manifest.
pub fn load_manifest(path: &Path) -> Result<BTreeMap<String, String>, InfrastructureError> {
    let bytes = fs::read(path).map_err(|e| io_error(path, e))?;
    serde_json::from_slice(&bytes).map_err(|e| serde_error(path, e))
}

/// Builds the immutable route catalog at process start
pub struct CatalogLoader {
    scraper: Arc<dyn RouteScraperPort>,
    cache_path: PathBuf,
}

impl std::fmt::Debug for CatalogLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogLoader")
            .field("cache_path", &self.cache_path)
            .finish_non_exhaustive()
    }
}

impl CatalogLoader {
    /// Create a loader writing its cache artifact at the given path
    pub fn new(scraper: Arc<dyn RouteScraperPort>, cache_path: impl Into<PathBuf>) -> Self {
        Self { scraper, cache_path: cache_path.into() }
    }

    /// Load the catalog from cache, or scrape every manifest entry
    ///
    /// A failing entry is logged and skipped; a partial catalog is valid.
    pub async fn load(
        &self,
        routes: &BTreeMap<String, String>,
        previews: &BTreeMap<String, String>,
    ) -> Result<RouteCatalog, InfrastructureError> {
        if self.cache_path.exists() {
            let bytes =
                fs::read(&self.cache_path).map_err(|e| io_error(&self.cache_path, e))?;
            let catalog: RouteCatalog =
                serde_json::from_slice(&bytes).map_err(|e| serde_error(&self.cache_path, e))?;
            info!(routes = catalog.len(), cache = %self.cache_path.display(), "Loaded route catalog from cache");
            return Ok(catalog);
        }

        let mut loaded = Vec::new();
        for (name, url) in routes {
            let preview = previews.get(name).map(String::as_str);
            match self.scraper.load_route(url, Some(name), preview).await {
                Ok(route) => loaded.push(route),
                Err(e) => warn!(route = %name, url = %url, error = %e, "Skipping route"),
            }
        }

        let catalog = RouteCatalog::new(loaded);
        let bytes = serde_json::to_vec(&catalog).map_err(|e| serde_error(&self.cache_path, e))?;
        fs::write(&self.cache_path, bytes).map_err(|e| io_error(&self.cache_path, e))?;
        info!(routes = catalog.len(), skipped = routes.len() - catalog.len(), "Route catalog loaded and cached");
        Ok(catalog)
    }
}
