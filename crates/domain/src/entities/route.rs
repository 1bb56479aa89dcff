//! Route entity and the immutable catalog built from it

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// A catalogued route with its annotated preview image
///
/// Immutable after catalog load, except for `preview_handle`: the opaque
/// reference the transport returns the first time this route's image is
/// uploaded. The handle is written at most once and reused by every later
/// announcement referencing the same route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Display name
    pub name: String,
    /// Provider-formatted length (e.g. "42.3 km")
    pub length: String,
    /// Provider-formatted elevation gain (e.g. "512 m")
    pub elevation: String,
    /// Source page URL
    pub link: String,
    /// Markdown caption shown in listings and announcements
    pub caption: String,
    /// Annotated preview image bytes (JPEG)
    pub preview_image: Vec<u8>,
    /// Remote upload handle, set after the first successful photo send
    #[serde(skip)]
    preview_handle: OnceLock<String>,
}

impl Route {
    /// Build a route, deriving the listing caption from name and link
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        length: impl Into<String>,
        elevation: impl Into<String>,
        link: impl Into<String>,
        preview_image: Vec<u8>,
    ) -> Self {
        let name = name.into();
        let length = length.into();
        let elevation = elevation.into();
        let link = link.into();
        let caption = format!("[{name}]({link}) | {length} | {elevation}");
        Self {
            name,
            length,
            elevation,
            link,
            caption,
            preview_image,
            preview_handle: OnceLock::new(),
        }
    }

    /// Previously stored upload handle, if any
    #[must_use]
    pub fn preview_handle(&self) -> Option<&str> {
        self.preview_handle.get().map(String::as_str)
    }

    /// Store the upload handle returned by the transport
    ///
    /// Only the first write wins; a concurrent duplicate upload of the
    /// same bytes yields an equivalent handle, so the losing write is
    /// silently dropped.
    pub fn set_preview_handle(&self, handle: String) {
        let _ = self.preview_handle.set(handle);
    }
}

/// The full, sorted, immutable set of loaded routes
///
/// Sorted by name ascending (byte-wise, deterministic and total) at
/// construction and never re-sorted afterwards; a route's position is its
/// stable identity for the process lifetime.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RouteCatalog {
    routes: Vec<Route>,
}

impl RouteCatalog {
    /// Build a catalog, sorting the routes by name
    ///
    /// Sorting here (rather than in the loader) makes fresh and
    /// cache-sourced catalogs identical by construction.
    #[must_use]
    pub fn new(mut routes: Vec<Route>) -> Self {
        routes.sort_by(|a, b| a.name.cmp(&b.name));
        Self { routes }
    }

    /// Route at the given stable index
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Route> {
        self.routes.get(index)
    }

    /// One page of the ordered listing, clipped at the catalog end
    #[must_use]
    pub fn page(&self, offset: usize, page_size: usize) -> &[Route] {
        let start = offset.saturating_mul(page_size).min(self.routes.len());
        let end = start.saturating_add(page_size).min(self.routes.len());
        &self.routes[start..end]
    }

    /// Number of pages at the given page size
    #[must_use]
    pub fn total_pages(&self, page_size: usize) -> usize {
        if page_size == 0 {
            return 0;
        }
        self.routes.len().div_ceil(page_size)
    }

    /// Number of loaded routes
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether the catalog is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Iterate all routes in stable order
    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }
}
