//! Route provider integration
//!
//! Scrapes route pages from the supported hosting providers (Strava,
//! Komoot, RideWithGPS), extracts name, length and elevation from the
//! page metadata, fetches the preview image and overlays the route
//! caption onto it.

pub mod annotate;
pub mod client;
pub mod error;
pub mod provider;

mod komoot;
mod ridewithgps;
mod strava;

pub use client::RouteScraper;
pub use error::RouteScrapeError;
pub use provider::{ProviderRegistry, RouteMetadata};
