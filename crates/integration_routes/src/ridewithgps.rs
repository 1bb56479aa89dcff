//! RideWithGPS extraction rule
//!
//! Name is the OpenGraph title. The description reads
//! `"<length>, +<elevation>. Bike ride in <place>"`; it is split on
//! `", +"` and each side truncated before the `". Bike ride in "`
//! trailer. RideWithGPS preview images already carry the route stats, so
//! they are used unannotated.

use scraper::Html;

use crate::error::RouteScrapeError;
use crate::provider::{Provider, RouteMetadata, og_content};

const PLACE_TRAILER: &str = ". Bike ride in ";

fn before_trailer(text: &str) -> &str {
    text.split(PLACE_TRAILER).next().unwrap_or(text).trim()
}

pub(crate) struct RideWithGps;

impl Provider for RideWithGps {
    fn name(&self) -> &'static str {
        "ridewithgps"
    }

    fn matches(&self, host: &str) -> bool {
        host.contains("ridewithgps.com")
    }

    fn extract(&self, html: &str) -> Result<RouteMetadata, RouteScrapeError> {
        let doc = Html::parse_document(html);
        let name = og_content(&doc, "og:title")?;
        let description = og_content(&doc, "og:description")?;
        let image_url = og_content(&doc, "og:image")?;

        let (length, elevation) = description.split_once(", +").ok_or_else(|| {
            RouteScrapeError::Extraction("description lacks ', +' separator".to_string())
        })?;

        Ok(RouteMetadata {
            name,
            length: before_trailer(length).to_string(),
            elevation: before_trailer(elevation).to_string(),
            image_url,
        })
    }

    fn annotates(&self) -> bool {
        false
    }
}
