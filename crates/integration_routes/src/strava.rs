//! Strava extraction rule
//!
//! The OpenGraph description reads
//! `"<name> is a <length> Cycling Route. ..."`; elevation is the text of
//! the second labeled route-statistic element in the page body.

use scraper::Html;

use crate::error::RouteScrapeError;
use crate::provider::{Provider, RouteMetadata, nth_text, og_content};

const ROUTE_STAT_SELECTOR: &str = r#"[data-testid="route-stat"]"#;

pub(crate) struct Strava;

impl Provider for Strava {
    fn name(&self) -> &'static str {
        "strava"
    }

    fn matches(&self, host: &str) -> bool {
        host.contains("strava.com")
    }

    fn extract(&self, html: &str) -> Result<RouteMetadata, RouteScrapeError> {
        let doc = Html::parse_document(html);
        let description = og_content(&doc, "og:description")?;
        let image_url = og_content(&doc, "og:image")?;

        let (name, rest) = description.split_once(" is a ").ok_or_else(|| {
            RouteScrapeError::Extraction("description lacks ' is a ' separator".to_string())
        })?;
        let (length, _) = rest.split_once(" Cycling Route.").ok_or_else(|| {
            RouteScrapeError::Extraction("description lacks ' Cycling Route.' marker".to_string())
        })?;
        let elevation = nth_text(&doc, ROUTE_STAT_SELECTOR, 1).ok_or_else(|| {
            RouteScrapeError::Extraction("second route-stat element missing".to_string())
        })?;

        Ok(RouteMetadata {
            name: name.to_string(),
            length: length.to_string(),
            elevation,
            image_url,
        })
    }
}
