//! Komoot extraction rule
//!
//! Name comes from the OpenGraph title (truncated at the first `" | "`),
//! length from the `"Distance: "` field of the description, elevation
//! from the labeled elevation-gain element. Komoot pads its numbers with
//! non-breaking spaces, which are stripped.

use scraper::Html;

use crate::error::RouteScrapeError;
use crate::provider::{Provider, RouteMetadata, nth_text, og_content};

const ELEVATION_SELECTOR: &str = r#"span[data-test-id="t_elevation_up_value"]"#;

const NBSP: char = '\u{a0}';

pub(crate) struct Komoot;

impl Provider for Komoot {
    fn name(&self) -> &'static str {
        "komoot"
    }

    fn matches(&self, host: &str) -> bool {
        host.contains("komoot.com")
    }

    fn extract(&self, html: &str) -> Result<RouteMetadata, RouteScrapeError> {
        let doc = Html::parse_document(html);
        let title = og_content(&doc, "og:title")?;
        let description = og_content(&doc, "og:description")?;
        let image_url = og_content(&doc, "og:image")?;

        let name = title.split(" | ").next().unwrap_or(&title).to_string();

        let after = description.split_once("Distance: ").ok_or_else(|| {
            RouteScrapeError::Extraction("description lacks 'Distance: ' field".to_string())
        })?;
        let length = after
            .1
            .split(" | ")
            .next()
            .unwrap_or(after.1)
            .replace(NBSP, "");

        let elevation = nth_text(&doc, ELEVATION_SELECTOR, 0)
            .map(|text| text.replace(NBSP, ""))
            .ok_or_else(|| {
                RouteScrapeError::Extraction("elevation-gain element missing".to_string())
            })?;

        Ok(RouteMetadata { name, length, elevation, image_url })
    }
}
