//! Application configuration
//!
//! Loaded from an optional `config` file, overridden by environment
//! variables with the `ANNOUNCEMAN` prefix and `__` between key
//! segments, so snake_case field names stay addressable (e.g.
//! `ANNOUNCEMAN_SESSION__PAGE_LEN`, `ANNOUNCEMAN_SCRAPE__TIMEOUT_SECS`).

use std::path::PathBuf;
use std::time::Duration;

use application::SessionSettings;
use chrono_tz::Tz;
use domain::ChatId;
use serde::{Deserialize, Serialize};

use crate::error::InfrastructureError;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Session state machine tunables
    #[serde(default)]
    pub session: SessionConfig,

    /// Manifest and cache file locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Route scraping configuration
    #[serde(default)]
    pub scrape: ScrapeConfig,
}

/// Session state machine tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Timezone for the Today/Tomorrow date presets (tz database name)
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Picker hour shown on first entry to the time step
    #[serde(default = "default_hour")]
    pub default_hour: u8,

    /// Picker minute shown on first entry to the time step
    #[serde(default = "default_minute")]
    pub default_minute: u8,

    /// Routes per page in the track listing
    #[serde(default = "default_page_len")]
    pub page_len: usize,

    /// Broadcast chat id for the post-to-channel action
    #[serde(default)]
    pub channel: Option<i64>,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

const fn default_hour() -> u8 {
    10
}

const fn default_minute() -> u8 {
    0
}

const fn default_page_len() -> usize {
    10
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            default_hour: default_hour(),
            default_minute: default_minute(),
            page_len: default_page_len(),
            channel: None,
        }
    }
}

/// Manifest and cache file locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Routes manifest: JSON map of display name to source URL
    #[serde(default = "default_routes_manifest")]
    pub routes_manifest: PathBuf,

    /// Optional preview-override manifest: JSON map of name to image URL
    #[serde(default)]
    pub previews_manifest: Option<PathBuf>,

    /// Start-points manifest: JSON map of name to link and group
    #[serde(default = "default_start_points_manifest")]
    pub start_points_manifest: PathBuf,

    /// Route catalog cache artifact
    #[serde(default = "default_cache")]
    pub cache: PathBuf,
}

fn default_routes_manifest() -> PathBuf {
    PathBuf::from("routes.json")
}

fn default_start_points_manifest() -> PathBuf {
    PathBuf::from("start_points.json")
}

fn default_cache() -> PathBuf {
    PathBuf::from("route_cache.json")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            routes_manifest: default_routes_manifest(),
            previews_manifest: None,
            start_points_manifest: default_start_points_manifest(),
            cache: default_cache(),
        }
    }
}

/// Route scraping configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Per-request timeout in seconds for page and image fetches
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

const fn default_timeout() -> u64 {
    30
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self { timeout_secs: default_timeout() }
    }
}

impl ScrapeConfig {
    /// Fetch timeout as a [`Duration`]
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Environment source with a `__` key separator
///
/// A plain `_` separator would split the snake_case field names
/// themselves (`page_len` would parse as `page.len`).
fn env_source() -> config::Environment {
    config::Environment::with_prefix("ANNOUNCEMAN")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

impl AppConfig {
    /// Load configuration from environment and optional file
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(env_source());

        builder.build()?.try_deserialize()
    }

    /// Resolve the session tunables into the application's settings type
    pub fn session_settings(&self) -> Result<SessionSettings, InfrastructureError> {
        let timezone: Tz = self
            .session
            .timezone
            .parse()
            .map_err(|_| InfrastructureError::InvalidTimezone(self.session.timezone.clone()))?;

        Ok(SessionSettings {
            timezone,
            default_hour: self.session.default_hour,
            default_minute: self.session.default_minute,
            page_len: self.session.page_len,
            channel: self.session.channel.map(ChatId::new),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = AppConfig::default();
        assert_eq!(config.session.timezone, "UTC");
        assert_eq!(config.session.default_hour, 10);
        assert_eq!(config.session.default_minute, 0);
        assert_eq!(config.session.page_len, 10);
        assert!(config.session.channel.is_none());
        assert_eq!(config.paths.routes_manifest, PathBuf::from("routes.json"));
        assert_eq!(config.scrape.timeout(), Duration::from_secs(30));
    }

    fn config_with_timezone(timezone: &str) -> AppConfig {
        AppConfig {
            session: SessionConfig {
                timezone: timezone.to_string(),
                channel: Some(-1001),
                ..SessionConfig::default()
            },
            ..AppConfig::default()
        }
    }

    #[test]
    fn session_settings_resolve_the_timezone() {
        let settings = config_with_timezone("Europe/Berlin").session_settings().unwrap();
        assert_eq!(settings.timezone, chrono_tz::Europe::Berlin);
        assert_eq!(settings.channel, Some(ChatId::new(-1001)));
    }

    #[test]
    fn unknown_timezone_is_an_error() {
        let config = config_with_timezone("Mars/Olympus");
        assert!(matches!(
            config.session_settings(),
            Err(InfrastructureError::InvalidTimezone(tz)) if tz == "Mars/Olympus"
        ));
    }

    #[test]
    fn double_underscore_env_keys_reach_snake_case_fields() {
        let vars: config::Map<String, String> = [
            ("ANNOUNCEMAN_SESSION__PAGE_LEN", "5"),
            ("ANNOUNCEMAN_SESSION__DEFAULT_HOUR", "8"),
            ("ANNOUNCEMAN_SCRAPE__TIMEOUT_SECS", "10"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let parsed: AppConfig = config::Config::builder()
            .add_source(env_source().source(Some(vars)))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(parsed.session.page_len, 5);
        assert_eq!(parsed.session.default_hour, 8);
        assert_eq!(parsed.scrape.timeout_secs, 10);
    }

    #[test]
    fn partial_file_content_fills_in_defaults() {
        let parsed: AppConfig =
            serde_json::from_str(r#"{"session": {"page_len": 5}}"#).unwrap();
        assert_eq!(parsed.session.page_len, 5);
        assert_eq!(parsed.session.default_hour, 10);
        assert_eq!(parsed.scrape.timeout_secs, 30);
    }
}
