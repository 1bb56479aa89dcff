//! Infrastructure layer - configuration and startup loaders
//!
//! Loads process configuration, initializes logging, and builds the
//! immutable route catalog and start-point directory the session core is
//! handed at startup.

pub mod catalog;
pub mod config;
pub mod error;
pub mod start_points;
pub mod telemetry;

pub use catalog::CatalogLoader;
pub use config::AppConfig;
pub use error::InfrastructureError;
pub use start_points::load_start_points;
pub use telemetry::init_tracing;
