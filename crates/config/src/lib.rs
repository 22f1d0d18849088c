//! ebookshelf configuration
//!
//! Loads the flat JSON configuration file the binary reads once at startup.
//! Configuration is intentionally minimal: a library directory and a listen
//! address. Everything else the engine needs it derives from disk.

mod app_config;
mod error;

pub use app_config::AppConfig;
pub use error::{ConfigError, ConfigResult};
