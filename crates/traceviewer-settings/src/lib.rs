//! Trace Viewer Settings Crate
//!
//! Handles application configuration and its persistence: the signal bus
//! settings and the logging setup, stored as JSON or TOML.

pub mod config;
pub mod error;
pub mod manager;

pub use config::{Config, LoggingSettings};
pub use error::{ConfigError, SettingsError, SettingsResult};
pub use manager::SettingsManager;
