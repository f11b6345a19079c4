//! Settings manager.
//!
//! Locates the configuration file in the platform config directory, loads it
//! (falling back to defaults) and builds the signal bus from it.

use std::path::PathBuf;
use traceviewer_core::signals::{set_manager_instance, SignalManager};

use crate::config::Config;
use crate::error::{SettingsError, SettingsResult};

const APP_DIR: &str = "traceviewer";
const CONFIG_FILE: &str = "settings.toml";

/// Loads, holds and saves the application configuration
#[derive(Debug, Clone)]
pub struct SettingsManager {
    config: Config,
    path: PathBuf,
}

impl SettingsManager {
    /// Directory holding the configuration file
    pub fn config_dir() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no platform config directory".to_string())
            })
    }

    /// Full path of the configuration file
    pub fn config_file_path() -> SettingsResult<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Create the configuration directory if missing
    pub fn ensure_config_dir() -> SettingsResult<PathBuf> {
        let dir = Self::config_dir()?;
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Load from the platform config file, or defaults if it does not exist
    pub fn load() -> SettingsResult<Self> {
        Self::load_from(Self::config_file_path()?)
    }

    /// Load from `path`, or defaults if it does not exist
    pub fn load_from(path: impl Into<PathBuf>) -> SettingsResult<Self> {
        let path = path.into();
        let config = if path.exists() {
            Config::load_from_file(&path)?
        } else {
            tracing::info!("No configuration at {}, using defaults", path.display());
            Config::default()
        };
        Ok(Self { config, path })
    }

    /// Write the current configuration back to its file
    pub fn save(&self) -> SettingsResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        self.config.save_to_file(&self.path)
    }

    /// Current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Mutable access to the configuration
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Path the configuration is loaded from and saved to
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Build a signal bus configured from these settings
    pub fn build_signal_manager(&self) -> SignalManager {
        SignalManager::with_config(self.config.signals.clone())
    }

    /// Build a signal bus and make it the process-wide instance
    pub fn install_signal_manager(&self) -> SignalManager {
        let manager = self.build_signal_manager();
        set_manager_instance(manager.clone());
        manager
    }
}
