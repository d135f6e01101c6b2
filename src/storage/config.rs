//! JSON Configuration Management
//!
//! Handles reading and writing the relay configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::models::settings::{RelaySettings, SettingsUpdate};
use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::{config_path, ensure_agent_relay_dir, ensure_dir};

/// Configuration service for managing relay settings
#[derive(Debug)]
pub struct ConfigService {
    config_path: PathBuf,
    config: RelaySettings,
}

impl ConfigService {
    /// Create a new config service at ~/.agent-relay/config.json,
    /// loading existing config or creating defaults
    pub fn new() -> AppResult<Self> {
        ensure_agent_relay_dir()?;
        Self::with_path(config_path()?)
    }

    /// Create a config service backed by a custom file location
    pub fn with_path(path: impl Into<PathBuf>) -> AppResult<Self> {
        let config_path = path.into();
        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() {
                ensure_dir(parent)?;
            }
        }

        let config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            let default_config = RelaySettings::default();
            Self::save_to_file(&config_path, &default_config)?;
            tracing::info!(
                "[ConfigService] Created default config at {}",
                config_path.display()
            );
            default_config
        };

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Load configuration from a file
    fn load_from_file(path: &Path) -> AppResult<RelaySettings> {
        let content = fs::read_to_string(path)?;
        let config: RelaySettings = serde_json::from_str(&content)?;
        config.validate().map_err(AppError::validation)?;
        Ok(config)
    }

    /// Save configuration to a file with pretty formatting
    fn save_to_file(path: &Path, config: &RelaySettings) -> AppResult<()> {
        config.validate().map_err(AppError::validation)?;
        let content = serde_json::to_string_pretty(config)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the current configuration
    pub fn get_config(&self) -> &RelaySettings {
        &self.config
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Update the configuration with a partial update
    ///
    /// The in-memory settings are left untouched when the update fails
    /// validation.
    pub fn update_config(&mut self, update: SettingsUpdate) -> AppResult<RelaySettings> {
        let mut candidate = self.config.clone();
        candidate.apply_update(update);
        Self::save_to_file(&self.config_path, &candidate)?;
        self.config = candidate;
        Ok(self.config.clone())
    }

    /// Save the current configuration to disk
    pub fn save(&self) -> AppResult<()> {
        Self::save_to_file(&self.config_path, &self.config)
    }

    /// Reload configuration from disk
    pub fn reload(&mut self) -> AppResult<()> {
        self.config = Self::load_from_file(&self.config_path)?;
        Ok(())
    }

    /// Reset configuration to defaults
    pub fn reset(&mut self) -> AppResult<()> {
        self.config = RelaySettings::default();
        self.save()?;
        Ok(())
    }

    /// Check if the config service is healthy
    pub fn is_healthy(&self) -> bool {
        self.config_path.exists() && self.config.validate().is_ok()
    }
}
