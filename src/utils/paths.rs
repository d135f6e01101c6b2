//! Cross-Platform Path Utilities
//!
//! Functions for resolving the Agent Relay directory (~/.agent-relay/).

use std::path::{Path, PathBuf};

use crate::utils::error::{AppError, AppResult};

/// Get the user's home directory
pub fn home_dir() -> AppResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| AppError::config("Could not determine home directory"))
}

/// Get the Agent Relay directory (~/.agent-relay/)
pub fn agent_relay_dir() -> AppResult<PathBuf> {
    Ok(home_dir()?.join(".agent-relay"))
}

/// Get the config file path (~/.agent-relay/config.json)
pub fn config_path() -> AppResult<PathBuf> {
    Ok(agent_relay_dir()?.join("config.json"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> AppResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Get the Agent Relay directory, creating if it doesn't exist
pub fn ensure_agent_relay_dir() -> AppResult<PathBuf> {
    let path = agent_relay_dir()?;
    ensure_dir(&path)?;
    Ok(path)
}
