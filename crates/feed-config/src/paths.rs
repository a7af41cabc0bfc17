//! Cache and config directory paths
//!
//! Uses XDG directories via `dirs` crate.
//!
//! Platform-specific locations:
//! - Linux: `~/.cache/gitfeed/`, `~/.config/gitfeed/config.toml`
//! - macOS: `~/Library/Caches/gitfeed/`, `~/Library/Application Support/gitfeed/config.toml`
//! - Windows: `%LOCALAPPDATA%\gitfeed\`, `%APPDATA%\gitfeed\config.toml`

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_NAME: &str = "gitfeed";
const EVENTS_FILE: &str = "events.json";
const FRESHNESS_TOKEN_FILE: &str = "modified.txt";
const APP_CONFIG_FILE: &str = "config.toml";

/// Get the application cache directory
/// Returns ~/.cache/gitfeed/ on Linux, ~/Library/Caches/gitfeed/ on macOS
pub fn cache_dir() -> Result<PathBuf> {
    let base = dirs::cache_dir().context("Could not determine cache directory")?;
    let dir = base.join(APP_NAME);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Get path to the cached event history
pub fn events_path() -> Result<PathBuf> {
    Ok(cache_dir()?.join(EVENTS_FILE))
}

/// Get path to the cached freshness token (last `Last-Modified` value)
pub fn freshness_token_path() -> Result<PathBuf> {
    Ok(cache_dir()?.join(FRESHNESS_TOKEN_FILE))
}

/// Get path to the per-user config file
///
/// Only resolves the location; the directory is not created.
pub fn app_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join(APP_NAME).join(APP_CONFIG_FILE))
}
