//! Config file discovery
//!
//! A project-local `.gitfeed.toml` wins over the per-user
//! `config.toml` in the application config directory.

use std::path::{Path, PathBuf};

/// Name of the project-local config file, looked up in the CWD
pub const LOCAL_CONFIG_FILE: &str = ".gitfeed.toml";

/// A config file that was found and read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    pub path: PathBuf,
    pub content: String,
}

/// Locations searched for a config file, in priority order
pub fn config_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
    candidates.extend(crate::paths::app_config_path());
    candidates
}

/// Read the first existing config file
pub fn find_config() -> Option<ConfigSource> {
    read_first(&config_candidates())
}

/// Read the first readable file among `candidates`
pub fn read_first(candidates: &[PathBuf]) -> Option<ConfigSource> {
    candidates.iter().find_map(|path| read_source(path))
}

fn read_source(path: &Path) -> Option<ConfigSource> {
    match std::fs::read_to_string(path) {
        Ok(content) => Some(ConfigSource {
            path: path.to_path_buf(),
            content,
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            log::warn!("Skipping unreadable config {}: {}", path.display(), e);
            None
        }
    }
}
