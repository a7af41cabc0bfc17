//! Application configuration
//!
//! Configuration loaded from `.gitfeed.toml` or the per-user `config.toml`.

use serde::{Deserialize, Serialize};

/// Upper bound on the number of repositories fetched per cycle
pub const MAX_PAGE_SIZE: u8 = 5;

/// Upper bound on the number of events kept in the history
pub const MAX_HISTORY_LIMIT: usize = 50;

/// Application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// GitHub search query used to discover repositories
    #[serde(default = "default_search_query")]
    pub search_query: String,

    /// Number of repositories taken from the search result (1..=5)
    #[serde(default = "default_page_size")]
    pub page_size: u8,

    /// Maximum number of events kept in the history (1..=50)
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// API base URI (None = public GitHub)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_uri: Option<String>,
}

fn default_search_query() -> String {
    "language:swift".to_string()
}

fn default_page_size() -> u8 {
    MAX_PAGE_SIZE
}

fn default_history_limit() -> usize {
    MAX_HISTORY_LIMIT
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            search_query: default_search_query(),
            page_size: default_page_size(),
            history_limit: default_history_limit(),
            api_base_uri: None,
        }
    }
}

impl AppConfig {
    /// Load config from CWD first, then the config directory, or use defaults
    pub fn load() -> Self {
        if let Some(source) = crate::find_config() {
            match Self::from_toml(&source.content) {
                Ok(config) => {
                    log::info!("Loaded app config from {}", source.path.display());
                    return config;
                }
                Err(e) => {
                    log::warn!("Ignoring config {}: {}", source.path.display(), e);
                }
            }
        }

        log::debug!("Using default app config");
        Self::default()
    }

    /// Parse config from TOML, rejecting values the engine cannot work with
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(content)?;

        if !(1..=MAX_PAGE_SIZE).contains(&config.page_size) {
            anyhow::bail!(
                "page_size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE,
                config.page_size
            );
        }
        if !(1..=MAX_HISTORY_LIMIT).contains(&config.history_limit) {
            anyhow::bail!(
                "history_limit must be between 1 and {}, got {}",
                MAX_HISTORY_LIMIT,
                config.history_limit
            );
        }

        Ok(config)
    }
}
