//! Configuration and file management for gitfeed
//!
//! This crate provides:
//! - File path utilities for the event history and freshness token caches
//! - Configuration file loading (TOML)
//! - Application configuration (AppConfig)

pub mod app_config;
pub mod config_file;
pub mod paths;

pub use app_config::AppConfig;
pub use app_config::{MAX_HISTORY_LIMIT, MAX_PAGE_SIZE};
pub use config_file::{find_config, ConfigSource};
pub use paths::{app_config_path, cache_dir, events_path, freshness_token_path};
