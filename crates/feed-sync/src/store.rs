//! Durable cache for the event history and the freshness token
//!
//! Two files, one per concern:
//! - `events.json`: JSON array of raw event records, newest first
//! - `modified.txt`: the last `Last-Modified` value seen
//!
//! Both are rewritten whole on every update using the write-to-temp-then-rename
//! pattern, so a crash leaves either the old or the new content on disk.
//! Reads degrade to an empty state and writes only log on failure: a stale
//! cache is acceptable, a torn one is not.

use crate::event::Event;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde_json::Value;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// File-backed cache of the feed state
#[derive(Debug, Clone)]
pub struct FeedStore {
    events_path: PathBuf,
    token_path: PathBuf,
}

impl FeedStore {
    /// Create a store over explicit file locations
    pub fn new(events_path: impl Into<PathBuf>, token_path: impl Into<PathBuf>) -> Self {
        Self {
            events_path: events_path.into(),
            token_path: token_path.into(),
        }
    }

    /// Create a store using the standard file names inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join("events.json"), dir.join("modified.txt"))
    }

    /// Open the store in the application cache directory
    pub fn open_default() -> Result<Self> {
        let events_path = feed_config::events_path()?;
        let token_path = feed_config::freshness_token_path()?;
        Ok(Self::new(events_path, token_path))
    }

    pub fn events_path(&self) -> &Path {
        &self.events_path
    }

    pub fn token_path(&self) -> &Path {
        &self.token_path
    }

    /// Load the cached history
    ///
    /// Returns an empty history if the file is missing or corrupt.
    /// Malformed records inside a valid file are skipped.
    pub fn load_history(&self) -> Vec<Event> {
        let content = match fs::read_to_string(&self.events_path) {
            Ok(content) => content,
            Err(e) => {
                debug!(
                    "No cached history at {:?} ({}), starting empty",
                    self.events_path, e
                );
                return Vec::new();
            }
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(records) => {
                let history = Event::parse_batch(records);
                info!(
                    "Loaded {} cached events from {:?}",
                    history.len(),
                    self.events_path
                );
                history
            }
            Err(e) => {
                warn!(
                    "Failed to parse cached history {:?}: {}",
                    self.events_path, e
                );
                Vec::new()
            }
        }
    }

    /// Replace the cached history
    ///
    /// Returns whether the history reached disk.
    pub fn save_history(&self, history: &[Event]) -> bool {
        let records = Value::Array(history.iter().map(Event::to_record).collect());

        let result = serde_json::to_vec_pretty(&records)
            .context("Failed to serialize history")
            .and_then(|bytes| write_atomic(&self.events_path, &bytes));

        match result {
            Ok(()) => {
                debug!(
                    "Saved {} events to {:?}",
                    history.len(),
                    self.events_path
                );
                true
            }
            Err(e) => {
                warn!("Failed to save history: {:#}", e);
                false
            }
        }
    }

    /// Load the cached freshness token
    ///
    /// An empty or whitespace-only file counts as no token.
    pub fn load_freshness_token(&self) -> Option<String> {
        let content = fs::read_to_string(&self.token_path).ok()?;
        let token = content.trim();

        if token.is_empty() {
            None
        } else {
            debug!("Loaded freshness token {:?}", token);
            Some(token.to_string())
        }
    }

    /// Replace the cached freshness token
    ///
    /// Returns whether the token reached disk.
    pub fn save_freshness_token(&self, token: &str) -> bool {
        match write_atomic(&self.token_path, token.as_bytes()) {
            Ok(()) => {
                debug!("Saved freshness token {:?}", token);
                true
            }
            Err(e) => {
                warn!("Failed to save freshness token: {:#}", e);
                false
            }
        }
    }
}

/// Write `bytes` to `path` atomically
///
/// 1. Write to `<path>.tmp`
/// 2. fsync the temp file
/// 3. Rename to `<path>`
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }

    let tmp_path = tmp_path_for(path)?;

    {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&tmp_path)
            .with_context(|| format!("Failed to open {:?}", tmp_path))?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }

    fs::rename(&tmp_path, path)
        .with_context(|| format!("Failed to rename {:?} to {:?}", tmp_path, path))?;

    sync_parent_dir(path);
    Ok(())
}

fn tmp_path_for(path: &Path) -> Result<PathBuf> {
    let mut name = path
        .file_name()
        .with_context(|| format!("Cache path {:?} has no file name", path))?
        .to_os_string();
    name.push(".tmp");
    Ok(path.with_file_name(name))
}

/// Make the rename durable; best effort, not every platform can open a directory
fn sync_parent_dir(path: &Path) {
    if let Some(parent) = path.parent() {
        if let Ok(dir) = File::open(parent) {
            let _ = dir.sync_all();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{actors, event_record, events};
    use serde_json::json;
    use tempfile::TempDir;

    fn store() -> (TempDir, FeedStore) {
        let dir = TempDir::new().unwrap();
        let store = FeedStore::in_dir(dir.path());
        (dir, store)
    }

    #[test]
    fn test_load_history_missing_file() {
        let (_dir, store) = store();
        assert!(store.load_history().is_empty());
    }

    #[test]
    fn test_load_history_corrupt_file() {
        let (_dir, store) = store();
        fs::write(store.events_path(), "{ not json").unwrap();
        assert!(store.load_history().is_empty());
    }

    #[test]
    fn test_load_history_skips_bad_records() {
        let (_dir, store) = store();
        let content = json!([
            event_record("PushEvent", "a", "o/r"),
            { "type": "PushEvent" },
            event_record("ForkEvent", "b", "o/r"),
        ]);
        fs::write(store.events_path(), content.to_string()).unwrap();

        assert_eq!(actors(&store.load_history()), vec!["a", "b"]);
    }

    #[test]
    fn test_save_and_load_history() {
        let (_dir, store) = store();
        let history = events("e", 4);

        assert!(store.save_history(&history));
        assert_eq!(store.load_history(), history);
    }

    #[test]
    fn test_save_history_replaces_previous_content() {
        let (_dir, store) = store();
        assert!(store.save_history(&events("first", 5)));
        assert!(store.save_history(&events("second", 2)));

        assert_eq!(actors(&store.load_history()), vec!["second-0", "second-1"]);
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let (dir, store) = store();
        assert!(store.save_history(&events("e", 1)));
        assert!(store.save_freshness_token("Tue"));

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert!(names.iter().all(|name| !name.ends_with(".tmp")));
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn test_save_history_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let store = FeedStore::in_dir(&dir.path().join("nested").join("cache"));

        assert!(store.save_history(&events("e", 1)));
        assert_eq!(store.load_history().len(), 1);
    }

    #[test]
    fn test_save_failure_is_reported_not_raised() {
        let dir = TempDir::new().unwrap();
        // A regular file where the cache directory should be
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let store = FeedStore::in_dir(&blocker);

        assert!(!store.save_history(&events("e", 1)));
        assert!(!store.save_freshness_token("Tue"));
        assert!(store.load_history().is_empty());
        assert_eq!(store.load_freshness_token(), None);
    }

    #[test]
    fn test_freshness_token_round_trip() {
        let (_dir, store) = store();
        assert_eq!(store.load_freshness_token(), None);

        assert!(store.save_freshness_token("Tue, 01 Oct 2024 10:00:00 GMT"));
        assert_eq!(
            store.load_freshness_token().as_deref(),
            Some("Tue, 01 Oct 2024 10:00:00 GMT")
        );

        assert!(store.save_freshness_token("Wed"));
        assert_eq!(store.load_freshness_token().as_deref(), Some("Wed"));
    }

    #[test]
    fn test_blank_freshness_token_is_absent() {
        let (_dir, store) = store();
        fs::write(store.token_path(), "  \n").unwrap();
        assert_eq!(store.load_freshness_token(), None);

        fs::write(store.token_path(), "Tue\n").unwrap();
        assert_eq!(store.load_freshness_token().as_deref(), Some("Tue"));
    }

    #[test]
    fn test_tmp_path_for() {
        let path = Path::new("/cache/modified.txt");
        assert_eq!(
            tmp_path_for(path).unwrap(),
            PathBuf::from("/cache/modified.txt.tmp")
        );
    }
}
