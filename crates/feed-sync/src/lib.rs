//! Incremental synchronization engine for the GitHub activity feed
//!
//! A refresh cycle discovers a handful of repositories through the search
//! API, fetches their public events with conditional requests, and merges
//! new events into a bounded, newest-first history. Both the history and the
//! last `Last-Modified` value are cached on disk, so a restart resumes where
//! the previous run stopped and unchanged feeds cost a 304.
//!
//! # Example
//!
//! ```rust,no_run
//! use feed_client::OctocrabClient;
//! use feed_sync::{FeedStore, Notifier, RefreshRequest, SyncEngine, SyncSettings};
//! use std::sync::{mpsc, Arc};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let (tx, rx) = mpsc::channel();
//! let engine = SyncEngine::new(
//!     Arc::new(OctocrabClient::anonymous(None)?),
//!     FeedStore::open_default()?,
//!     SyncSettings::default(),
//!     Notifier::new(tx),
//!     tokio::runtime::Handle::current(),
//! );
//!
//! if let RefreshRequest::Started(cycle) = engine.start() {
//!     let report = cycle.await?;
//!     println!("{} new events", report.new_events);
//! }
//! for event in engine.snapshot() {
//!     println!("{} {}", event.kind(), event.repo_name());
//! }
//! # drop(rx);
//! # Ok(())
//! # }
//! ```

pub mod discovery;
pub mod engine;
pub mod event;
pub mod fetcher;
pub mod merge;
pub mod notifier;
pub mod store;

#[cfg(test)]
mod test_support;

pub use engine::{CycleReport, RefreshRequest, SyncEngine, SyncPhase, SyncSettings};
pub use event::Event;
pub use fetcher::{EventsFetch, FetchError, FetchOutcome};
pub use merge::HISTORY_LIMIT;
pub use notifier::{Notifier, SyncNotification};
pub use store::FeedStore;
