//! GitHub API client for the activity feed
//!
//! This crate provides a trait-based client covering the two endpoints the
//! feed needs: repository search and per-repository event listing. Event
//! requests are conditional, carrying an `If-Modified-Since` marker, and hand
//! back the raw status, `Last-Modified` header and body so that callers can
//! classify the response themselves.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │               FeedClient trait                   │
//! │  - search_repositories()                         │
//! │  - fetch_repository_events()                     │
//! └─────────────────────────────────────────────────┘
//!                        │
//!        ┌───────────────┴───────────────┐
//!        ▼                               ▼
//! ┌─────────────────┐         ┌─────────────────────┐
//! │ OctocrabClient  │         │ test doubles        │
//! │ (direct API)    │         │ (canned responses)  │
//! └─────────────────┘         └─────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use feed_client::{FeedClient, OctocrabClient};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = OctocrabClient::anonymous(None)?;
//!
//! let search = client.search_repositories("language:swift", 5).await?;
//! let events = client
//!     .fetch_repository_events("ReactiveX/RxSwift", Some("Tue, 01 Oct 2024 10:00:00 GMT"))
//!     .await?;
//! println!("{} -> {:?}", events.status, events.last_modified);
//! # let _ = search;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod octocrab_client;
pub mod types;

/// Default GitHub API base URI (public GitHub)
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

pub use client::FeedClient;
pub use octocrab_client::OctocrabClient;
pub use types::{RawResponse, StatusClass};

// Re-export octocrab so consumers don't need to depend on it directly
pub use octocrab;
