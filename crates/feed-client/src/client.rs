//! Feed client trait
//!
//! This module defines the `FeedClient` trait that all client
//! implementations must satisfy.

use crate::types::RawResponse;
use async_trait::async_trait;

/// GitHub API client trait for the activity feed
///
/// Implementations can hit the API directly or serve canned responses
/// in tests. Both methods return transport-level errors only: a response
/// with a non-success status is still `Ok` for `fetch_repository_events`,
/// since classifying it is the caller's job.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a single client can be shared
/// by all per-repository fetch tasks of a refresh cycle.
#[async_trait]
pub trait FeedClient: Send + Sync {
    /// Search repositories
    ///
    /// # Arguments
    ///
    /// * `query` - GitHub search query (e.g., "language:swift")
    /// * `per_page` - Maximum number of results to return
    ///
    /// # Returns
    ///
    /// The decoded JSON search result object, which carries an `items` array.
    async fn search_repositories(
        &self,
        query: &str,
        per_page: u8,
    ) -> anyhow::Result<serde_json::Value>;

    /// Fetch the public events of a repository
    ///
    /// # Arguments
    ///
    /// * `full_name` - Repository identifier in `owner/name` form
    /// * `if_modified_since` - Freshness token from a previous response,
    ///   sent as a conditional header when present
    ///
    /// # Returns
    ///
    /// The raw response whatever its status, or an error if no response
    /// was received at all.
    async fn fetch_repository_events(
        &self,
        full_name: &str,
        if_modified_since: Option<&str>,
    ) -> anyhow::Result<RawResponse>;
}
