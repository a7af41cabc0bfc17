//! Octocrab-based feed client
//!
//! Direct implementation of the `FeedClient` trait using the octocrab library.
//! Event requests go through octocrab's raw request API so that status codes
//! other than 2xx reach the caller instead of being turned into errors.

use crate::client::FeedClient;
use crate::types::RawResponse;
use anyhow::Context;
use async_trait::async_trait;
use http::header::{HeaderMap, HeaderName, HeaderValue, IF_MODIFIED_SINCE, LAST_MODIFIED};
use log::debug;
use octocrab::Octocrab;
use serde::Serialize;
use std::sync::Arc;

/// Query parameters of the repository search endpoint
#[derive(Debug, Serialize)]
struct SearchParams<'a> {
    q: &'a str,
    per_page: u8,
}

/// Direct GitHub API client using octocrab
#[derive(Debug, Clone)]
pub struct OctocrabClient {
    octocrab: Arc<Octocrab>,
}

impl OctocrabClient {
    /// Create a new client with the given octocrab instance
    pub fn new(octocrab: Arc<Octocrab>) -> Self {
        Self { octocrab }
    }

    /// Create an unauthenticated client
    ///
    /// # Arguments
    ///
    /// * `base_uri` - API base URI, `None` for public GitHub
    pub fn anonymous(base_uri: Option<&str>) -> anyhow::Result<Self> {
        let mut builder = Octocrab::builder();

        if let Some(uri) = base_uri {
            builder = builder.base_uri(uri).context("Failed to set base URI")?;
        }

        let octocrab = builder.build().context("Failed to build Octocrab client")?;
        Ok(Self::new(Arc::new(octocrab)))
    }

    /// Get a reference to the underlying octocrab instance
    pub fn octocrab(&self) -> &Octocrab {
        &self.octocrab
    }
}

#[async_trait]
impl FeedClient for OctocrabClient {
    async fn search_repositories(
        &self,
        query: &str,
        per_page: u8,
    ) -> anyhow::Result<serde_json::Value> {
        debug!("Searching repositories: q={} per_page={}", query, per_page);

        let params = SearchParams { q: query, per_page };
        let result: serde_json::Value = self
            .octocrab
            .get("/search/repositories", Some(&params))
            .await
            .context("Repository search failed")?;

        Ok(result)
    }

    async fn fetch_repository_events(
        &self,
        full_name: &str,
        if_modified_since: Option<&str>,
    ) -> anyhow::Result<RawResponse> {
        debug!(
            "Fetching events for {} (if-modified-since: {:?})",
            full_name, if_modified_since
        );

        let route = format!("/repos/{}/events", full_name);
        let headers = conditional_headers(if_modified_since);

        let response = self
            .octocrab
            ._get_with_headers(route.as_str(), Some(headers))
            .await
            .with_context(|| format!("Failed to fetch events for {}", full_name))?;

        let status = response.status().as_u16();
        let last_modified = header_string(response.headers(), &LAST_MODIFIED);

        // Only a 2xx body is ever parsed
        let body = if (200..300).contains(&status) {
            self.octocrab
                .body_to_string(response)
                .await
                .with_context(|| format!("Failed to read events body for {}", full_name))?
        } else {
            String::new()
        };

        debug!(
            "Events response for {}: status={} last-modified={:?} bytes={}",
            full_name,
            status,
            last_modified,
            body.len()
        );

        Ok(RawResponse {
            status,
            last_modified,
            body,
        })
    }
}

/// Build the request headers for a conditional events request
///
/// A token that is not a valid header value is dropped, which turns the
/// request into an unconditional one.
fn conditional_headers(if_modified_since: Option<&str>) -> HeaderMap {
    let mut headers = HeaderMap::new();

    if let Some(token) = if_modified_since {
        match HeaderValue::from_str(token) {
            Ok(value) => {
                headers.insert(IF_MODIFIED_SINCE, value);
            }
            Err(e) => {
                debug!("Ignoring unusable freshness token {:?}: {}", token, e);
            }
        }
    }

    headers
}

/// Read a header as an owned string, skipping non-ASCII values
fn header_string(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
