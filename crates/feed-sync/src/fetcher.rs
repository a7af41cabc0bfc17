//! Conditional event fetcher
//!
//! Issues one events request per repository and classifies the response.
//! The event batch and the freshness token are two separate results of the
//! same response: a 304 carries no events but may still carry a newer
//! `Last-Modified` value that has to be kept.

use crate::event::Event;
use feed_client::{FeedClient, RawResponse, StatusClass};
use log::debug;
use thiserror::Error;

/// Why a fetch produced no data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// No response was received
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a status outside 2xx/3xx
    #[error("unexpected status {0}")]
    Status(u16),
}

/// What a fetch means for the event history
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// 2xx: parsed events, possibly none
    Fresh(Vec<Event>),
    /// 3xx: nothing new since the freshness token
    NotModified,
    /// Failure, treated as "no new events" for this cycle
    Failed(FetchError),
}

/// Result of fetching one repository's events
#[derive(Debug, Clone, PartialEq)]
pub struct EventsFetch {
    /// Repository the request was made for
    pub repository: String,
    pub outcome: FetchOutcome,
    /// `Last-Modified` of a 2xx/3xx response
    pub freshness_token: Option<String>,
}

impl EventsFetch {
    /// Events to merge, empty unless the fetch succeeded with data
    pub fn new_events(&self) -> &[Event] {
        match &self.outcome {
            FetchOutcome::Fresh(events) => events,
            _ => &[],
        }
    }
}

/// Fetch a repository's events, sending `freshness_token` as a condition
pub async fn fetch_events(
    client: &dyn FeedClient,
    repository: &str,
    freshness_token: Option<&str>,
) -> EventsFetch {
    match client
        .fetch_repository_events(repository, freshness_token)
        .await
    {
        Ok(response) => classify(repository, response),
        Err(e) => {
            debug!("Event fetch for {} failed: {:#}", repository, e);
            EventsFetch {
                repository: repository.to_string(),
                outcome: FetchOutcome::Failed(FetchError::Transport(e.to_string())),
                freshness_token: None,
            }
        }
    }
}

/// Classify a received response
pub fn classify(repository: &str, response: RawResponse) -> EventsFetch {
    let class = response.status_class();

    let freshness_token = if class.carries_freshness() {
        response.last_modified
    } else {
        None
    };

    let outcome = match class {
        StatusClass::Success => FetchOutcome::Fresh(parse_body(repository, &response.body)),
        StatusClass::Redirection => FetchOutcome::NotModified,
        _ => FetchOutcome::Failed(FetchError::Status(response.status)),
    };

    EventsFetch {
        repository: repository.to_string(),
        outcome,
        freshness_token,
    }
}

fn parse_body(repository: &str, body: &str) -> Vec<Event> {
    match serde_json::from_str(body) {
        Ok(records) => Event::parse_batch(records),
        Err(e) => {
            debug!("Events body for {} is not JSON: {}", repository, e);
            Vec::new()
        }
    }
}
