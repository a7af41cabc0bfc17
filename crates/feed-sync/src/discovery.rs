//! Repository discovery
//!
//! Turns a search query into the list of repositories whose events a cycle
//! fetches. Any failure yields an empty list: the cycle simply has nothing
//! to fetch.

use feed_client::FeedClient;
use log::{debug, warn};
use serde_json::Value;

/// Resolve a search query to at most `page_size` repository full names
pub async fn discover(client: &dyn FeedClient, query: &str, page_size: u8) -> Vec<String> {
    match client.search_repositories(query, page_size).await {
        Ok(result) => {
            let mut names = repository_names(&result);
            names.truncate(usize::from(page_size));
            debug!("Discovered {} repositories for {:?}", names.len(), query);
            names
        }
        Err(e) => {
            warn!("Repository discovery failed for {:?}: {:#}", query, e);
            Vec::new()
        }
    }
}

/// Extract `full_name` from each element of a search result's `items`
///
/// Items without a string `full_name` are dropped. A result without an
/// `items` array yields nothing.
pub fn repository_names(result: &Value) -> Vec<String> {
    let Some(items) = result.get("items").and_then(Value::as_array) else {
        debug!("Search result has no items array");
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| item.get("full_name").and_then(Value::as_str))
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
