//! Shared fixtures for unit tests

use crate::event::Event;
use serde_json::{json, Value};

/// Build a well-formed raw event record
pub fn event_record(kind: &str, actor: &str, repo: &str) -> Value {
    json!({
        "type": kind,
        "actor": {
            "display_login": actor,
            "avatar_url": format!("https://avatars.githubusercontent.com/u/{}", actor),
        },
        "repo": { "name": repo },
    })
}

/// Build `count` parsed events whose actors are `{prefix}-0`, `{prefix}-1`, ...
pub fn events(prefix: &str, count: usize) -> Vec<Event> {
    (0..count)
        .map(|i| {
            let actor = format!("{}-{}", prefix, i);
            Event::parse(event_record("PushEvent", &actor, "octo/repo"))
                .expect("fixture record is well formed")
        })
        .collect()
}

/// Actor names of a sequence of events, in order
pub fn actors(events: &[Event]) -> Vec<String> {
    events.iter().map(|e| e.actor_name().to_string()).collect()
}
