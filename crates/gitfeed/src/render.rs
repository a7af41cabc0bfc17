//! Plain-text rendering of the feed
//!
//! Each event becomes a row: the kind as title, the repository and the
//! humanized action as subtitle, and the avatar URL or a placeholder.

use feed_sync::Event;
use std::fmt::Write;

const AVATAR_PLACEHOLDER: &str = "(no avatar)";

/// Display data of one feed row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub title: String,
    pub subtitle: String,
    pub avatar: String,
}

impl Row {
    pub fn from_event(event: &Event) -> Self {
        Self {
            title: event.kind().to_string(),
            subtitle: format!("{}, {}", event.repo_name(), event.humanized_action()),
            avatar: event
                .avatar_url()
                .unwrap_or(AVATAR_PLACEHOLDER)
                .to_string(),
        }
    }
}

/// Render the whole feed, one two-line entry per event
pub fn render_feed(events: &[Event]) -> String {
    let mut out = String::new();

    if events.is_empty() {
        out.push_str("No activity yet.\n");
        return out;
    }

    for (index, event) in events.iter().enumerate() {
        let row = Row::from_event(event);
        let _ = writeln!(
            out,
            "{:>2}. {} by {}",
            index + 1,
            row.title,
            event.actor_name()
        );
        let _ = writeln!(out, "    {}  {}", row.subtitle, row.avatar);
    }

    out
}
