//! Merge & cap policy for the event history

use crate::event::Event;

/// Bound on the number of events kept in the history
pub const HISTORY_LIMIT: usize = feed_config::MAX_HISTORY_LIMIT;

/// Prepend a freshly fetched batch to the history and cap the result
///
/// The batch goes in front so the history stays newest-first. No
/// deduplication happens: an event fetched twice is kept twice.
pub fn merge(new_batch: Vec<Event>, current_history: &[Event], limit: usize) -> Vec<Event> {
    let mut updated = new_batch;
    let room = limit.saturating_sub(updated.len());
    updated.extend(current_history.iter().take(room).cloned());
    updated.truncate(limit);
    updated
}
