//! Notifications from the sync engine to the presentation layer
//!
//! The engine runs on the async runtime; the presentation layer owns the
//! receiving end of a channel and reacts on its own thread. Notifications
//! carry no data: on `HistoryChanged` the receiver pulls a fresh snapshot.

use std::sync::mpsc::Sender;

/// Signals sent to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncNotification {
    /// A merge replaced the history; pull a new snapshot
    HistoryChanged,
    /// A refresh cycle completed; stop any loading indicator
    RefreshFinished,
}

/// Sending side of the notification channel
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: Option<Sender<SyncNotification>>,
}

impl Notifier {
    /// Create a notifier feeding the given channel
    pub fn new(tx: Sender<SyncNotification>) -> Self {
        Self { tx: Some(tx) }
    }

    /// A notifier nobody listens to
    pub fn detached() -> Self {
        Self { tx: None }
    }

    pub fn notify(&self, notification: SyncNotification) {
        let Some(tx) = &self.tx else {
            return;
        };

        if let Err(e) = tx.send(notification) {
            log::debug!("Notifier: receiver gone, dropping {:?}", e.0);
        }
    }
}
