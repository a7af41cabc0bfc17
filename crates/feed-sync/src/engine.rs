//! Synchronization orchestrator
//!
//! One refresh cycle runs discovery once, then fetches every discovered
//! repository concurrently. Each response is consumed exactly once by two
//! handlers:
//! - the token handler persists a new `Last-Modified` value right away
//! - the batch handler merges non-empty event batches into the history
//!
//! ```text
//! Idle ──► Discovering ──► Fetching ◄──► Merging
//!  ▲                          │
//!  └──────── RefreshFinished ◄┘
//! ```
//!
//! At most one cycle runs at a time. A `refresh()` issued while a cycle is
//! in flight joins that cycle instead of starting a second one. Cycles run on
//! the runtime handed to the engine, so `refresh()` works from any thread.

use crate::discovery;
use crate::event::Event;
use crate::fetcher::{self, EventsFetch, FetchOutcome};
use crate::merge::{self, HISTORY_LIMIT};
use crate::notifier::{Notifier, SyncNotification};
use crate::store::FeedStore;
use feed_client::FeedClient;
use feed_config::{AppConfig, MAX_PAGE_SIZE};
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::runtime::Handle;
use tokio::task::{JoinHandle, JoinSet};

/// Where the engine is in its refresh cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SyncPhase {
    Idle = 0,
    Discovering = 1,
    Fetching = 2,
    Merging = 3,
}

impl From<u8> for SyncPhase {
    fn from(v: u8) -> Self {
        match v {
            1 => SyncPhase::Discovering,
            2 => SyncPhase::Fetching,
            3 => SyncPhase::Merging,
            _ => SyncPhase::Idle,
        }
    }
}

/// Tunables of a refresh cycle
///
/// `page_size` is bounded by `MAX_PAGE_SIZE` and `history_limit` by
/// `HISTORY_LIMIT`; the engine clamps out-of-range values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSettings {
    /// Search query used for repository discovery
    pub search_query: String,
    /// Number of repositories fetched per cycle
    pub page_size: u8,
    /// Bound on the history length
    pub history_limit: usize,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl SyncSettings {
    /// Clamp the page size and history bound into their valid ranges
    pub fn clamped(self) -> Self {
        let page_size = self.page_size.clamp(1, MAX_PAGE_SIZE);
        let history_limit = self.history_limit.clamp(1, HISTORY_LIMIT);

        if page_size != self.page_size || history_limit != self.history_limit {
            warn!(
                "Sync settings out of range (page_size {}, history_limit {}), using {} and {}",
                self.page_size, self.history_limit, page_size, history_limit
            );
        }

        Self {
            page_size,
            history_limit,
            ..self
        }
    }
}

impl From<&AppConfig> for SyncSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            search_query: config.search_query.clone(),
            page_size: config.page_size,
            history_limit: config.history_limit,
        }
        .clamped()
    }
}

/// Summary of one refresh cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Repositories returned by discovery
    pub repositories: usize,
    /// Events merged into the history
    pub new_events: usize,
    /// Fetches answered with "not modified"
    pub not_modified: usize,
    /// Fetches that failed (transport or error status)
    pub failed: usize,
    /// Whether the freshness token changed
    pub token_updated: bool,
    /// History length at the end of the cycle
    pub history_len: usize,
}

/// Result of asking for a refresh
#[derive(Debug)]
pub enum RefreshRequest {
    /// A new cycle was spawned
    Started(JoinHandle<CycleReport>),
    /// A cycle was already running; its `RefreshFinished` covers this request
    Joined,
}

#[derive(Debug, Default)]
struct FeedState {
    history: Vec<Event>,
    freshness_token: Option<String>,
}

struct EngineInner {
    client: Arc<dyn FeedClient>,
    runtime: Handle,
    store: FeedStore,
    settings: SyncSettings,
    state: RwLock<FeedState>,
    phase: AtomicU8,
    in_flight: AtomicBool,
    notifier: Notifier,
}

/// Ends a cycle, even one that panicked or was cancelled: back to idle,
/// flag cleared, then `RefreshFinished`
struct CycleGuard<'a> {
    inner: &'a EngineInner,
    completed: bool,
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        if !self.completed {
            warn!("Refresh cycle ended before completing");
        }
        self.inner.set_phase(SyncPhase::Idle);
        self.inner.in_flight.store(false, Ordering::Release);
        self.inner.notifier.notify(SyncNotification::RefreshFinished);
    }
}

/// Incremental feed synchronization engine
///
/// Cheap to clone; all clones share the same state.
#[derive(Clone)]
pub struct SyncEngine {
    inner: Arc<EngineInner>,
}

impl SyncEngine {
    /// Create an engine, loading the cached history and freshness token
    ///
    /// Refresh cycles are spawned on `runtime`.
    pub fn new(
        client: Arc<dyn FeedClient>,
        store: FeedStore,
        settings: SyncSettings,
        notifier: Notifier,
        runtime: Handle,
    ) -> Self {
        let settings = settings.clamped();
        let mut history = store.load_history();
        history.truncate(settings.history_limit);
        let freshness_token = store.load_freshness_token();

        info!(
            "Sync engine ready: {} cached events, freshness token {:?}",
            history.len(),
            freshness_token
        );

        Self {
            inner: Arc::new(EngineInner {
                client,
                runtime,
                store,
                settings,
                state: RwLock::new(FeedState {
                    history,
                    freshness_token,
                }),
                phase: AtomicU8::new(SyncPhase::Idle as u8),
                in_flight: AtomicBool::new(false),
                notifier,
            }),
        }
    }

    /// Run the initial cycle
    pub fn start(&self) -> RefreshRequest {
        info!("Starting initial refresh");
        self.refresh()
    }

    /// Begin a refresh cycle unless one is already running
    pub fn refresh(&self) -> RefreshRequest {
        if self
            .inner
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Refresh requested while a cycle is running, joining it");
            return RefreshRequest::Joined;
        }

        let inner = Arc::clone(&self.inner);
        let runtime = self.inner.runtime.clone();
        RefreshRequest::Started(runtime.spawn(async move {
            let mut guard = CycleGuard {
                inner: inner.as_ref(),
                completed: false,
            };
            let report = inner.run_cycle().await;
            guard.completed = true;
            report
        }))
    }

    /// Current history, newest first
    pub fn snapshot(&self) -> Vec<Event> {
        self.inner.read_state().history.clone()
    }

    /// Current freshness token
    pub fn freshness_token(&self) -> Option<String> {
        self.inner.read_state().freshness_token.clone()
    }

    pub fn phase(&self) -> SyncPhase {
        SyncPhase::from(self.inner.phase.load(Ordering::Acquire))
    }

    pub fn is_refreshing(&self) -> bool {
        self.inner.in_flight.load(Ordering::Acquire)
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.inner.settings
    }
}

impl EngineInner {
    async fn run_cycle(&self) -> CycleReport {
        self.set_phase(SyncPhase::Discovering);
        let repositories = discovery::discover(
            self.client.as_ref(),
            &self.settings.search_query,
            self.settings.page_size,
        )
        .await;

        let mut report = CycleReport {
            repositories: repositories.len(),
            ..CycleReport::default()
        };

        self.set_phase(SyncPhase::Fetching);

        // Every request of a cycle carries the token as it was at cycle start
        let token = self.read_state().freshness_token.clone();

        let mut fetches = JoinSet::new();
        for repository in repositories {
            let client = Arc::clone(&self.client);
            let token = token.clone();
            fetches.spawn(async move {
                fetcher::fetch_events(client.as_ref(), &repository, token.as_deref()).await
            });
        }

        while let Some(joined) = fetches.join_next().await {
            match joined {
                Ok(fetch) => self.handle_fetch(fetch, &mut report),
                Err(e) => {
                    warn!("Event fetch task did not complete: {}", e);
                    report.failed += 1;
                }
            }
        }

        report.history_len = self.read_state().history.len();

        info!(
            "Refresh finished: {} repositories, {} new events, {} not modified, {} failed",
            report.repositories, report.new_events, report.not_modified, report.failed
        );

        report
    }

    /// Feed one response to the token handler and the batch handler
    fn handle_fetch(&self, fetch: EventsFetch, report: &mut CycleReport) {
        let EventsFetch {
            repository,
            outcome,
            freshness_token,
        } = fetch;

        if let Some(token) = freshness_token {
            if self.update_freshness_token(token) {
                report.token_updated = true;
            }
        }

        match outcome {
            FetchOutcome::Fresh(events) if events.is_empty() => {
                debug!("No events in response for {}", repository);
            }
            FetchOutcome::Fresh(events) => {
                debug!("{} new events from {}", events.len(), repository);
                report.new_events += events.len();
                self.merge_batch(events);
            }
            FetchOutcome::NotModified => {
                debug!("Events for {} not modified", repository);
                report.not_modified += 1;
            }
            FetchOutcome::Failed(e) => {
                debug!("No events from {} this cycle: {}", repository, e);
                report.failed += 1;
            }
        }
    }

    /// Store a token if it differs from the current one
    fn update_freshness_token(&self, token: String) -> bool {
        {
            let mut state = self.write_state();
            if state.freshness_token.as_deref() == Some(token.as_str()) {
                return false;
            }
            state.freshness_token = Some(token.clone());
        }

        self.store.save_freshness_token(&token);
        true
    }

    fn merge_batch(&self, batch: Vec<Event>) {
        self.set_phase(SyncPhase::Merging);

        let updated = {
            let mut state = self.write_state();
            state.history = merge::merge(batch, &state.history, self.settings.history_limit);
            state.history.clone()
        };

        self.store.save_history(&updated);
        self.notifier.notify(SyncNotification::HistoryChanged);
        self.set_phase(SyncPhase::Fetching);
    }

    fn set_phase(&self, phase: SyncPhase) {
        self.phase.store(phase as u8, Ordering::Release);
    }

    fn read_state(&self) -> RwLockReadGuard<'_, FeedState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, FeedState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
