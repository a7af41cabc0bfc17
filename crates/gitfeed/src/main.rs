use anyhow::Context;
use feed_client::OctocrabClient;
use feed_config::AppConfig;
use feed_sync::{FeedStore, Notifier, RefreshRequest, SyncEngine, SyncNotification, SyncSettings};
use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tokio::runtime::Runtime;

mod render;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let watch = std::env::args().skip(1).any(|arg| arg == "--watch");
    log::info!("Starting gitfeed (watch: {})", watch);

    let config = AppConfig::load();
    let runtime = Runtime::new().context("Failed to start async runtime")?;
    let runtime_guard = runtime.enter();

    let client = OctocrabClient::anonymous(config.api_base_uri.as_deref())?;
    let store = FeedStore::open_default().context("Failed to open feed cache")?;

    let (tx, rx) = mpsc::channel();
    let engine = SyncEngine::new(
        Arc::new(client),
        store,
        SyncSettings::from(&config),
        Notifier::new(tx),
        runtime.handle().clone(),
    );

    println!("Activity for repositories matching {:?}", config.search_query);
    print_feed(&engine)?;

    match engine.start() {
        // Detached: completion arrives as RefreshFinished
        RefreshRequest::Started(cycle) => drop(cycle),
        RefreshRequest::Joined => log::debug!("Initial refresh joined a running cycle"),
    }

    let quit = Arc::new(AtomicBool::new(false));
    if watch {
        println!("Press Enter to refresh, q to quit.");
        spawn_input_thread(engine.clone(), Arc::clone(&quit));
    }

    let result = run_loop(&engine, &rx, watch, &quit);

    drop(runtime_guard);
    runtime.shutdown_background();
    log::info!("Exiting gitfeed");
    result
}

/// Foreground loop: react to engine notifications until done
fn run_loop(
    engine: &SyncEngine,
    rx: &Receiver<SyncNotification>,
    watch: bool,
    quit: &AtomicBool,
) -> anyhow::Result<()> {
    loop {
        if quit.load(Ordering::Acquire) {
            return Ok(());
        }

        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(SyncNotification::HistoryChanged) => print_feed(engine)?,
            Ok(SyncNotification::RefreshFinished) => {
                if !watch {
                    return Ok(());
                }
                println!("Refresh finished.");
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                log::info!("Notification channel disconnected, shutting down");
                return Ok(());
            }
        }
    }
}

fn print_feed(engine: &SyncEngine) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(render::render_feed(&engine.snapshot()).as_bytes())?;
    stdout.flush()?;
    Ok(())
}

/// Read stdin: an empty line refreshes, `q` or EOF quits
fn spawn_input_thread(engine: SyncEngine, quit: Arc<AtomicBool>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if line.trim() == "q" {
                break;
            }
            if let RefreshRequest::Joined = engine.refresh() {
                println!("Refresh already in progress.");
            }
        }

        quit.store(true, Ordering::Release);
    });
}
