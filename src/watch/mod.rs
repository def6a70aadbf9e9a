//! Watch mode: recompute the build graph on filesystem changes.
//!
//! External file-watching (`notify`) feeds raw events into a debouncer;
//! once a batch is ready the graph is recomputed synchronously on this
//! thread. Events arriving while a recompute runs queue up in the channel
//! and are drained into the next single batch - overlapping triggers are
//! coalesced rather than racing two scans over a changing tree.
//!
//! Error policy (per error kind):
//! - transient scan failure: reported, previous graph retained
//! - entry collision / config error: fatal, propagates out of the loop

mod debounce;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use anyhow::Result;
use notify::{RecursiveMode, Watcher};

use crate::config::{self, reload_config};
use crate::graph::{self, BuildMode};
use crate::logger::{status_error, status_success};
use crate::{debug, log};
use debounce::Debouncer;

// =============================================================================
// Shutdown state
// =============================================================================

/// Shutdown has been requested (Ctrl+C received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Setup the global Ctrl+C handler. Call once at program start
pub fn setup_shutdown_handler() -> Result<()> {
    ctrlc::set_handler(|| {
        SHUTDOWN.store(true, Ordering::SeqCst);
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Check if shutdown has been requested
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

// =============================================================================
// Watch loop
// =============================================================================

/// Run the watch loop until shutdown.
///
/// The initial assemble is strict: any error (including a scan failure) is
/// fatal, since there is no previous graph to retain.
pub fn run(mode: BuildMode) -> Result<()> {
    let mut config = config::cfg();
    let mut current = graph::assemble(&config, mode)?;
    log!(
        "watch";
        "watching {} ({} entries)",
        config.src_dir().display(),
        current.entries.len()
    );

    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |res| {
        let _ = tx.send(res);
    })?;
    watcher.watch(&config.src_dir(), RecursiveMode::Recursive)?;
    watcher.watch(&config.config_path, RecursiveMode::NonRecursive)?;

    let mut debouncer = Debouncer::new();

    while !is_shutdown() {
        // Cap the wait so Ctrl+C is noticed even while idle
        let wait = debouncer.sleep_duration().min(Duration::from_millis(500));
        match rx.recv_timeout(wait) {
            Ok(Ok(event)) => debouncer.add_event(&event),
            Ok(Err(err)) => debug!("watch"; "watcher error: {}", err),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        // Drain everything already queued, including events that piled up
        // while the previous recompute was running: one batch absorbs them
        while let Ok(res) = rx.try_recv() {
            if let Ok(event) = res {
                debouncer.add_event(&event);
            }
        }

        let Some(changes) = debouncer.take_if_ready() else {
            continue;
        };

        if changes.contains_key(&config.config_path) {
            match reload_config() {
                Ok(true) => {
                    config = config::cfg();
                    log!("watch"; "config reloaded");
                }
                Ok(false) => {}
                // A broken config mid-edit should not kill the session
                Err(err) => {
                    status_error("config reload failed, keeping previous", &err.to_string());
                    continue;
                }
            }
        }

        debug!("watch"; "recomputing after {} change(s)", changes.len());
        match graph::recompute(&config, mode) {
            Ok(next) => {
                current = next;
                status_success(&format!(
                    "recomputed: {} entr{}",
                    current.entries.len(),
                    if current.entries.len() == 1 { "y" } else { "ies" }
                ));
            }
            Err(err) if err.is_transient() => {
                // Previous graph stays installed; no partial graph
                status_error("scan failed, keeping previous graph", &err.to_string());
            }
            Err(err) => return Err(err.into()),
        }
    }

    log!("watch"; "shutting down");
    Ok(())
}
