//! Cancellable Periodic Tasks
//!
//! Polling stands in for push delivery in this design, so every poll loop
//! is an explicit scheduled task with start/stop/restart transitions
//! rather than an implicit lifecycle hook. A running poller is a spawned
//! task selecting between an interval tick and a oneshot shutdown
//! channel; stopping is idempotent and dropping the poller stops it.
//!
//! The first tick fires one full period after `start`; callers that want
//! an immediate fetch do it explicitly before starting the timer.

use std::future::Future;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::{debug, info};

/// A named, restartable polling timer
pub struct Poller {
    name: &'static str,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Poller {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            shutdown_tx: None,
            handle: None,
        }
    }

    /// Start the poller, stopping any previous run first
    ///
    /// `tick` is invoked once per period until the poller is stopped.
    pub fn start<F, Fut>(&mut self, period: Duration, mut tick: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        self.stop();

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();
        let name = self.name;
        info!("starting {} poller (period {:?})", name, period);

        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        debug!("{} poller tick", name);
                        tick().await;
                    }
                    _ = &mut shutdown_rx => {
                        info!("{} poller shutting down", name);
                        break;
                    }
                }
            }
        });

        self.shutdown_tx = Some(shutdown_tx);
        self.handle = Some(handle);
    }

    /// Stop the poller; a no-op when it is not running
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        self.handle = None;
    }

    /// Whether the polling task is still alive
    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}
