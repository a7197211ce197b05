//! Periodic removal of expired links.
//!
//! Expiry is polling-based: a link is removed by the first sweep after its
//! lifetime elapses, not at the exact deadline.

use crate::link_store::LinkStore;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace, warn};
use weeklink_core::{Clock, KeyValueStore};

/// How often the sweep runs unless told otherwise.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

pub struct Sweeper;

impl Sweeper {
    /// Spawns a background task that sweeps `store` every `interval`.
    ///
    /// The first sweep runs immediately. Must be called from within a Tokio
    /// runtime.
    pub fn spawn<S, C>(store: LinkStore<S, C>, interval: Duration) -> SweeperHandle
    where
        S: KeyValueStore,
        C: Clock,
    {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let period = interval.max(MIN_SWEEP_INTERVAL);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            debug!(interval_ms = period.as_millis() as u64, "expiry sweeper started");

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => {
                        sweep_once(&store).await;
                    }
                }
            }

            debug!("expiry sweeper stopped");
        });

        SweeperHandle {
            shutdown: Some(shutdown_tx),
            task,
        }
    }
}

/// Runs one sweep and returns the number of links removed.
///
/// Failures are logged and reported as zero removals: the sweep is
/// best-effort maintenance and never surfaces errors to the user.
pub async fn sweep_once<S, C>(store: &LinkStore<S, C>) -> usize
where
    S: KeyValueStore,
    C: Clock,
{
    match store.remove_expired_links().await {
        Ok(removed) => {
            trace!(removed, "expiry sweep finished");
            removed
        }
        Err(e) => {
            warn!(error = %e, "expiry sweep failed");
            0
        }
    }
}

/// Controls a running [`Sweeper`].
///
/// Dropping the handle also stops the sweeper after its current sweep.
#[derive(Debug)]
pub struct SweeperHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Stops polling and waits for the task to exit.
    ///
    /// A sweep already in progress runs to completion first.
    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Err(e) = (&mut self.task).await {
            warn!(error = %e, "expiry sweeper task ended abnormally");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
