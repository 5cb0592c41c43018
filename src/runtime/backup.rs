//! Periodic backup sweep over every live resource unit.
//!
//! Finish callbacks can be lost. The sweeper re-runs recomputation on a fixed
//! interval so that finished executions still release their permits.
//!
//! A sweep queries the status oracle, which may block on I/O, so each sweep
//! runs on tokio's blocking pool. Shutdown does not wait for an in-flight
//! sweep; it finishes on the blocking pool and its writes stay atomic per unit.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::config::BackupConfig;
use crate::core::{ConstraintStore, ExecutionStatusLookup, InstanceStore, ResourceConstraintScheduler};

/// Handle to a running sweeper task.
pub struct BackupSweeper {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl BackupSweeper {
    /// Spawn a sweeper on the current tokio runtime.
    ///
    /// The first sweep runs immediately, then once per `interval`.
    #[must_use]
    pub fn spawn<S, O>(scheduler: Arc<ResourceConstraintScheduler<S, O>>, interval: Duration) -> Self
    where
        S: InstanceStore + ConstraintStore + 'static,
        O: ExecutionStatusLookup + 'static,
    {
        let (shutdown, mut stop) = watch::channel(false);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::info!(interval_ms = interval.as_millis(), "backup sweeper started");
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let sweeping = Arc::clone(&scheduler);
                        let sweep = tokio::task::spawn_blocking(move || sweeping.sweep());
                        tokio::select! {
                            joined = sweep => match joined {
                                Ok(Ok(report)) if report.transitions > 0 || report.failures > 0 => {
                                    tracing::info!(?report, "backup sweep applied changes");
                                }
                                Ok(Ok(_)) => {}
                                Ok(Err(e)) => tracing::warn!(error = %e, "backup sweep failed"),
                                Err(e) => tracing::error!(error = %e, "backup sweep panicked"),
                            },
                            _ = stop.changed() => {
                                tracing::info!("shutdown requested during sweep; leaving it to finish");
                                break;
                            }
                        }
                    }
                    changed = stop.changed() => {
                        if changed.is_err() || *stop.borrow() {
                            break;
                        }
                    }
                }
            }
            tracing::info!("backup sweeper stopped");
        });
        Self { shutdown, handle }
    }

    /// Spawn a sweeper if `config` enables one.
    #[must_use]
    pub fn from_config<S, O>(scheduler: Arc<ResourceConstraintScheduler<S, O>>, config: &BackupConfig) -> Option<Self>
    where
        S: InstanceStore + ConstraintStore + 'static,
        O: ExecutionStatusLookup + 'static,
    {
        config
            .enabled
            .then(|| Self::spawn(scheduler, Duration::from_secs(config.interval_secs)))
    }

    /// Whether the sweeper task has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Stop the sweeper and wait for its task to exit.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.handle.await {
            tracing::error!(error = %e, "backup sweeper task panicked");
        }
    }
}
