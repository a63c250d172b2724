pub mod probes;

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::core::api::types::RunStatus;

#[cfg(test)]
mod tests;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(3000);
pub const DEFAULT_ERROR_CEILING: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchConfig {
    pub interval: Duration,
    pub error_ceiling: u32,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            error_ceiling: DEFAULT_ERROR_CEILING,
        }
    }
}

/// One successful status poll, normalized across job kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSnapshot {
    pub status: RunStatus,
    pub completed_units: u64,
    pub total_units: u64,
    pub error_message: Option<String>,
}

/// A pollable backend job. `status` is cheap and repeatable; `result` is
/// fetched once, only after `status` reports `Completed`.
#[async_trait]
pub trait JobProbe: Send + Sync {
    type Output: Send;

    async fn status(&self) -> Result<JobSnapshot>;
    async fn result(&self) -> Result<Self::Output>;
}

#[derive(Debug)]
pub enum WatchEvent<T> {
    Progress {
        completed: u64,
        total: u64,
        status: RunStatus,
    },
    Finished(WatchOutcome<T>),
}

#[derive(Debug)]
pub enum WatchOutcome<T> {
    Completed(T),
    JobFailed { status: RunStatus, message: String },
    ResultFetchFailed { message: String },
    ConnectionLost { attempts: u32, message: String },
}

/// Owns the background poll task for one job. Dropping the watcher (or
/// calling `stop`) aborts the task, so a watch can never outlive the code
/// that started it.
pub struct RunWatcher {
    handle: Option<JoinHandle<()>>,
}

impl RunWatcher {
    pub fn new() -> Self {
        Self { handle: None }
    }

    /// Starts polling `probe` on the configured interval. Any previously
    /// started watch is stopped first, so at most one poll loop runs per
    /// watcher.
    pub fn start<P>(
        &mut self,
        probe: P,
        config: WatchConfig,
        events: mpsc::Sender<WatchEvent<P::Output>>,
    ) where
        P: JobProbe + 'static,
        P::Output: 'static,
    {
        self.stop();
        self.handle = Some(tokio::spawn(poll_loop(probe, config, events)));
    }

    /// Aborts the poll task. Safe to call repeatedly or when nothing is
    /// running; an in-flight request is cancelled at its next await point
    /// and no further events are delivered.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Default for RunWatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RunWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn poll_loop<P>(probe: P, config: WatchConfig, events: mpsc::Sender<WatchEvent<P::Output>>)
where
    P: JobProbe,
{
    let error_ceiling = config.error_ceiling.max(1);
    let mut ticker = tokio::time::interval(config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut consecutive_errors: u32 = 0;

    loop {
        ticker.tick().await;

        let snapshot = match probe.status().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                consecutive_errors += 1;
                tracing::debug!(
                    "status poll failed ({}/{}): {}",
                    consecutive_errors,
                    error_ceiling,
                    e
                );
                if consecutive_errors >= error_ceiling {
                    tracing::warn!("giving up after {} consecutive poll failures", consecutive_errors);
                    let _ = events
                        .send(WatchEvent::Finished(WatchOutcome::ConnectionLost {
                            attempts: consecutive_errors,
                            message: e.to_string(),
                        }))
                        .await;
                    return;
                }
                continue;
            }
        };

        consecutive_errors = 0;
        let progress = WatchEvent::Progress {
            completed: snapshot.completed_units,
            total: snapshot.total_units,
            status: snapshot.status,
        };
        if events.send(progress).await.is_err() {
            // Receiver is gone; nobody is watching anymore.
            return;
        }

        if !snapshot.status.is_terminal() {
            continue;
        }

        // Terminal status: the ticker is never awaited again, so the
        // finish path below runs at most once per watch.
        let outcome = match snapshot.status {
            RunStatus::Completed => match probe.result().await {
                Ok(output) => WatchOutcome::Completed(output),
                Err(e) => WatchOutcome::ResultFetchFailed {
                    message: e.to_string(),
                },
            },
            status => WatchOutcome::JobFailed {
                status,
                message: snapshot
                    .error_message
                    .unwrap_or_else(|| "run ended without an error message".to_string()),
            },
        };
        let _ = events.send(WatchEvent::Finished(outcome)).await;
        return;
    }
}
