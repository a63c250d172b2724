
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::core::api::types::RunStatus;

use super::{JobProbe, JobSnapshot, WatchConfig, WatchEvent, WatchOutcome};

/// One scripted response to a status poll.
pub enum Step {
    Snapshot(JobSnapshot),
    Fail(&'static str),
    /// Never resolves. Also what an exhausted script does, so a test that
    /// over-polls times out instead of inventing extra terminal events.
    Hang,
}

pub struct ScriptedProbe {
    steps: Mutex<VecDeque<Step>>,
    result_calls: Arc<AtomicUsize>,
    fail_result: bool,
}

impl ScriptedProbe {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            result_calls: Arc::new(AtomicUsize::new(0)),
            fail_result: false,
        }
    }

    pub fn with_failing_result(steps: Vec<Step>) -> Self {
        let mut probe = Self::new(steps);
        probe.fail_result = true;
        probe
    }

    pub fn result_calls(&self) -> Arc<AtomicUsize> {
        self.result_calls.clone()
    }
}

#[async_trait]
impl JobProbe for ScriptedProbe {
    type Output = String;

    async fn status(&self) -> Result<JobSnapshot> {
        let step = self
            .steps
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        match step {
            Some(Step::Snapshot(snapshot)) => Ok(snapshot),
            Some(Step::Fail(message)) => Err(anyhow!(message)),
            Some(Step::Hang) | None => {
                std::future::pending::<()>().await;
                unreachable!("pending future resolved")
            }
        }
    }

    async fn result(&self) -> Result<String> {
        self.result_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_result {
            Err(anyhow!("results endpoint returned 500"))
        } else {
            Ok("payload".to_string())
        }
    }
}

pub fn snap(status: RunStatus, completed: u64, total: u64) -> Step {
    Step::Snapshot(JobSnapshot {
        status,
        completed_units: completed,
        total_units: total,
        error_message: None,
    })
}

pub fn snap_with_error(status: RunStatus, completed: u64, total: u64, message: &str) -> Step {
    Step::Snapshot(JobSnapshot {
        status,
        completed_units: completed,
        total_units: total,
        error_message: Some(message.to_string()),
    })
}

pub fn fast_config(error_ceiling: u32) -> WatchConfig {
    WatchConfig {
        interval: Duration::from_millis(5),
        error_ceiling,
    }
}

/// Receives events until the poll loop ends and its sender drops. Only
/// valid for scripts that reach a terminal event or a dropped sender.
pub async fn drain(mut rx: mpsc::Receiver<WatchEvent<String>>) -> Vec<WatchEvent<String>> {
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    events
}

pub fn expect_progress(event: &WatchEvent<String>) -> (u64, u64, RunStatus) {
    match event {
        WatchEvent::Progress {
            completed,
            total,
            status,
        } => (*completed, *total, *status),
        other => panic!("expected progress event, got {:?}", other),
    }
}

pub fn expect_finished(event: WatchEvent<String>) -> WatchOutcome<String> {
    match event {
        WatchEvent::Finished(outcome) => outcome,
        other => panic!("expected finished event, got {:?}", other),
    }
}

pub fn finished_count(events: &[WatchEvent<String>]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, WatchEvent::Finished(_)))
        .count()
}
