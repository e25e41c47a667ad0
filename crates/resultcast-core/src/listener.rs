//! Run-lifecycle notifications, fanned out to whatever observers the harness
//! registered.
//!
//! The harness calls, per run: `run_started` once, then `test_started` /
//! `test_finished` for each test, then `run_finished` once, or
//! `run_interrupted` in its place when the run is aborted. Listeners trust
//! that order and do not check it.

use async_trait::async_trait;
use resultcast_common::{TestDescriptor, TestOutcome};

/// Observer of one test run.
///
/// Every method reports whether the notification was handled. The result is
/// advisory: a listener that returns `false` must not affect the run.
#[async_trait]
pub trait RunListener: Send {
    async fn run_started(&mut self, platform: &str, planned: &[TestDescriptor]) -> bool;

    async fn run_finished(&mut self, results: &[TestOutcome]) -> bool;

    async fn test_started(&mut self, outcome: &TestOutcome) -> bool;

    async fn test_finished(&mut self, outcome: &TestOutcome) -> bool;

    async fn run_interrupted(&mut self, not_run: &[TestDescriptor]) -> bool;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpListener;

#[async_trait]
impl RunListener for NoOpListener {
    async fn run_started(&mut self, _platform: &str, _planned: &[TestDescriptor]) -> bool {
        true
    }

    async fn run_finished(&mut self, _results: &[TestOutcome]) -> bool {
        true
    }

    async fn test_started(&mut self, _outcome: &TestOutcome) -> bool {
        true
    }

    async fn test_finished(&mut self, _outcome: &TestOutcome) -> bool {
        true
    }

    async fn run_interrupted(&mut self, _not_run: &[TestDescriptor]) -> bool {
        true
    }
}

/// Writes each notification to the `tracing` log, for the local operator.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingListener;

#[async_trait]
impl RunListener for TracingListener {
    async fn run_started(&mut self, platform: &str, planned: &[TestDescriptor]) -> bool {
        tracing::info!(platform, planned = planned.len(), "run started");
        true
    }

    async fn run_finished(&mut self, results: &[TestOutcome]) -> bool {
        let failed = results.iter().filter(|r| r.status.is_failure()).count();
        tracing::info!(results = results.len(), failed, "run finished");
        true
    }

    async fn test_started(&mut self, outcome: &TestOutcome) -> bool {
        tracing::debug!(test = %outcome.name, path = %outcome.path, "test started");
        true
    }

    async fn test_finished(&mut self, outcome: &TestOutcome) -> bool {
        if outcome.status.is_failure() {
            tracing::warn!(
                test = %outcome.name,
                status = ?outcome.status,
                duration_ms = outcome.duration.as_millis() as u64,
                message = outcome.message.as_deref().unwrap_or(""),
                "test failed"
            );
        } else {
            tracing::info!(
                test = %outcome.name,
                status = ?outcome.status,
                duration_ms = outcome.duration.as_millis() as u64,
                "test finished"
            );
        }
        true
    }

    async fn run_interrupted(&mut self, not_run: &[TestDescriptor]) -> bool {
        tracing::warn!(not_run = not_run.len(), "run interrupted");
        true
    }
}

/// Forwards every notification to each member, in registration order.
///
/// All members are always notified, even after one of them fails. The set
/// reports `true` only if every member did.
#[derive(Default)]
pub struct ListenerSet {
    listeners: Vec<Box<dyn RunListener>>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, listener: impl RunListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn with(mut self, listener: impl RunListener + 'static) -> Self {
        self.push(listener);
        self
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

#[async_trait]
impl RunListener for ListenerSet {
    async fn run_started(&mut self, platform: &str, planned: &[TestDescriptor]) -> bool {
        let mut all = true;
        for l in &mut self.listeners {
            all &= l.run_started(platform, planned).await;
        }
        all
    }

    async fn run_finished(&mut self, results: &[TestOutcome]) -> bool {
        let mut all = true;
        for l in &mut self.listeners {
            all &= l.run_finished(results).await;
        }
        all
    }

    async fn test_started(&mut self, outcome: &TestOutcome) -> bool {
        let mut all = true;
        for l in &mut self.listeners {
            all &= l.test_started(outcome).await;
        }
        all
    }

    async fn test_finished(&mut self, outcome: &TestOutcome) -> bool {
        let mut all = true;
        for l in &mut self.listeners {
            all &= l.test_finished(outcome).await;
        }
        all
    }

    async fn run_interrupted(&mut self, not_run: &[TestDescriptor]) -> bool {
        let mut all = true;
        for l in &mut self.listeners {
            all &= l.run_interrupted(not_run).await;
        }
        all
    }
}
