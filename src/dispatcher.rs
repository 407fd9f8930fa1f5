use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use parking_lot::Mutex;

use crate::aggregator::{ResultAggregator, RunResult};
use crate::concurrent::ConcurrencyLimiter;
use crate::error::HunterError;
use crate::probe::{Probe, ProbeOutcome};
use crate::progress::{ProgressSink, RunProgress};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Running,
    Completed,
}

/// Shared mutable state of a run. Every completion updates it under one lock.
struct RunState {
    completed: usize,
    settled: Vec<bool>,
    results: ResultAggregator,
}

/// Fans a wordlist out over the limiter and collects one outcome per entry.
pub struct Dispatcher {
    limiter: ConcurrencyLimiter,
    probe: Arc<dyn Probe>,
    progress: Arc<dyn ProgressSink>,
    phase: Mutex<RunPhase>,
}

impl Dispatcher {
    pub fn new(
        limiter: ConcurrencyLimiter,
        probe: Arc<dyn Probe>,
        progress: Arc<dyn ProgressSink>,
    ) -> Self {
        Self {
            limiter,
            probe,
            progress,
            phase: Mutex::new(RunPhase::Idle),
        }
    }

    /// Build a dispatcher with its own limiter. Fails on an invalid concurrency.
    pub fn with_concurrency(
        concurrency: usize,
        probe: Arc<dyn Probe>,
        progress: Arc<dyn ProgressSink>,
    ) -> Result<Self, HunterError> {
        Ok(Self::new(ConcurrencyLimiter::new(concurrency)?, probe, progress))
    }

    pub fn phase(&self) -> RunPhase {
        *self.phase.lock()
    }

    /// Probe every candidate and wait for all of them to settle.
    ///
    /// Candidates are all submitted up front; the limiter provides the
    /// backpressure. Probe errors and panics are recorded as
    /// [`ProbeOutcome::Error`] and never abort the run.
    pub async fn run(&self, candidates: Vec<String>) -> Result<RunResult, HunterError> {
        {
            let mut phase = self.phase.lock();
            if *phase != RunPhase::Idle {
                return Err(HunterError::AlreadyStarted);
            }
            *phase = RunPhase::Running;
        }

        let total = candidates.len();
        tracing::info!(total, concurrency = self.limiter.limit(), "starting probe run");
        self.progress.on_start(total);

        let state = Arc::new(Mutex::new(RunState {
            completed: 0,
            settled: vec![false; total],
            results: ResultAggregator::new(),
        }));

        let mut pending = FuturesUnordered::new();
        for (index, candidate) in candidates.into_iter().enumerate() {
            let name = candidate.clone();
            let probe = self.probe.clone();
            let progress = self.progress.clone();
            let state_ref = state.clone();

            let handle = self.limiter.schedule(async move {
                let outcome = probe_one(probe.as_ref(), &candidate).await;
                settle(&state_ref, progress.as_ref(), total, index, candidate, outcome);
            });
            pending.push(handle.map(move |res| (index, name, res)));
        }

        while let Some((index, name, res)) = pending.next().await {
            if let Err(e) = res {
                tracing::warn!(candidate = %name, error = %e, "probe task lost, recording as error");
                let outcome = ProbeOutcome::Error { reason: e.to_string() };
                settle(&state, self.progress.as_ref(), total, index, name, outcome);
            }
        }

        let results = std::mem::take(&mut state.lock().results);
        if !results.errored().is_empty() {
            tracing::debug!(errored = ?results.errored(), "candidates with probe errors");
        }
        let result = results.finish(total);

        self.progress.on_finish();
        *self.phase.lock() = RunPhase::Completed;
        tracing::info!(
            completed = result.stats.completed,
            found = result.stats.found,
            not_found = result.stats.not_found,
            errors = result.stats.errors,
            "probe run completed"
        );
        Ok(result)
    }
}

async fn probe_one(probe: &dyn Probe, candidate: &str) -> ProbeOutcome {
    match AssertUnwindSafe(probe.probe(candidate)).catch_unwind().await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(e)) => {
            tracing::debug!(candidate, error = %e, "probe failed");
            ProbeOutcome::Error { reason: format!("{:#}", e) }
        }
        Err(payload) => {
            let reason = panic_message(payload.as_ref());
            tracing::warn!(candidate, %reason, "probe panicked");
            ProbeOutcome::Error { reason }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panic: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panic: {}", s)
    } else {
        "panic".to_string()
    }
}

/// Record one outcome, bump the counter and notify progress as one step.
/// A candidate index settles at most once.
fn settle(
    state: &Mutex<RunState>,
    progress: &dyn ProgressSink,
    total: usize,
    index: usize,
    candidate: String,
    outcome: ProbeOutcome,
) {
    let mut state = state.lock();
    if std::mem::replace(&mut state.settled[index], true) {
        return;
    }
    state.completed += 1;
    let completed = state.completed;
    tracing::debug!("[{}/{}] {} -> {:?}", completed, total, candidate, outcome);

    let snapshot = RunProgress {
        completed,
        total,
        current_candidate: candidate.clone(),
    };
    state.results.record(index, candidate, outcome);
    progress.on_complete(&snapshot);
}
