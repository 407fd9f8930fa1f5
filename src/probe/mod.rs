pub mod firestore;

use std::future::Future;

use async_trait::async_trait;

pub use firestore::FirestoreProbe;

/// Result of probing one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Found { item_count: u64 },
    NotFound,
    /// Probe-level failure. Reported like `NotFound`, kept apart for diagnostics.
    Error { reason: String },
}

impl ProbeOutcome {
    pub fn found(item_count: u64) -> Self {
        ProbeOutcome::Found { item_count }
    }
}

/// Existence/size check against a backend. Implementations may return `Err`
/// or even panic; the dispatcher turns both into [`ProbeOutcome::Error`].
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self, candidate: &str) -> anyhow::Result<ProbeOutcome>;
}

/// Adapts an async closure into a [`Probe`].
pub struct ProbeFn<F>(pub F);

#[async_trait]
impl<F, Fut> Probe for ProbeFn<F>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<ProbeOutcome>> + Send + 'static,
{
    async fn probe(&self, candidate: &str) -> anyhow::Result<ProbeOutcome> {
        (self.0)(candidate.to_string()).await
    }
}
