use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::future::BoxFuture;
use tokio::sync::{mpsc, oneshot, Semaphore};

use crate::config::RunConfig;
use crate::error::{HunterError, TaskError};

type Job = BoxFuture<'static, ()>;

/// Semaphore-gated task queue.
///
/// Scheduled futures are queued in submission order and a single driver task
/// admits them one by one as permits become free, so admission is strictly
/// FIFO and at most `limit` tasks run at once. A task that never finishes keeps
/// its permit forever; the other slots keep working.
///
/// Must be created inside a tokio runtime.
pub struct ConcurrencyLimiter {
    queue: mpsc::UnboundedSender<Job>,
    semaphore: Arc<Semaphore>,
    limit: usize,
}

impl ConcurrencyLimiter {
    pub fn new(limit: usize) -> Result<Self, HunterError> {
        RunConfig::new(limit).validate()?;

        let semaphore = Arc::new(Semaphore::new(limit));
        let (queue, rx) = mpsc::unbounded_channel();
        tokio::spawn(drive(rx, semaphore.clone()));

        Ok(Self { queue, semaphore, limit })
    }

    /// Queue `task` for execution. Never waits; the returned handle resolves
    /// with the task's output once it has been admitted and run.
    pub fn schedule<F>(&self, task: F) -> TaskHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let job: Job = Box::pin(async move {
            let output = task.await;
            let _ = tx.send(output);
        });

        let closed = self.queue.send(job).is_err();
        if closed {
            tracing::warn!("limiter driver is gone, task dropped");
        }
        TaskHandle { rx, closed }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Number of tasks currently holding a slot.
    pub fn in_flight(&self) -> usize {
        self.limit - self.semaphore.available_permits()
    }
}

async fn drive(mut rx: mpsc::UnboundedReceiver<Job>, semaphore: Arc<Semaphore>) {
    while let Some(job) = rx.recv().await {
        let permit = match semaphore.clone().acquire_owned().await {
            Ok(p) => p,
            Err(_) => break,
        };
        tokio::spawn(async move {
            job.await;
            drop(permit); // Release slot
        });
    }
}

/// Resolves with the scheduled task's output, or a [`TaskError`] when the task
/// was never admitted or died before producing a value.
pub struct TaskHandle<T> {
    rx: oneshot::Receiver<T>,
    closed: bool,
}

impl<T> Future for TaskHandle<T> {
    type Output = Result<T, TaskError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if this.closed {
            return Poll::Ready(Err(TaskError::Closed));
        }
        Pin::new(&mut this.rx)
            .poll(cx)
            .map(|res| res.map_err(|_| TaskError::Aborted))
    }
}
