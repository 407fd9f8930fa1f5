use std::io::{self, Write};

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use parking_lot::Mutex;
use tracing_subscriber::fmt::MakeWriter;

/// Snapshot emitted after each completed probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunProgress {
    pub completed: usize,
    pub total: usize,
    pub current_candidate: String,
}

/// Receives completion events. Called while the dispatcher holds its run lock,
/// so implementations must return quickly and must not call back into it.
pub trait ProgressSink: Send + Sync {
    fn on_start(&self, _total: usize) {}
    fn on_complete(&self, progress: &RunProgress);
    fn on_finish(&self) {}
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_complete(&self, _progress: &RunProgress) {}
}

/// Single overwritten terminal line: `Processing: <name> (<done>/<total>)`.
/// Log output must go through [`ConsoleProgress::log_writer`] so records are
/// printed above the line rather than onto it.
///
/// The line is only shown between `on_start` and `on_finish`.
pub struct ConsoleProgress {
    bar: ProgressBar,
    target: Mutex<Option<ProgressDrawTarget>>,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    pub fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::hidden());
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} Processing: {msg} ({pos}/{len})")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        Self {
            bar,
            target: Mutex::new(Some(target)),
        }
    }

    /// `MakeWriter` for the tracing subscriber, writing to stderr.
    pub fn log_writer(&self) -> SuspendingWriter<fn() -> io::Stderr> {
        self.log_writer_to(io::stderr as fn() -> io::Stderr)
    }

    pub fn log_writer_to<M>(&self, inner: M) -> SuspendingWriter<M> {
        SuspendingWriter {
            bar: self.bar.clone(),
            inner,
        }
    }
}

/// Wraps another `MakeWriter`; each record is buffered and written out with
/// the progress line cleared, then the line is redrawn below it.
pub struct SuspendingWriter<M> {
    bar: ProgressBar,
    inner: M,
}

impl<'a, M> MakeWriter<'a> for SuspendingWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = RecordWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        RecordWriter {
            bar: self.bar.clone(),
            inner: self.inner.make_writer(),
            buf: Vec::new(),
        }
    }
}

pub struct RecordWriter<W: Write> {
    bar: ProgressBar,
    inner: W,
    buf: Vec<u8>,
}

impl<W: Write> Write for RecordWriter<W> {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        let buf = std::mem::take(&mut self.buf);
        let inner = &mut self.inner;
        self.bar.suspend(|| {
            inner.write_all(&buf)?;
            inner.flush()
        })
    }
}

impl<W: Write> Drop for RecordWriter<W> {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for ConsoleProgress {
    fn on_start(&self, total: usize) {
        if let Some(target) = self.target.lock().take() {
            self.bar.set_draw_target(target);
        }
        self.bar.set_length(total as u64);
        self.bar.set_position(0);
    }

    fn on_complete(&self, progress: &RunProgress) {
        // Count first: the name shown must never be ahead of the count.
        self.bar.set_position(progress.completed as u64);
        self.bar.set_message(progress.current_candidate.clone());
    }

    fn on_finish(&self) {
        self.bar.finish();
        // Leave the final line in place; later records go straight through.
        self.bar.set_draw_target(ProgressDrawTarget::hidden());
    }
}
