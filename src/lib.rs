pub mod aggregator;
pub mod concurrent;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod http_client;
pub mod output;
pub mod probe;
pub mod progress;
pub mod wordlist;

// re-export the engine surface used by the binary and tests
pub use crate::aggregator::{FoundCollection, RunResult, RunStats};
pub use crate::concurrent::ConcurrencyLimiter;
pub use crate::dispatcher::{Dispatcher, RunPhase};
pub use crate::error::{HunterError, TaskError};
pub use crate::probe::{Probe, ProbeFn, ProbeOutcome};
pub use crate::progress::{ConsoleProgress, NoProgress, ProgressSink, RunProgress};
