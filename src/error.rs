use std::path::PathBuf;

/// Run-level failures. Only `Config` and `Input` abort a run; per-candidate
/// failures never reach this type.
#[derive(Debug, thiserror::Error)]
pub enum HunterError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to read {}: {source}", .path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("dispatcher has already been started")]
    AlreadyStarted,
}

impl HunterError {
    pub fn config(msg: impl Into<String>) -> Self {
        HunterError::Config(msg.into())
    }

    /// True for failures that must stop the run before any probe is sent.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            HunterError::Config(_) | HunterError::Input { .. } | HunterError::AlreadyStarted
        )
    }
}

/// A task handed to the limiter that never produced a value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("limiter shut down before the task was admitted")]
    Closed,

    #[error("task aborted before completing")]
    Aborted,
}
