use thiserror::Error;

/// Main error type for the TrafficTune system
#[derive(Error, Debug)]
pub enum TtError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Scoring error: {0}")]
    Score(#[from] ScoreError),

    #[error("Launch error: {0}")]
    Launch(#[from] LaunchError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result-store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store backend unavailable: {message}")]
    Unavailable { message: String },

    #[error("Stored sweep state is corrupt: {message}")]
    Corrupt { message: String },
}

/// Scorer errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoreError {
    #[error("cannot select a best result from an empty result set")]
    EmptyResults,

    #[error("sweep is complete but no sweep specification is stored")]
    MissingSpec,
}

/// Per-job launch errors. Never abort a dispatch batch.
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("failed to spawn worker for job {job_id}: {message}")]
    SpawnFailed { job_id: String, message: String },

    #[error("no worker command configured")]
    MissingCommand,
}

/// Result type alias for TrafficTune operations
pub type TtResult<T> = Result<T, TtError>;

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Macro for creating validation errors
#[macro_export]
macro_rules! validation_error {
    ($($arg:tt)*) => {
        $crate::TtError::Validation(format!($($arg)*))
    };
}

/// Macro for creating internal errors
#[macro_export]
macro_rules! internal_error {
    ($($arg:tt)*) => {
        $crate::TtError::Internal(format!($($arg)*))
    };
}

/// Macro for creating configuration errors
#[macro_export]
macro_rules! config_error {
    ($($arg:tt)*) => {
        $crate::TtError::Config(format!($($arg)*))
    };
}
