//! Error types for the hit-rate simulator
//!
//! Configuration problems surface at construction time, trial problems at the
//! batch boundary. Nothing is retried.

use thiserror::Error;

/// Boxed cause of a failed trial
pub type TrialCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used across the crate
pub type SimResult<T> = Result<T, SimError>;

#[derive(Debug, Error)]
pub enum SimError {
    /// Rejected parameters, reported before any trial runs
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// Rejection sampling gave up (only with a max-attempts cap set)
    #[error(
        "no free impact position after {attempts} attempts ({placed} of {wanted} projectiles placed)"
    )]
    AttemptsExhausted {
        attempts: u64,
        placed: u32,
        wanted: u32,
    },

    /// A batch must run at least one trial
    #[error("batch requires at least one trial")]
    EmptyBatch,

    /// A trial returned an error; the whole batch is discarded
    #[error("trial {trial} failed")]
    TrialFailed {
        trial: usize,
        #[source]
        source: TrialCause,
    },

    /// A trial panicked; the whole batch is discarded
    #[error("trial {trial} panicked: {message}")]
    TrialPanicked { trial: usize, message: String },

    /// The batch was cancelled before every trial ran
    #[error("batch cancelled after {completed} of {requested} trials")]
    Cancelled { completed: usize, requested: usize },

    #[error("failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to encode report: {0}")]
    Report(#[from] serde_json::Error),
}

impl SimError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }
}
