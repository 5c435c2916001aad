use thiserror::Error;

/// Errors raised outside the scheduling path: configuration and parsing.
///
/// Scheduling itself never fails on malformed-but-plausible input; see
/// [`crate::ScheduleDiagnostic`] for how such input is reported.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("unknown job {0}")]
    UnknownJob(u64),
}
