use std::time::Duration;
use thiserror::Error;

/// Failures of the async façade. The engine itself never fails.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Prediction task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),

    #[error("Prediction timed out after {0:?}")]
    TimedOut(Duration),
}

pub type Result<T> = std::result::Result<T, ServiceError>;
