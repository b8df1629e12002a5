use std::io;

use thiserror::Error;

/// Errors that can occur while configuring or driving an experiment.
#[derive(Debug, Error)]
pub enum BanditError {
    #[error("arm index {arm} is out of range for {num_arms} arms")]
    OutOfRange { arm: usize, num_arms: usize },
    #[error("unknown value estimator {0:?} (expected known, last, or avg)")]
    UnknownValueEstimator(String),
    #[error("unknown baseline {0:?} (expected zero, value, trcov, trcov_grad, or naive_grad)")]
    UnknownBaseline(String),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
    #[error("failed to write rewards: {0}")]
    Io(#[from] io::Error),
}
