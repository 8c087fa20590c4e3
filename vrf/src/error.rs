use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VrfError {
    #[error("verification failed: {0}")]
    VerificationFailed(String),

    #[error("provider not available: {0}")]
    Unavailable(String),

    #[error("commit-reveal: {0}")]
    CommitReveal(String),

    #[error("randomness request rejected: {0}")]
    RequestRejected(String),
}
