//! Remote classifier errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Classifier returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to decode classifier response: {0}")]
    Decode(String),

    #[error("Classifier unavailable: {0}")]
    Unavailable(String),
}

impl ClassifierError {
    /// Whether retrying the same request later could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ClassifierError::Network(_) | ClassifierError::Unavailable(_) => true,
            ClassifierError::Status { status, .. } => *status >= 500 || *status == 429,
            ClassifierError::Decode(_) => false,
        }
    }
}
