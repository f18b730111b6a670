// dqt-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DqtError {
    // --- DOMAIN ERRORS (rules, recurrences, aggregation) ---
    #[error(transparent)]
    Domain(#[from] DomainError),

    // --- INFRASTRUCTURE ERRORS (IO, parsing) ---
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),
}

impl DqtError {
    /// The domain error underneath, if any. Lets callers branch on the taxonomy.
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            Self::Domain(e) => Some(e),
            Self::Infrastructure(_) => None,
        }
    }
}
