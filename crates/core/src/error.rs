use crate::validation::rules::Violation;

/// The existence oracle could not answer a query.
///
/// This is an infrastructure failure and is never reported as a field
/// violation.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("Lookup store unavailable: {0}")]
    Unavailable(String),

    #[error("Lookup query failed: {0}")]
    Query(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Existence lookup failed: {0}")]
    Oracle(#[from] OracleError),

    #[error("Validation failed with {} violation(s)", .0.len())]
    Rejected(Vec<Violation>),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl CoreError {
    /// True for failures of the surrounding infrastructure rather than of
    /// the submitted data.
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, CoreError::Oracle(_))
    }
}
