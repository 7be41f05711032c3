use thiserror::Error;

use factlens_core_types::ElementRole;

/// Session-level failures. Every one of them ends up as
/// `{ success: false, error }` at the request boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FactCheckError {
    #[error("a fact-check is already in progress")]
    ConcurrentSessionRejected,

    #[error("no text provided to fact-check")]
    InvalidInput,

    #[error("authentication required, please sign in")]
    MissingCredentials,

    #[error("helper surface unavailable: {0}")]
    HelperSurfaceUnavailable(String),

    #[error("could not find the {role} element on the agent page")]
    ElementNotFound { role: ElementRole },

    #[error("fact-check timed out after {0}ms")]
    Timeout(u64),

    #[error("agent error: {0}")]
    Agent(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl FactCheckError {
    /// Worth retrying the same request later.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FactCheckError::ConcurrentSessionRejected
                | FactCheckError::Timeout(_)
                | FactCheckError::HelperSurfaceUnavailable(_)
        )
    }
}

impl From<StoreError> for FactCheckError {
    fn from(err: StoreError) -> Self {
        FactCheckError::Storage(err.to_string())
    }
}

/// Failures reported by a [`crate::HelperHost`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("failed to open helper surface: {0}")]
    Open(String),
    #[error("unknown helper surface {0}")]
    UnknownSurface(String),
    #[error("driver injection failed: {0}")]
    Injection(String),
    #[error("command delivery failed: {0}")]
    Command(String),
    #[error("close failed: {0}")]
    Close(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store io: {0}")]
    Io(String),
    #[error("store contents are not valid json: {0}")]
    Corrupt(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Corrupt(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_failures_are_not_retryable() {
        assert!(FactCheckError::Timeout(60_000).is_retryable());
        assert!(FactCheckError::ConcurrentSessionRejected.is_retryable());
        assert!(!FactCheckError::ElementNotFound {
            role: ElementRole::Input
        }
        .is_retryable());
        assert!(!FactCheckError::MissingCredentials.is_retryable());
    }
}
