//! Error types for extraction

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// Page URL could not be parsed
    #[error("Invalid page URL: {0}")]
    InvalidUrl(String),

    /// Nothing to extract from
    #[error("Document is empty")]
    EmptyDocument,
}
