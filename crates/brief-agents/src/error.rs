//! Error types for agent operations

use thiserror::Error;

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Agent-specific errors
#[derive(Debug, Error)]
pub enum AgentError {
    /// Yahoo Finance API error
    #[error("Yahoo Finance error: {0}")]
    YahooFinance(String),

    /// Market data unavailable for the requested ticker
    #[error("Market data unavailable for {ticker}: {reason}")]
    DataUnavailable { ticker: String, reason: String },

    /// Retrieval pipeline error
    #[error("Retrieval error: {0}")]
    Retrieval(#[from] brief_retrieval::RetrievalError),

    /// Report synthesis error
    #[error("Synthesis error: {0}")]
    Synthesis(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Convert AgentError to brief_core::Error
impl From<AgentError> for brief_core::Error {
    fn from(err: AgentError) -> Self {
        brief_core::Error::CollaboratorFailed(err.to_string())
    }
}
