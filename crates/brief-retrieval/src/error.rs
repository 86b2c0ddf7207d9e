//! Error types for retrieval operations

use thiserror::Error;

/// Result type alias for retrieval operations
pub type Result<T> = std::result::Result<T, RetrievalError>;

/// Retrieval-specific errors
///
/// Decomposition failure is deliberately absent: it is a degraded-quality
/// event handled inside [`crate::QueryDecomposer`], never an error.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// Dense-leg vector store failed
    #[error("Vector store error: {0}")]
    VectorStore(String),

    /// Cross-encoder scoring model failed
    #[error("Re-ranker error: {0}")]
    Reranker(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Convert RetrievalError to brief_core::Error
impl From<RetrievalError> for brief_core::Error {
    fn from(err: RetrievalError) -> Self {
        brief_core::Error::CollaboratorFailed(err.to_string())
    }
}
