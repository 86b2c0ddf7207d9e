//! Error types for brief-core

use thiserror::Error;

/// Result type alias for brief-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error type shared across the workspace
#[derive(Error, Debug)]
pub enum Error {
    /// Generic error message
    #[error("{0}")]
    Generic(String),

    /// A collaborator (LLM, data source, store) failed
    #[error("Collaborator failed: {0}")]
    CollaboratorFailed(String),

    /// Report synthesis failed
    #[error("Synthesis failed: {0}")]
    SynthesisFailed(String),
}
