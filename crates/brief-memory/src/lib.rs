//! Memory layers for equibrief
//!
//! Global memory persists across sessions in sqlite: user preferences
//! with versioning and a TTL, an append-only analysis history, and an
//! in-process vector collection for similar-analysis lookup. Session
//! memory is ephemeral per conversation.

pub mod error;
pub mod global;
pub mod session;
pub mod vectors;

pub use error::{MemoryError, Result};
pub use global::{AnalysisRecord, GlobalMemory, UserPreferences};
pub use session::{ConversationTurn, SessionMemory};
pub use vectors::{ScoredSummary, VectorCollection};
