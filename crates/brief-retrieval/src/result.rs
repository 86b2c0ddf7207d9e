//! Retrieval result entity
//!
//! Results from different backends are represented uniformly from
//! ingestion time, so consumers never type-sniff backend shapes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which retrieval leg produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultSource {
    /// Embedding-similarity search
    Dense,
    /// Lexical-frequency (BM25) search
    Sparse,
    /// Found by both legs, scores fused
    Hybrid,
}

/// One retrieved passage
///
/// Immutable except for `score` and `source`, which are overwritten in
/// place during fusion and re-ranking. Identity is content equality; two
/// results with an identical leading-content prefix are duplicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub content: String,
    pub metadata: HashMap<String, serde_json::Value>,
    pub score: f64,
    pub source: ResultSource,
}

impl RetrievalResult {
    pub fn new(
        content: impl Into<String>,
        metadata: HashMap<String, serde_json::Value>,
        score: f64,
        source: ResultSource,
    ) -> Self {
        Self {
            content: content.into(),
            metadata,
            score,
            source,
        }
    }

    /// Leading-content key used for deduplication (first `n` chars)
    pub fn content_prefix(&self, n: usize) -> String {
        self.content.chars().take(n).collect()
    }
}
