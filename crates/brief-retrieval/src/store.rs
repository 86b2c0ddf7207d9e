//! Corpus documents and the dense-leg collaborator trait

use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One passage of the research corpus (a chunk of a filing)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Document {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// Vector-similarity search collaborator (the dense retrieval leg)
///
/// Implemented by surrounding code over whatever embedding store is in
/// use. Results are ranked best-first.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Return up to `k` documents ranked by similarity to `query`
    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<Document>>;
}
