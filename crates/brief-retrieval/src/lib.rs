//! Hybrid retrieval core for equibrief
//!
//! Multi-stage retrieval over a filing corpus:
//!
//! 1. Query decomposition (LLM, with silent fallback)
//! 2. Hybrid search: dense (vector similarity) + sparse (BM25) legs,
//!    merged with Reciprocal Rank Fusion
//! 3. Cross-encoder re-ranking (lazily loaded scoring model)
//! 4. Prefix deduplication and top-K selection
//!
//! The dense leg and the scoring model are collaborator traits
//! ([`VectorStore`], [`PairScorer`]) implemented by surrounding code; the
//! sparse leg and fusion are owned by this crate.

pub mod bm25;
pub mod decompose;
pub mod error;
pub mod fusion;
pub mod pipeline;
pub mod rerank;
pub mod result;
pub mod store;

pub use bm25::Bm25Index;
pub use decompose::QueryDecomposer;
pub use error::{Result, RetrievalError};
pub use fusion::{RRF_K, fuse};
pub use pipeline::{HybridRetriever, RetrievalPipeline};
pub use rerank::{CrossEncoderReranker, PairScorer};
pub use result::{ResultSource, RetrievalResult};
pub use store::{Document, VectorStore};
