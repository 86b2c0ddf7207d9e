//! Reciprocal Rank Fusion: score = Σ 1/(k + rank_i)
//!
//! Combines the dense and sparse ranked lists into a single fused ranking
//! without normalizing scores across the two retrieval methods. Results
//! are keyed by exact content equality; a passage found by both legs sums
//! both contributions and is tagged hybrid, a single-leg passage keeps
//! that leg's tag.

use crate::result::{ResultSource, RetrievalResult};
use crate::store::Document;
use std::collections::HashMap;

/// RRF smoothing constant (standard value, not configurable)
pub const RRF_K: f64 = 60.0;

/// Fuse the dense and sparse legs into one ranking
///
/// Ranks are 1-based per leg. The merged list is sorted by descending
/// fused score; truncation to the caller's `k` happens at the call site.
pub fn fuse(dense: &[Document], sparse: &[Document]) -> Vec<RetrievalResult> {
    let mut merged: HashMap<String, RetrievalResult> = HashMap::new();

    for (rank, doc) in dense.iter().enumerate() {
        let contribution = 1.0 / (RRF_K + (rank + 1) as f64);
        let entry = merged.entry(doc.content.clone()).or_insert_with(|| {
            RetrievalResult::new(doc.content.clone(), doc.metadata.clone(), 0.0, ResultSource::Dense)
        });
        entry.score += contribution;
    }

    for (rank, doc) in sparse.iter().enumerate() {
        let contribution = 1.0 / (RRF_K + (rank + 1) as f64);
        match merged.get_mut(&doc.content) {
            Some(entry) => {
                entry.score += contribution;
                entry.source = ResultSource::Hybrid;
            }
            None => {
                merged.insert(
                    doc.content.clone(),
                    RetrievalResult::new(
                        doc.content.clone(),
                        doc.metadata.clone(),
                        contribution,
                        ResultSource::Sparse,
                    ),
                );
            }
        }
    }

    let mut results: Vec<RetrievalResult> = merged.into_values().collect();
    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    results
}
