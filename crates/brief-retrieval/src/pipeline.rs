//! Retrieval pipeline orchestration
//!
//! `retrieve` runs the full multi-stage pipeline: decomposition → hybrid
//! search → re-rank → dedup → top-K. `compare_across_years` is the
//! cheaper, targeted comparison primitive: one hybrid search per year, no
//! decomposition, no re-rank.

use crate::bm25::Bm25Index;
use crate::decompose::QueryDecomposer;
use crate::error::Result;
use crate::fusion::fuse;
use crate::rerank::CrossEncoderReranker;
use crate::result::RetrievalResult;
use crate::store::{Document, VectorStore};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

/// Candidate pool per sub-query before re-ranking
const HYBRID_K: usize = 20;
/// Results kept per sub-query after re-ranking
const PER_SUBQUERY_K: usize = 5;
/// Overall cap on pipeline output
const FINAL_K: usize = 10;
/// Pool per year for cross-period comparison
const COMPARE_K: usize = 5;
/// Leading-content length used as the dedup key
const DEDUP_PREFIX_CHARS: usize = 200;

/// Fused dense + sparse candidate search for one query
pub struct HybridRetriever {
    vector_store: Option<Arc<dyn VectorStore>>,
    bm25: Option<Bm25Index>,
}

impl HybridRetriever {
    /// Build a retriever over an optional vector store and corpus
    ///
    /// An empty corpus leaves the sparse leg unconfigured; a missing
    /// vector store leaves the dense leg unconfigured. Either leg may be
    /// absent and simply contributes nothing.
    pub fn new(vector_store: Option<Arc<dyn VectorStore>>, documents: Vec<Document>) -> Self {
        Self {
            vector_store,
            bm25: Bm25Index::new(documents),
        }
    }

    /// Up to `k` fused candidates for `query`, best first
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<RetrievalResult>> {
        let dense = match &self.vector_store {
            Some(store) => store.similarity_search(query, k).await?,
            None => Vec::new(),
        };

        let sparse: Vec<Document> = match &self.bm25 {
            Some(index) => index.top_k(query, k).into_iter().cloned().collect(),
            None => Vec::new(),
        };

        debug!(
            dense = dense.len(),
            sparse = sparse.len(),
            "Hybrid legs retrieved"
        );

        let mut fused = fuse(&dense, &sparse);
        fused.truncate(k);
        Ok(fused)
    }
}

/// Multi-stage retrieval pipeline
pub struct RetrievalPipeline {
    decomposer: QueryDecomposer,
    retriever: HybridRetriever,
    reranker: CrossEncoderReranker,
}

impl RetrievalPipeline {
    pub fn new(
        decomposer: QueryDecomposer,
        retriever: HybridRetriever,
        reranker: CrossEncoderReranker,
    ) -> Self {
        Self {
            decomposer,
            retriever,
            reranker,
        }
    }

    /// Main retrieval entry point; at most 10 results
    ///
    /// Per sub-query: hybrid search over a pool of 20, re-rank only when
    /// non-empty, keep the top 5. The two-level top-K (5 per sub-query,
    /// 10 overall) bounds cost while preserving diversity across the
    /// decomposed aspects of the query.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<RetrievalResult>> {
        let sub_queries = self.decomposer.decompose(query).await;

        let mut all_results = Vec::new();
        for sub_query in &sub_queries {
            let candidates = self.retriever.search(sub_query, HYBRID_K).await?;

            let ranked = if candidates.is_empty() {
                candidates
            } else {
                self.reranker.rerank(sub_query, candidates).await?
            };

            all_results.extend(ranked.into_iter().take(PER_SUBQUERY_K));
        }

        let mut unique = deduplicate(all_results);
        unique.truncate(FINAL_K);

        info!(
            query,
            sub_queries = sub_queries.len(),
            results = unique.len(),
            top_scores = ?unique.iter().take(3).map(|r| r.score).collect::<Vec<_>>(),
            "Retrieval completed"
        );

        Ok(unique)
    }

    /// Retrieve the same topic independently across fiscal years
    ///
    /// Each year gets a qualified query and a shallow hybrid search (≤5
    /// results); no decomposition or re-ranking.
    pub async fn compare_across_years(
        &self,
        query: &str,
        years: &[String],
    ) -> Result<HashMap<String, Vec<RetrievalResult>>> {
        let mut results_by_year = HashMap::new();

        for year in years {
            let qualified = format!("{query} (year: {year})");
            let results = self.retriever.search(&qualified, COMPARE_K).await?;
            results_by_year.insert(year.clone(), results);
        }

        Ok(results_by_year)
    }

    /// Direct access to the hybrid retriever
    pub fn retriever(&self) -> &HybridRetriever {
        &self.retriever
    }
}

/// Remove near-duplicate passages, keeping the first-seen occurrence
///
/// Duplicates are detected by the first 200 characters of content.
fn deduplicate(results: Vec<RetrievalResult>) -> Vec<RetrievalResult> {
    let mut seen: HashSet<String> = HashSet::new();
    results
        .into_iter()
        .filter(|result| seen.insert(result.content_prefix(DEDUP_PREFIX_CHARS)))
        .collect()
}
