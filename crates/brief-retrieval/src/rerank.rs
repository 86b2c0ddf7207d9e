//! Cross-encoder re-ranking
//!
//! A cross-encoder scores each (query, passage) pair jointly, which is
//! far more accurate than independently-embedded similarity but too
//! expensive to run over the whole corpus. It therefore only reorders the
//! fused candidate set.
//!
//! The scoring model is expensive to initialize and stateless thereafter,
//! so it is loaded at most once per process, on first use, guarded so
//! exactly one initialization occurs even under concurrent first calls.

use crate::error::{Result, RetrievalError};
use crate::result::RetrievalResult;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::debug;

/// Pairwise (query, passage) relevance scorer
#[async_trait]
pub trait PairScorer: Send + Sync {
    /// Relevance score for each passage against the query, same order
    async fn score(&self, query: &str, passages: &[&str]) -> Result<Vec<f64>>;
}

type ScorerLoader = Box<dyn Fn() -> Result<Arc<dyn PairScorer>> + Send + Sync>;

/// Re-ranks a candidate set with a lazily-loaded cross-encoder
pub struct CrossEncoderReranker {
    model: OnceCell<Arc<dyn PairScorer>>,
    loader: ScorerLoader,
}

impl CrossEncoderReranker {
    /// Create a re-ranker that loads its model on first use
    pub fn new(loader: ScorerLoader) -> Self {
        Self {
            model: OnceCell::new(),
            loader,
        }
    }

    /// Create a re-ranker over an already-initialized model
    pub fn with_model(model: Arc<dyn PairScorer>) -> Self {
        Self {
            model: OnceCell::new_with(Some(model)),
            loader: Box::new(|| {
                Err(RetrievalError::Reranker("model already provided".to_string()))
            }),
        }
    }

    async fn model(&self) -> Result<&Arc<dyn PairScorer>> {
        self.model
            .get_or_try_init(|| async {
                debug!("Loading cross-encoder scoring model");
                (self.loader)()
            })
            .await
    }

    /// Re-score and reorder `results` by pairwise relevance to `query`
    ///
    /// Same length and membership; each result's `score` is overwritten.
    /// An empty input is returned unchanged without touching the model.
    pub async fn rerank(
        &self,
        query: &str,
        mut results: Vec<RetrievalResult>,
    ) -> Result<Vec<RetrievalResult>> {
        if results.is_empty() {
            return Ok(results);
        }

        let model = self.model().await?;
        let passages: Vec<&str> = results.iter().map(|r| r.content.as_str()).collect();
        let scores = model.score(query, &passages).await?;

        if scores.len() != results.len() {
            return Err(RetrievalError::Reranker(format!(
                "scorer returned {} scores for {} passages",
                scores.len(),
                results.len()
            )));
        }

        for (result, score) in results.iter_mut().zip(scores) {
            result.score = score;
        }
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::ResultSource;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scores a passage by its length
    struct LengthScorer;

    #[async_trait]
    impl PairScorer for LengthScorer {
        async fn score(&self, _query: &str, passages: &[&str]) -> Result<Vec<f64>> {
            Ok(passages.iter().map(|p| p.len() as f64).collect())
        }
    }

    fn results(contents: &[&str]) -> Vec<RetrievalResult> {
        contents
            .iter()
            .map(|c| RetrievalResult::new(*c, HashMap::new(), 0.0, ResultSource::Dense))
            .collect()
    }

    #[tokio::test]
    async fn test_rerank_overwrites_scores_and_sorts() {
        let reranker = CrossEncoderReranker::with_model(Arc::new(LengthScorer));
        let reranked = reranker
            .rerank("q", results(&["aa", "aaaa", "a"]))
            .await
            .expect("rerank succeeds");

        let contents: Vec<&str> = reranked.iter().map(|r| r.content.as_str()).collect();
        assert_eq!(contents, vec!["aaaa", "aa", "a"]);
        assert_eq!(reranked[0].score, 4.0);
    }

    #[tokio::test]
    async fn test_empty_input_does_not_load_model() {
        let reranker = CrossEncoderReranker::new(Box::new(|| {
            panic!("model must not load for empty input")
        }));
        let reranked = reranker.rerank("q", Vec::new()).await.expect("empty passthrough");
        assert!(reranked.is_empty());
    }

    #[tokio::test]
    async fn test_model_loads_exactly_once() {
        static LOADS: AtomicUsize = AtomicUsize::new(0);

        let reranker = Arc::new(CrossEncoderReranker::new(Box::new(|| {
            LOADS.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(LengthScorer) as Arc<dyn PairScorer>)
        })));

        let a = reranker.rerank("q", results(&["one"]));
        let b = reranker.rerank("q", results(&["two"]));
        let (a, b) = tokio::join!(a, b);
        a.expect("first call");
        b.expect("second call");

        assert_eq!(LOADS.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_score_count_mismatch_is_an_error() {
        struct ShortScorer;

        #[async_trait]
        impl PairScorer for ShortScorer {
            async fn score(&self, _query: &str, _passages: &[&str]) -> Result<Vec<f64>> {
                Ok(vec![1.0])
            }
        }

        let reranker = CrossEncoderReranker::with_model(Arc::new(ShortScorer));
        let err = reranker.rerank("q", results(&["a", "b"])).await;
        assert!(err.is_err());
    }
}
