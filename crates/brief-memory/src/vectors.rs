//! In-process vector collection
//!
//! Holds the embeddings of saved analysis summaries and answers
//! nearest-neighbor queries by cosine similarity. Rebuilt from sqlite on
//! startup; not persisted on its own.

use serde::{Deserialize, Serialize};

/// A stored summary with its embedding
#[derive(Debug, Clone)]
struct Entry {
    ticker: String,
    summary: String,
    embedding: Vec<f64>,
}

/// A similarity-search hit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredSummary {
    pub ticker: String,
    pub summary: String,
    pub similarity: f64,
}

/// Embedding collection over analysis summaries
#[derive(Debug, Default)]
pub struct VectorCollection {
    entries: Vec<Entry>,
}

impl VectorCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, ticker: impl Into<String>, summary: impl Into<String>, embedding: Vec<f64>) {
        self.entries.push(Entry {
            ticker: ticker.into(),
            summary: summary.into(),
            embedding,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Top-n entries by cosine similarity to the query embedding
    ///
    /// Entries whose embedding length differs from the query are skipped.
    pub fn similar(&self, embedding: &[f64], n: usize) -> Vec<ScoredSummary> {
        let mut scored: Vec<ScoredSummary> = self
            .entries
            .iter()
            .filter(|entry| entry.embedding.len() == embedding.len())
            .map(|entry| ScoredSummary {
                ticker: entry.ticker.clone(),
                summary: entry.summary.clone(),
                similarity: cosine(&entry.embedding, embedding),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(n);
        scored
    }
}

fn cosine(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_similar_ranks_by_cosine() {
        let mut collection = VectorCollection::new();
        collection.add("NVDA", "gpu maker", vec![1.0, 0.0]);
        collection.add("AMD", "cpu and gpu maker", vec![0.7, 0.7]);
        collection.add("KO", "beverage company", vec![0.0, 1.0]);

        let hits = collection.similar(&[1.0, 0.0], 2);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].ticker, "NVDA");
        assert!((hits[0].similarity - 1.0).abs() < 1e-9);
        assert_eq!(hits[1].ticker, "AMD");
    }

    #[test]
    fn test_mismatched_dimensions_skipped() {
        let mut collection = VectorCollection::new();
        collection.add("NVDA", "gpu maker", vec![1.0, 0.0, 0.0]);
        let hits = collection.similar(&[1.0, 0.0], 3);
        assert!(hits.is_empty());
    }

    #[test]
    fn test_zero_vector_scores_zero() {
        let mut collection = VectorCollection::new();
        collection.add("NVDA", "gpu maker", vec![0.0, 0.0]);
        let hits = collection.similar(&[1.0, 0.0], 1);
        assert_eq!(hits[0].similarity, 0.0);
    }
}
