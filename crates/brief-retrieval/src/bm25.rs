//! Sparse retrieval leg: BM25 over whitespace tokens
//!
//! Okapi BM25 with the usual k1 = 1.5, b = 0.75. Tokenization is plain
//! whitespace splitting, matching how the corpus is queried.

use crate::store::Document;
use std::collections::HashMap;

const K1: f64 = 1.5;
const B: f64 = 0.75;

/// In-memory BM25 index over a loaded corpus
pub struct Bm25Index {
    documents: Vec<Document>,
    doc_tokens: Vec<Vec<String>>,
    doc_freq: HashMap<String, usize>,
    avg_doc_len: f64,
}

impl Bm25Index {
    /// Build an index; returns `None` for an empty corpus
    pub fn new(documents: Vec<Document>) -> Option<Self> {
        if documents.is_empty() {
            return None;
        }

        let doc_tokens: Vec<Vec<String>> = documents
            .iter()
            .map(|doc| doc.content.split_whitespace().map(str::to_string).collect())
            .collect();

        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        for tokens in &doc_tokens {
            let mut seen: Vec<&str> = Vec::new();
            for token in tokens {
                if !seen.contains(&token.as_str()) {
                    seen.push(token);
                    *doc_freq.entry(token.clone()).or_default() += 1;
                }
            }
        }

        let total_len: usize = doc_tokens.iter().map(Vec::len).sum();
        let avg_doc_len = total_len as f64 / doc_tokens.len() as f64;

        Some(Self {
            documents,
            doc_tokens,
            doc_freq,
            avg_doc_len,
        })
    }

    /// Number of indexed documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn idf(&self, term: &str) -> f64 {
        let n = self.documents.len() as f64;
        let df = self.doc_freq.get(term).copied().unwrap_or(0) as f64;
        ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
    }

    /// BM25 score of every document against the query tokens
    pub fn scores(&self, query_tokens: &[&str]) -> Vec<f64> {
        self.doc_tokens
            .iter()
            .map(|tokens| {
                let doc_len = tokens.len() as f64;
                query_tokens
                    .iter()
                    .map(|term| {
                        let tf = tokens.iter().filter(|t| t.as_str() == *term).count() as f64;
                        if tf == 0.0 {
                            return 0.0;
                        }
                        let norm = K1 * (1.0 - B + B * doc_len / self.avg_doc_len);
                        self.idf(term) * tf * (K1 + 1.0) / (tf + norm)
                    })
                    .sum()
            })
            .collect()
    }

    /// Top `k` documents by descending BM25 score for a query
    pub fn top_k(&self, query: &str, k: usize) -> Vec<&Document> {
        let query_tokens: Vec<&str> = query.split_whitespace().collect();
        let scores = self.scores(&query_tokens);

        let mut ranked: Vec<(usize, f64)> = scores.into_iter().enumerate().collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        ranked
            .into_iter()
            .take(k)
            .map(|(idx, _)| &self.documents[idx])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<Document> {
        vec![
            Document::new("revenue grew twelve percent on data center demand"),
            Document::new("supply chain risk concentrated in a single foundry partner"),
            Document::new("the board declared a quarterly dividend"),
        ]
    }

    #[test]
    fn test_empty_corpus_has_no_index() {
        assert!(Bm25Index::new(Vec::new()).is_none());
    }

    #[test]
    fn test_matching_terms_rank_first() {
        let index = Bm25Index::new(corpus()).expect("non-empty corpus");
        let top = index.top_k("supply chain risk", 1);
        assert!(top[0].content.contains("supply chain"));
    }

    #[test]
    fn test_top_k_bound() {
        let index = Bm25Index::new(corpus()).expect("non-empty corpus");
        assert_eq!(index.top_k("revenue", 2).len(), 2);
        assert_eq!(index.top_k("revenue", 10).len(), 3);
    }

    #[test]
    fn test_unmatched_query_scores_zero() {
        let index = Bm25Index::new(corpus()).expect("non-empty corpus");
        let scores = index.scores(&["unrelated"]);
        assert!(scores.iter().all(|s| *s == 0.0));
    }
}
