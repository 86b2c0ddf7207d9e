//! Query decomposition
//!
//! A broad analysis question retrieves better as 2-3 focused sub-queries.
//! Decomposition failure is a degraded-quality event, never a fatal one:
//! any model failure, non-JSON output, or empty array silently falls back
//! to the original query.

use brief_llm::{CompletionRequest, LlmProvider, strip_code_fences};
use std::sync::Arc;
use tracing::{debug, warn};

const SYSTEM_PROMPT: &str = "You are a query decomposition expert. Break complex queries into \
2-3 focused sub-queries. Return ONLY a valid JSON array of strings.";

const MAX_SUB_QUERIES: usize = 3;

/// Expands one query into focused sub-queries via the LLM collaborator
pub struct QueryDecomposer {
    provider: Arc<dyn LlmProvider>,
    model: String,
}

impl QueryDecomposer {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Decompose `query` into 1..=3 sub-queries
    ///
    /// Falls back to `[query]` on any failure; the fallback is silent to
    /// the caller.
    pub async fn decompose(&self, query: &str) -> Vec<String> {
        let request = CompletionRequest::builder(&self.model)
            .system(SYSTEM_PROMPT)
            .prompt(format!(
                "Break this query into 2-3 focused sub-queries:\n\nQuery: {query}\n\n\
                 Return as JSON array: [\"sub-query 1\", \"sub-query 2\"]"
            ))
            .temperature(0.3)
            .max_tokens(200)
            .build();

        let fallback = vec![query.to_string()];

        let response = match self.provider.complete(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Query decomposition call failed, using original query: {e}");
                return fallback;
            }
        };

        let cleaned = strip_code_fences(&response.content);
        match serde_json::from_str::<Vec<String>>(&cleaned) {
            Ok(sub_queries) if !sub_queries.is_empty() => {
                debug!("Decomposed into {} sub-queries", sub_queries.len());
                sub_queries.into_iter().take(MAX_SUB_QUERIES).collect()
            }
            Ok(_) => {
                warn!("Query decomposition returned an empty array, using original query");
                fallback
            }
            Err(e) => {
                warn!("Query decomposition returned non-JSON output, using original query: {e}");
                fallback
            }
        }
    }
}
