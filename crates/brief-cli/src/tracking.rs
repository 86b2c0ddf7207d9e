//! Cost-tracking wrapper around an LLM provider

use async_trait::async_trait;
use brief_llm::{CompletionRequest, CompletionResponse, LlmProvider};
use brief_utils::CostTracker;
use std::sync::{Arc, Mutex, PoisonError};

/// Records token usage for every completion on a shared tracker
pub struct TrackingProvider {
    inner: Arc<dyn LlmProvider>,
    tracker: Arc<Mutex<CostTracker>>,
}

impl TrackingProvider {
    pub fn new(inner: Arc<dyn LlmProvider>, tracker: Arc<Mutex<CostTracker>>) -> Self {
        Self { inner, tracker }
    }
}

#[async_trait]
impl LlmProvider for TrackingProvider {
    async fn complete(&self, request: CompletionRequest) -> brief_llm::Result<CompletionResponse> {
        let model = request.model.clone();
        let response = self.inner.complete(request).await?;

        self.tracker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .track_llm_call(
                &model,
                response.usage.input_tokens as u64,
                response.usage.output_tokens as u64,
            );

        Ok(response)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brief_llm::TokenUsage;

    struct FixedProvider;

    #[async_trait]
    impl LlmProvider for FixedProvider {
        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> brief_llm::Result<CompletionResponse> {
            Ok(CompletionResponse {
                content: "ok".to_string(),
                usage: TokenUsage {
                    input_tokens: 1000,
                    output_tokens: 500,
                },
            })
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[tokio::test]
    async fn test_usage_recorded_per_model() {
        let tracker = Arc::new(Mutex::new(CostTracker::new()));
        let provider = TrackingProvider::new(Arc::new(FixedProvider), tracker.clone());

        let request = CompletionRequest::builder("gpt-4o").prompt("hi").build();
        provider.complete(request).await.expect("complete");

        let summary = tracker.lock().expect("lock").summary();
        assert!(summary.llm_cost_breakdown.contains_key("gpt-4o"));
        assert!(summary.total_cost_usd > 0.0);
    }
}
