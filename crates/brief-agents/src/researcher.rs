//! Filing researcher
//!
//! Wraps the retrieval pipeline: task-level evidence via the full
//! multi-stage retrieve, risk factors via the cheaper cross-year
//! comparison. Every finding carries a filing citation built from the
//! passage metadata.

use crate::error::Result;
use crate::roles::FilingResearch;
use async_trait::async_trait;
use brief_core::Citation;
use brief_retrieval::{RetrievalPipeline, RetrievalResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// One piece of cited evidence from a filing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub summary: String,
    pub citation: Citation,
}

/// Structured findings for one research task
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilingFindings {
    /// Evidence retrieved for the task itself
    pub evidence: Vec<Finding>,
    /// Risk findings per fiscal year, oldest first
    pub risks: BTreeMap<String, Vec<Finding>>,
    /// Strategy note; structured extraction is not implemented, so this
    /// stays a pointer into the filings
    pub strategy: String,
}

/// Retrieval-backed researcher over the filing corpus
pub struct FilingResearcherAgent {
    pipeline: Arc<RetrievalPipeline>,
    years: Vec<String>,
}

impl FilingResearcherAgent {
    /// Create a researcher comparing risks across the given fiscal years
    pub fn new(pipeline: Arc<RetrievalPipeline>, years: Vec<String>) -> Self {
        Self { pipeline, years }
    }

    /// Risk factors for a ticker across the configured years
    pub async fn analyze_risks(&self, ticker: &str) -> Result<BTreeMap<String, Vec<Finding>>> {
        let query = format!("What are the key business risks for {ticker}?");
        let by_year = self.pipeline.compare_across_years(&query, &self.years).await?;

        let mut risks = BTreeMap::new();
        for (year, results) in by_year {
            let findings = results
                .iter()
                .map(|result| finding_from_result(result, ticker, Some(&year)))
                .collect();
            risks.insert(year, findings);
        }

        Ok(risks)
    }
}

#[async_trait]
impl FilingResearch for FilingResearcherAgent {
    async fn run(&self, task: &str, ticker: &str) -> Result<FilingFindings> {
        let results = self.pipeline.retrieve(task).await?;
        let evidence: Vec<Finding> = results
            .iter()
            .map(|result| finding_from_result(result, ticker, None))
            .collect();

        let risks = self.analyze_risks(ticker).await?;

        info!(
            ticker,
            evidence = evidence.len(),
            years = risks.len(),
            "Filing research completed"
        );

        Ok(FilingFindings {
            evidence,
            risks,
            strategy: format!("See {ticker} 10-K filings, Item 1 (Business), for strategy detail."),
        })
    }
}

/// Build a cited finding from a retrieved passage
///
/// Section and source URL come from the passage metadata when the corpus
/// was indexed with them; the year falls back to the metadata.
fn finding_from_result(result: &RetrievalResult, ticker: &str, year: Option<&str>) -> Finding {
    let meta_str = |key: &str| {
        result
            .metadata
            .get(key)
            .and_then(|v| v.as_str())
            .map(str::to_string)
    };

    let year = year
        .map(str::to_string)
        .or_else(|| meta_str("year"))
        .unwrap_or_else(|| "n/a".to_string());

    Finding {
        summary: result.content.clone(),
        citation: Citation::filing(
            ticker,
            year,
            meta_str("section"),
            meta_str("source_url").unwrap_or_default(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brief_llm::{CompletionRequest, CompletionResponse, LlmProvider, TokenUsage};
    use brief_retrieval::{
        CrossEncoderReranker, Document, HybridRetriever, PairScorer, QueryDecomposer,
    };
    use std::collections::HashMap;

    struct NonJsonProvider;

    #[async_trait]
    impl LlmProvider for NonJsonProvider {
        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> brief_llm::Result<CompletionResponse> {
            Ok(CompletionResponse {
                content: "no decomposition".to_string(),
                usage: TokenUsage::default(),
            })
        }

        fn name(&self) -> &str {
            "non-json"
        }
    }

    struct UnitScorer;

    #[async_trait]
    impl PairScorer for UnitScorer {
        async fn score(
            &self,
            _query: &str,
            passages: &[&str],
        ) -> brief_retrieval::Result<Vec<f64>> {
            Ok(vec![1.0; passages.len()])
        }
    }

    fn sparse_pipeline() -> Arc<RetrievalPipeline> {
        let documents = vec![
            Document::new("supply chain risk concentrated in one foundry")
                .with_metadata("section", serde_json::json!("Item 1A"))
                .with_metadata("source_url", serde_json::json!("https://sec.gov/x")),
            Document::new("revenue grew on data center demand"),
        ];

        Arc::new(RetrievalPipeline::new(
            QueryDecomposer::new(Arc::new(NonJsonProvider), "test-model"),
            HybridRetriever::new(None, documents),
            CrossEncoderReranker::with_model(Arc::new(UnitScorer)),
        ))
    }

    #[tokio::test]
    async fn test_run_produces_cited_evidence() {
        let agent = FilingResearcherAgent::new(sparse_pipeline(), vec!["2023".to_string()]);
        let findings = agent.run("supply chain risk", "NVDA").await.expect("run");

        assert!(!findings.evidence.is_empty());
        let cited = &findings.evidence[0];
        assert_eq!(cited.citation.ticker, "NVDA");
        assert!(findings.risks.contains_key("2023"));
    }

    #[tokio::test]
    async fn test_risks_carry_year_from_comparison() {
        let agent = FilingResearcherAgent::new(
            sparse_pipeline(),
            vec!["2022".to_string(), "2023".to_string()],
        );
        let risks = agent.analyze_risks("NVDA").await.expect("risks");

        assert_eq!(risks.len(), 2);
        for (year, findings) in &risks {
            for finding in findings {
                assert_eq!(finding.citation.year.as_deref(), Some(year.as_str()));
            }
        }
    }

    #[test]
    fn test_finding_uses_metadata_section() {
        let mut metadata = HashMap::new();
        metadata.insert("section".to_string(), serde_json::json!("Item 7"));
        metadata.insert("year".to_string(), serde_json::json!("2021"));
        let result = RetrievalResult::new(
            "margin compression",
            metadata,
            1.0,
            brief_retrieval::ResultSource::Sparse,
        );

        let finding = finding_from_result(&result, "NVDA", None);
        assert_eq!(finding.citation.section.as_deref(), Some("Item 7"));
        assert_eq!(finding.citation.year.as_deref(), Some("2021"));
    }
}
