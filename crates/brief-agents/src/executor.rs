//! Plan execution
//!
//! Runs a plan in a single forward pass over its listed steps. A step
//! executes only when every dependency already has an output in the
//! result map, so a step listed before one of its dependencies is
//! skipped, never retried. Unknown role-ids are skipped as well. Failed
//! data-gathering steps leave a gap in the result map and downstream
//! steps proceed on what is present.

use crate::auditor::VerificationResult;
use crate::plan::{AgentRole, Plan};
use crate::researcher::FilingFindings;
use crate::roles::{FilingResearch, MarketData, Synthesizer, Verifier};
use crate::snapshot::MarketSnapshot;
use brief_core::CitationTracker;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Output of one executed step, keyed by role-id in the result map
#[derive(Debug, Clone)]
pub enum StepOutput {
    Findings(FilingFindings),
    Market(MarketSnapshot),
    Report(String),
    Verification(VerificationResult),
}

/// Result map plus the citations accumulated during execution
#[derive(Debug, Default)]
pub struct ExecutionResults {
    outputs: HashMap<String, StepOutput>,
    citations: CitationTracker,
}

impl ExecutionResults {
    pub fn contains(&self, role: AgentRole) -> bool {
        self.outputs.contains_key(role.as_str())
    }

    pub fn findings(&self) -> Option<&FilingFindings> {
        match self.outputs.get(AgentRole::FilingResearcher.as_str()) {
            Some(StepOutput::Findings(findings)) => Some(findings),
            _ => None,
        }
    }

    pub fn market(&self) -> Option<&MarketSnapshot> {
        match self.outputs.get(AgentRole::MarketData.as_str()) {
            Some(StepOutput::Market(snapshot)) => Some(snapshot),
            _ => None,
        }
    }

    pub fn report(&self) -> Option<&str> {
        match self.outputs.get(AgentRole::Analyst.as_str()) {
            Some(StepOutput::Report(report)) => Some(report),
            _ => None,
        }
    }

    pub fn verification(&self) -> Option<&VerificationResult> {
        match self.outputs.get(AgentRole::Auditor.as_str()) {
            Some(StepOutput::Verification(result)) => Some(result),
            _ => None,
        }
    }

    pub fn citations(&self) -> &CitationTracker {
        &self.citations
    }
}

/// Dispatches plan steps to the concrete worker roles
pub struct PlanExecutor {
    research: Arc<dyn FilingResearch>,
    market: Arc<dyn MarketData>,
    synthesizer: Arc<dyn Synthesizer>,
    verifier: Arc<dyn Verifier>,
}

impl PlanExecutor {
    pub fn new(
        research: Arc<dyn FilingResearch>,
        market: Arc<dyn MarketData>,
        synthesizer: Arc<dyn Synthesizer>,
        verifier: Arc<dyn Verifier>,
    ) -> Self {
        Self {
            research,
            market,
            synthesizer,
            verifier,
        }
    }

    /// Execute a plan for one ticker
    ///
    /// Research and market-data failures are logged and leave their slot
    /// empty; synthesis errors propagate.
    pub async fn execute(
        &self,
        plan: &Plan,
        ticker: &str,
    ) -> crate::error::Result<ExecutionResults> {
        let mut results = ExecutionResults::default();

        for step in &plan.steps {
            let Some(role) = AgentRole::parse(&step.agent) else {
                warn!(agent = %step.agent, "Skipping step for unknown role");
                continue;
            };

            let ready = step
                .dependencies
                .iter()
                .all(|dep| results.outputs.contains_key(dep.as_str()));
            if !ready {
                warn!(agent = %step.agent, "Skipping step with unmet dependencies");
                continue;
            }

            info!(agent = %step.agent, task = %step.task, "Executing step");
            match role {
                AgentRole::FilingResearcher => {
                    match self.research.run(&step.task, ticker).await {
                        Ok(findings) => {
                            results
                                .outputs
                                .insert(step.agent.clone(), StepOutput::Findings(findings));
                        }
                        Err(e) => warn!("Filing research failed, continuing without it: {e}"),
                    }
                }
                AgentRole::MarketData => match self.market.fetch(ticker).await {
                    Ok(snapshot) => {
                        results
                            .outputs
                            .insert(step.agent.clone(), StepOutput::Market(snapshot));
                    }
                    Err(e) => warn!("Market data fetch failed, continuing without it: {e}"),
                },
                AgentRole::Analyst => {
                    // Field-split so the upstream reads and the citation
                    // tracker borrow disjoint parts of the result map.
                    let ExecutionResults { outputs, citations } = &mut results;
                    let findings = match outputs.get(AgentRole::FilingResearcher.as_str()) {
                        Some(StepOutput::Findings(findings)) => Some(findings),
                        _ => None,
                    };
                    let market = match outputs.get(AgentRole::MarketData.as_str()) {
                        Some(StepOutput::Market(snapshot)) => Some(snapshot),
                        _ => None,
                    };
                    let report = self
                        .synthesizer
                        .synthesize(findings, market, ticker, citations)
                        .await?;
                    outputs.insert(step.agent.clone(), StepOutput::Report(report));
                }
                AgentRole::Auditor => {
                    let report = results.report().unwrap_or_default();
                    let verification = self.verifier.verify(
                        report,
                        results.citations.citations(),
                        results.market(),
                    );
                    results
                        .outputs
                        .insert(step.agent.clone(), StepOutput::Verification(verification));
                }
            }
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auditor::AuditorAgent;
    use crate::error::{AgentError, Result};
    use crate::plan::PlanStep;
    use async_trait::async_trait;
    use brief_core::Citation;

    struct StubResearch;

    #[async_trait]
    impl FilingResearch for StubResearch {
        async fn run(&self, _task: &str, _ticker: &str) -> Result<FilingFindings> {
            Ok(FilingFindings::default())
        }
    }

    struct StubMarket;

    #[async_trait]
    impl MarketData for StubMarket {
        async fn fetch(&self, ticker: &str) -> Result<MarketSnapshot> {
            let citation = Citation::market_data(ticker, "https://example.com", "now");
            Ok(MarketSnapshot::empty(ticker, citation))
        }
    }

    struct FailingMarket;

    #[async_trait]
    impl MarketData for FailingMarket {
        async fn fetch(&self, ticker: &str) -> Result<MarketSnapshot> {
            Err(AgentError::DataUnavailable {
                ticker: ticker.to_string(),
                reason: "feed offline".to_string(),
            })
        }
    }

    /// Records whether market data was present when synthesis ran
    struct RecordingSynthesizer;

    #[async_trait]
    impl Synthesizer for RecordingSynthesizer {
        async fn synthesize(
            &self,
            _findings: Option<&FilingFindings>,
            market: Option<&MarketSnapshot>,
            ticker: &str,
            _tracker: &mut CitationTracker,
        ) -> Result<String> {
            Ok(format!(
                "report for {ticker}, market: {}",
                market.is_some()
            ))
        }
    }

    fn executor(market: Arc<dyn MarketData>) -> PlanExecutor {
        PlanExecutor::new(
            Arc::new(StubResearch),
            market,
            Arc::new(RecordingSynthesizer),
            Arc::new(AuditorAgent::new()),
        )
    }

    fn step(agent: &str, deps: &[&str]) -> PlanStep {
        PlanStep {
            agent: agent.to_string(),
            task: "task".to_string(),
            dependencies: deps.iter().map(|d| (*d).to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_dependency_ordered_plan_runs_all_steps() {
        let plan = Plan {
            steps: vec![
                step("filing_researcher", &[]),
                step("market_data", &[]),
                step("analyst", &["filing_researcher", "market_data"]),
                step("auditor", &["analyst"]),
            ],
        };
        let results = executor(Arc::new(StubMarket))
            .execute(&plan, "NVDA")
            .await
            .expect("execute");

        assert!(results.findings().is_some());
        assert!(results.market().is_some());
        assert_eq!(results.report(), Some("report for NVDA, market: true"));
        assert!(results.verification().is_some());
    }

    /// Reads both upstream outputs and records a citation on the tracker
    struct CitingSynthesizer;

    #[async_trait]
    impl Synthesizer for CitingSynthesizer {
        async fn synthesize(
            &self,
            findings: Option<&FilingFindings>,
            market: Option<&MarketSnapshot>,
            ticker: &str,
            tracker: &mut CitationTracker,
        ) -> Result<String> {
            if let Some(snapshot) = market {
                tracker.add_citation("market metrics", snapshot.citation.clone());
            }
            Ok(format!(
                "{ticker}: findings {}, market {}",
                findings.is_some(),
                market.is_some()
            ))
        }
    }

    #[tokio::test]
    async fn test_synthesis_reads_upstreams_while_recording_citations() {
        let plan = Plan {
            steps: vec![
                step("filing_researcher", &[]),
                step("market_data", &[]),
                step("analyst", &["filing_researcher", "market_data"]),
            ],
        };
        let executor = PlanExecutor::new(
            Arc::new(StubResearch),
            Arc::new(StubMarket),
            Arc::new(CitingSynthesizer),
            Arc::new(AuditorAgent::new()),
        );
        let results = executor.execute(&plan, "NVDA").await.expect("execute");

        assert_eq!(
            results.report(),
            Some("NVDA: findings true, market true")
        );
        assert!(!results.citations().is_empty());
    }

    #[tokio::test]
    async fn test_step_before_its_dependency_never_runs() {
        let plan = Plan {
            steps: vec![
                step("analyst", &["market_data"]),
                step("market_data", &[]),
            ],
        };
        let results = executor(Arc::new(StubMarket))
            .execute(&plan, "NVDA")
            .await
            .expect("execute");

        assert!(results.market().is_some());
        assert!(results.report().is_none());
    }

    #[tokio::test]
    async fn test_unknown_role_skipped() {
        let plan = Plan {
            steps: vec![
                step("portfolio_manager", &[]),
                step("market_data", &[]),
            ],
        };
        let results = executor(Arc::new(StubMarket))
            .execute(&plan, "NVDA")
            .await
            .expect("execute");

        assert_eq!(results.outputs.len(), 1);
        assert!(results.market().is_some());
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_gap_and_synthesis_degrades() {
        let plan = Plan {
            steps: vec![
                step("market_data", &[]),
                step("analyst", &[]),
            ],
        };
        let results = executor(Arc::new(FailingMarket))
            .execute(&plan, "NVDA")
            .await
            .expect("execute");

        assert!(results.market().is_none());
        assert_eq!(results.report(), Some("report for NVDA, market: false"));
    }

    #[tokio::test]
    async fn test_auditor_without_report_verifies_empty_text() {
        let plan = Plan {
            steps: vec![step("auditor", &[])],
        };
        let results = executor(Arc::new(StubMarket))
            .execute(&plan, "NVDA")
            .await
            .expect("execute");

        let verification = results.verification().expect("verification present");
        assert_eq!(verification.citation_check.total_citations, 0);
        assert!(verification.citation_check.all_valid);
        assert!(!verification.numeric_check.calculations_valid);
    }
}
