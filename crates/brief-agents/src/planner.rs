//! Execution planning
//!
//! Turns a natural-language goal into a task graph over the four worker
//! roles. Plan generation is best-effort: any model failure or malformed
//! JSON yields the fixed fallback plan, which is the documented degraded
//! path rather than an error state.

use crate::plan::{AgentRole, Plan, PlanStep};
use brief_llm::{CompletionRequest, LlmProvider, strip_code_fences};
use std::sync::Arc;
use tracing::{debug, warn};

const SYSTEM_PROMPT: &str = "You plan multi-agent financial research. Break the goal into \
sequential steps, identify which agents are needed, and produce a DAG of task dependencies. \
Steps must be listed so every step appears after all of its dependencies.";

/// Plans the multi-agent workflow via the LLM collaborator
pub struct Planner {
    provider: Arc<dyn LlmProvider>,
    model: String,
}

impl Planner {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Generate an execution plan for a goal
    ///
    /// Falls back to [`Planner::fallback_plan`] when generation fails or
    /// the response is not valid plan JSON.
    pub async fn create_plan(&self, goal: &str) -> Plan {
        let request = CompletionRequest::builder(&self.model)
            .system(SYSTEM_PROMPT)
            .prompt(plan_prompt(goal))
            .temperature(0.2)
            .max_tokens(600)
            .build();

        let response = match self.provider.complete(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Plan generation call failed, using fallback plan: {e}");
                return Self::fallback_plan(goal);
            }
        };

        let cleaned = strip_code_fences(&response.content);
        match serde_json::from_str::<Plan>(&cleaned) {
            Ok(plan) if !plan.steps.is_empty() => {
                debug!("Planned {} steps", plan.steps.len());
                plan
            }
            Ok(_) => {
                warn!("Planner returned an empty plan, using fallback plan");
                Self::fallback_plan(goal)
            }
            Err(e) => {
                warn!("Could not parse plan JSON, using fallback plan: {e}");
                Self::fallback_plan(goal)
            }
        }
    }

    /// The fixed fallback plan
    ///
    /// Research and market data run independently; the analyst depends on
    /// both; the auditor depends on the analyst. Deterministic on every
    /// call.
    pub fn fallback_plan(goal: &str) -> Plan {
        Plan {
            steps: vec![
                PlanStep {
                    agent: AgentRole::FilingResearcher.as_str().to_string(),
                    task: format!("Analyze 10-K filings for {goal}"),
                    dependencies: vec![],
                },
                PlanStep {
                    agent: AgentRole::MarketData.as_str().to_string(),
                    task: "Fetch current market data".to_string(),
                    dependencies: vec![],
                },
                PlanStep {
                    agent: AgentRole::Analyst.as_str().to_string(),
                    task: "Synthesize analysis".to_string(),
                    dependencies: vec![
                        AgentRole::FilingResearcher.as_str().to_string(),
                        AgentRole::MarketData.as_str().to_string(),
                    ],
                },
                PlanStep {
                    agent: AgentRole::Auditor.as_str().to_string(),
                    task: "Verify analysis".to_string(),
                    dependencies: vec![AgentRole::Analyst.as_str().to_string()],
                },
            ],
        }
    }
}

fn plan_prompt(goal: &str) -> String {
    format!(
        r#"Goal: {goal}

Create an execution plan:
1. What information is needed from 10-K filings?
2. What market data is required?
3. What comparisons or calculations are needed?
4. In what order should agents execute?

Return ONLY valid JSON (no markdown, no code blocks):
{{
    "steps": [
        {{"agent": "filing_researcher", "task": "...", "dependencies": []}},
        {{"agent": "market_data", "task": "...", "dependencies": []}},
        {{"agent": "analyst", "task": "...", "dependencies": ["filing_researcher", "market_data"]}},
        {{"agent": "auditor", "task": "...", "dependencies": ["analyst"]}}
    ]
}}"#
    )
}
