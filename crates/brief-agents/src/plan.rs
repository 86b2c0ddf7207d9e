//! Execution plan types

use serde::{Deserialize, Serialize};

/// Role identifiers for the four worker categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    FilingResearcher,
    MarketData,
    Analyst,
    Auditor,
}

impl AgentRole {
    /// Role-id string used in plans and result maps
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FilingResearcher => "filing_researcher",
            Self::MarketData => "market_data",
            Self::Analyst => "analyst",
            Self::Auditor => "auditor",
        }
    }

    /// Parse a role-id; unknown ids yield `None` and are skipped by the
    /// executor rather than failing the plan
    pub fn parse(role_id: &str) -> Option<Self> {
        match role_id {
            "filing_researcher" => Some(Self::FilingResearcher),
            "market_data" => Some(Self::MarketData),
            "analyst" => Some(Self::Analyst),
            "auditor" => Some(Self::Auditor),
            _ => None,
        }
    }
}

/// One step of an execution plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanStep {
    /// Role-id of the worker to invoke
    pub agent: String,
    /// Natural-language task for that worker
    pub task: String,
    /// Role-ids whose outputs must be present before this step runs
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// A dependency-ordered task graph over the worker roles
///
/// The executor makes a single forward pass in listed order, so steps
/// must already respect dependency order: a step listed before one of
/// its dependencies is skipped, not retried.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Plan {
    pub steps: Vec<PlanStep>,
}

impl Plan {
    /// Step for a given role, if present
    pub fn step_for(&self, role: AgentRole) -> Option<&PlanStep> {
        self.steps.iter().find(|s| s.agent == role.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [
            AgentRole::FilingResearcher,
            AgentRole::MarketData,
            AgentRole::Analyst,
            AgentRole::Auditor,
        ] {
            assert_eq!(AgentRole::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn test_unknown_role_is_none() {
        assert_eq!(AgentRole::parse("portfolio_manager"), None);
    }

    #[test]
    fn test_plan_deserializes_without_dependencies() {
        let plan: Plan = serde_json::from_str(
            r#"{"steps": [{"agent": "market_data", "task": "Fetch current market data"}]}"#,
        )
        .expect("parse plan");
        assert!(plan.steps[0].dependencies.is_empty());
    }
}
