//! Worker roles and plan execution for equibrief
//!
//! The four worker roles (filing researcher, market data, analyst,
//! auditor) sit behind trait seams so the executor can be tested with
//! stubs. The planner turns a natural-language goal into a dependency-
//! ordered task graph; the executor runs it in a single forward pass,
//! routing each step's output into a shared result map keyed by role.

pub mod analyst;
pub mod auditor;
pub mod error;
pub mod executor;
pub mod format;
pub mod plan;
pub mod planner;
pub mod researcher;
pub mod roles;
pub mod snapshot;
pub mod yahoo;

pub use analyst::AnalystAgent;
pub use auditor::{AuditorAgent, CitationCheck, ClaimCheck, NumericCheck, VerificationResult};
pub use error::{AgentError, Result};
pub use executor::{ExecutionResults, PlanExecutor, StepOutput};
pub use plan::{AgentRole, Plan, PlanStep};
pub use planner::Planner;
pub use researcher::{FilingFindings, FilingResearcherAgent, Finding};
pub use roles::{FilingResearch, MarketData, Synthesizer, Verifier};
pub use snapshot::{MarketSnapshot, SnapshotValidation};
pub use yahoo::YahooMarketAgent;
