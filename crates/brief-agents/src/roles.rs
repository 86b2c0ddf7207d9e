//! Worker role trait seams
//!
//! The executor dispatches through these traits so each role can be
//! replaced with a stub in tests, and so the concrete agents stay
//! swappable (a different filing corpus, a different market feed).

use crate::error::Result;
use crate::researcher::FilingFindings;
use crate::snapshot::MarketSnapshot;
use crate::auditor::VerificationResult;
use async_trait::async_trait;
use brief_core::{Citation, CitationTracker};

/// Filing research: retrieval-backed evidence gathering
#[async_trait]
pub trait FilingResearch: Send + Sync {
    async fn run(&self, task: &str, ticker: &str) -> Result<FilingFindings>;
}

/// Market snapshot fetch for one ticker
#[async_trait]
pub trait MarketData: Send + Sync {
    async fn fetch(&self, ticker: &str) -> Result<MarketSnapshot>;
}

/// Synthesis of gathered outputs into the markdown brief
///
/// Either upstream output may be absent (its step never ran); the
/// synthesizer must produce placeholder sections, not fail. Citations are
/// recorded on the tracker passed down the call chain.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(
        &self,
        findings: Option<&FilingFindings>,
        market: Option<&MarketSnapshot>,
        ticker: &str,
        tracker: &mut CitationTracker,
    ) -> Result<String>;
}

/// Verification of the synthesized report
pub trait Verifier: Send + Sync {
    fn verify(
        &self,
        report: &str,
        citations: &[Citation],
        market: Option<&MarketSnapshot>,
    ) -> VerificationResult;
}
