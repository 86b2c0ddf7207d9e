//! Auditor: citation and numeric verification
//!
//! Verification is advisory: failed checks lower the confidence score but
//! never abort the pipeline.

use crate::roles::Verifier;
use crate::snapshot::MarketSnapshot;
use brief_core::Citation;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::debug;

/// Inline markdown citation link `[label](url)`
static CITATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid pattern"));

/// Patterns marking a sentence as a factual claim requiring citation
static FACTUAL_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\d+%",                                      // percentages
        r"\$[\d,]+",                                  // dollar amounts
        r"\d{4}",                                     // years
        r"(?i)increased|decreased|grew|declined",     // trend verbs
        r"(?i)risk|revenue|profit|loss|debt",         // financial nouns
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid pattern"))
    .collect()
});

/// Minimum sentence length considered a substantial claim
const CLAIM_MIN_CHARS: usize = 20;
/// Tolerated relative error between reported and recomputed market cap
const MARKET_CAP_TOLERANCE_PCT: f64 = 5.0;

/// Result of the citation coverage check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitationCheck {
    pub total_citations: usize,
    pub uncited_claims: Vec<String>,
    pub all_valid: bool,
}

/// Result of the market-cap recomputation check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericCheck {
    pub calculations_valid: bool,
    pub market_cap_error_pct: Option<f64>,
    pub calculated: Option<f64>,
    pub reported: Option<f64>,
}

/// Result of the unsupported-claim check
///
/// Claim extraction is not implemented; this always reports zero
/// unsupported claims and exists to keep the interface stable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClaimCheck {
    pub unsupported_claims: Vec<String>,
}

/// Combined verification output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    pub citation_check: CitationCheck,
    pub numeric_check: NumericCheck,
    pub claim_check: ClaimCheck,
    /// Fraction of the three checks that passed, in [0, 1]
    pub overall_confidence: f64,
}

/// Verifies citations and numeric accuracy of a synthesized report
#[derive(Debug, Default)]
pub struct AuditorAgent;

impl AuditorAgent {
    pub fn new() -> Self {
        Self
    }

    fn verify_citations(report: &str) -> CitationCheck {
        let total_citations = CITATION_RE.find_iter(report).count();

        let uncited_claims: Vec<String> = report
            .split('.')
            .map(str::trim)
            .filter(|sentence| sentence.len() > CLAIM_MIN_CHARS)
            .filter(|sentence| !CITATION_RE.is_match(sentence))
            .filter(|sentence| is_factual_claim(sentence))
            .map(str::to_string)
            .collect();

        CitationCheck {
            total_citations,
            all_valid: uncited_claims.is_empty(),
            uncited_claims,
        }
    }

    fn verify_numbers(market: Option<&MarketSnapshot>) -> NumericCheck {
        let price = market.and_then(|m| m.current_price);
        let shares = market.and_then(|m| m.shares_outstanding);
        let reported = market.and_then(|m| m.market_cap);

        let calculated = match (price, shares) {
            (Some(p), Some(s)) => Some(p * s),
            _ => None,
        };

        let (valid, error_pct) = match (calculated, reported) {
            (Some(calc), Some(rep)) if rep != 0.0 => {
                let error_pct = (calc - rep).abs() / rep * 100.0;
                (error_pct < MARKET_CAP_TOLERANCE_PCT, Some(error_pct))
            }
            _ => (false, None),
        };

        NumericCheck {
            calculations_valid: valid,
            market_cap_error_pct: error_pct,
            calculated,
            reported,
        }
    }
}

impl Verifier for AuditorAgent {
    fn verify(
        &self,
        report: &str,
        _citations: &[Citation],
        market: Option<&MarketSnapshot>,
    ) -> VerificationResult {
        let citation_check = Self::verify_citations(report);
        let numeric_check = Self::verify_numbers(market);
        let claim_check = ClaimCheck::default();

        let checks_passed = usize::from(citation_check.all_valid)
            + usize::from(numeric_check.calculations_valid)
            + usize::from(claim_check.unsupported_claims.is_empty());
        let overall_confidence = checks_passed as f64 / 3.0;

        debug!(
            uncited = citation_check.uncited_claims.len(),
            numeric_valid = numeric_check.calculations_valid,
            overall_confidence,
            "Verification completed"
        );

        VerificationResult {
            citation_check,
            numeric_check,
            claim_check,
            overall_confidence,
        }
    }
}

fn is_factual_claim(sentence: &str) -> bool {
    FACTUAL_RES.iter().any(|re| re.is_match(sentence))
}

#[cfg(test)]
mod tests {
    use super::*;
    use brief_core::Citation;

    fn snapshot(price: Option<f64>, shares: Option<f64>, cap: Option<f64>) -> MarketSnapshot {
        let citation = Citation::market_data("TEST", "https://example.com", "now");
        let mut snapshot = MarketSnapshot::empty("TEST", citation);
        snapshot.current_price = price;
        snapshot.shares_outstanding = shares;
        snapshot.market_cap = cap;
        snapshot
    }

    #[test]
    fn test_market_cap_within_tolerance() {
        let auditor = AuditorAgent::new();
        let market = snapshot(Some(100.0), Some(1_000_000.0), Some(100_000_000.0));
        let result = auditor.verify("", &[], Some(&market));
        assert!(result.numeric_check.calculations_valid);
    }

    #[test]
    fn test_market_cap_at_double_fails() {
        let auditor = AuditorAgent::new();
        let market = snapshot(Some(100.0), Some(1_000_000.0), Some(200_000_000.0));
        let result = auditor.verify("", &[], Some(&market));
        assert!(!result.numeric_check.calculations_valid);
        let error = result.numeric_check.market_cap_error_pct.expect("error computed");
        assert!((error - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_fields_invalidate_numbers() {
        let auditor = AuditorAgent::new();
        let market = snapshot(Some(100.0), None, Some(100_000_000.0));
        let result = auditor.verify("", &[], Some(&market));
        assert!(!result.numeric_check.calculations_valid);
        assert!(result.numeric_check.market_cap_error_pct.is_none());
    }

    #[test]
    fn test_uncited_factual_claim_flagged() {
        let auditor = AuditorAgent::new();
        let report = "Revenue increased by 25% over the prior year. The weather was pleasant.";
        let result = auditor.verify(report, &[], None);

        assert_eq!(result.citation_check.uncited_claims.len(), 1);
        assert!(result.citation_check.uncited_claims[0].contains("Revenue"));
        assert!(!result.citation_check.all_valid);
    }

    #[test]
    fn test_cited_claim_not_flagged() {
        let auditor = AuditorAgent::new();
        let report = "Revenue increased by 25% [NVDA 10-K 2023, Item 7](https://sec_gov/x)";
        let result = auditor.verify(report, &[], None);

        assert!(result.citation_check.uncited_claims.is_empty());
        assert_eq!(result.citation_check.total_citations, 1);
    }

    #[test]
    fn test_short_sentences_ignored() {
        let auditor = AuditorAgent::new();
        let result = auditor.verify("Revenue up 5%. Ok.", &[], None);
        assert!(result.citation_check.all_valid);
    }

    #[test]
    fn test_confidence_counts_passed_checks() {
        let auditor = AuditorAgent::new();
        // Citation check passes (no factual claims), numeric fails (no market),
        // claim check passes by construction.
        let result = auditor.verify("All quiet here", &[], None);
        assert!((result.overall_confidence - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_all_checks_passing_yield_full_confidence() {
        let auditor = AuditorAgent::new();
        let market = snapshot(Some(10.0), Some(100.0), Some(1000.0));
        let result = auditor.verify("Nothing factual", &[], Some(&market));
        assert!((result.overall_confidence - 1.0).abs() < 1e-9);
    }
}
