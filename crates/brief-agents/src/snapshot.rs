//! Market snapshot entity

use brief_core::Citation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point-in-time trading metrics for one ticker
///
/// Every numeric field is optional: the upstream feed may omit any of
/// them, and consumers render a placeholder for the gaps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub ticker: String,
    pub timestamp: DateTime<Utc>,
    pub current_price: Option<f64>,
    pub previous_close: Option<f64>,
    pub open: Option<f64>,
    pub market_cap: Option<f64>,
    pub shares_outstanding: Option<f64>,
    pub week_52_high: Option<f64>,
    pub week_52_low: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub beta: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub volume: Option<u64>,
    pub avg_volume: Option<f64>,
    pub currency: String,
    pub citation: Citation,
}

/// Data-integrity summary for a snapshot
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SnapshotValidation {
    pub has_price: bool,
    pub has_market_cap: bool,
    pub has_shares: bool,
    pub market_cap_matches: bool,
}

impl MarketSnapshot {
    /// Empty snapshot carrying only identity and provenance
    pub fn empty(ticker: impl Into<String>, citation: Citation) -> Self {
        Self {
            ticker: ticker.into(),
            timestamp: Utc::now(),
            current_price: None,
            previous_close: None,
            open: None,
            market_cap: None,
            shares_outstanding: None,
            week_52_high: None,
            week_52_low: None,
            pe_ratio: None,
            beta: None,
            dividend_yield: None,
            volume: None,
            avg_volume: None,
            currency: "USD".to_string(),
            citation,
        }
    }

    /// Validate data integrity, including market cap ≈ price × shares
    pub fn validate(&self) -> SnapshotValidation {
        SnapshotValidation {
            has_price: self.current_price.is_some(),
            has_market_cap: self.market_cap.is_some(),
            has_shares: self.shares_outstanding.is_some(),
            market_cap_matches: self.market_cap_consistent(),
        }
    }

    /// Whether reported market cap is within 5% of price × shares
    ///
    /// False when any of the three fields is absent.
    pub fn market_cap_consistent(&self) -> bool {
        match (self.current_price, self.shares_outstanding, self.market_cap) {
            (Some(price), Some(shares), Some(reported)) if reported != 0.0 => {
                let calculated = price * shares;
                (calculated - reported).abs() / reported < 0.05
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(price: Option<f64>, shares: Option<f64>, cap: Option<f64>) -> MarketSnapshot {
        let citation = Citation::market_data("TEST", "https://example.com", "now");
        let mut snapshot = MarketSnapshot::empty("TEST", citation);
        snapshot.current_price = price;
        snapshot.shares_outstanding = shares;
        snapshot.market_cap = cap;
        snapshot
    }

    #[test]
    fn test_consistent_market_cap() {
        let s = snapshot(Some(100.0), Some(1_000_000.0), Some(100_000_000.0));
        assert!(s.market_cap_consistent());
        assert!(s.validate().market_cap_matches);
    }

    #[test]
    fn test_inconsistent_market_cap() {
        let s = snapshot(Some(100.0), Some(1_000_000.0), Some(200_000_000.0));
        assert!(!s.market_cap_consistent());
    }

    #[test]
    fn test_missing_fields_fail_validation() {
        let s = snapshot(Some(100.0), None, Some(100_000_000.0));
        let validation = s.validate();
        assert!(validation.has_price);
        assert!(!validation.has_shares);
        assert!(!validation.market_cap_matches);
    }
}
