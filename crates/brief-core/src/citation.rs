//! Citations and claim-to-source tracking
//!
//! Every factual claim in a generated brief should be traceable to a
//! filing section or a market-data snapshot. `Citation` is the immutable
//! record of one source; `CitationTracker` accumulates the claim → source
//! associations for one report and renders the deduplicated source list.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kind of source backing a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    /// Annual-report filing (10-K)
    Filing,
    /// Point-in-time market snapshot
    MarketData,
}

/// A single source reference, immutable once constructed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub source_type: SourceType,
    pub ticker: String,
    pub year: Option<String>,
    pub section: Option<String>,
    pub page_range: Option<(u32, u32)>,
    pub url: String,
    pub timestamp: Option<String>,
}

impl Citation {
    /// Create a filing citation
    pub fn filing(
        ticker: impl Into<String>,
        year: impl Into<String>,
        section: Option<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            source_type: SourceType::Filing,
            ticker: ticker.into(),
            year: Some(year.into()),
            section,
            page_range: None,
            url: url.into(),
            timestamp: None,
        }
    }

    /// Create a market-data citation
    pub fn market_data(
        ticker: impl Into<String>,
        url: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            source_type: SourceType::MarketData,
            ticker: ticker.into(),
            year: None,
            section: None,
            page_range: None,
            url: url.into(),
            timestamp: Some(timestamp.into()),
        }
    }

    /// Render as a markdown link; label differs by source type
    pub fn to_markdown(&self) -> String {
        match self.source_type {
            SourceType::Filing => {
                let year = self.year.as_deref().unwrap_or("n/a");
                let section = self.section.as_deref().unwrap_or("General");
                format!("[{} 10-K {}, {}]({})", self.ticker, year, section, self.url)
            }
            SourceType::MarketData => {
                let timestamp = self.timestamp.as_deref().unwrap_or("n/a");
                format!("[Market Data: {} at {}]({})", self.ticker, timestamp, self.url)
            }
        }
    }
}

/// Tracks claim → source associations for one report
///
/// Grows monotonically within a report's lifetime; entries are never
/// mutated or removed. Passed by reference through the report-building
/// call chain and handed to the renderer at the end.
#[derive(Debug, Default)]
pub struct CitationTracker {
    citations: Vec<Citation>,
    claim_to_citation: HashMap<String, Vec<Citation>>,
}

impl CitationTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Link a claim to its source
    pub fn add_citation(&mut self, claim: impl Into<String>, citation: Citation) {
        self.claim_to_citation
            .entry(claim.into())
            .or_default()
            .push(citation.clone());
        self.citations.push(citation);
    }

    /// Check that every recorded claim has at least one source
    pub fn validate_citations(&self) -> HashMap<String, bool> {
        self.claim_to_citation
            .iter()
            .map(|(claim, citations)| (claim.clone(), !citations.is_empty()))
            .collect()
    }

    /// All citations in insertion order
    pub fn citations(&self) -> &[Citation] {
        &self.citations
    }

    /// Whether any citation has been recorded
    pub fn is_empty(&self) -> bool {
        self.citations.is_empty()
    }

    /// Render the Sources section for a markdown report
    ///
    /// Duplicate citations (by rendered text) appear exactly once, in
    /// first-seen order. Empty trackers render nothing.
    pub fn format_for_report(&self) -> String {
        if self.citations.is_empty() {
            return String::new();
        }

        let mut output = String::from("\n\n## Sources\n\n");
        let mut seen = std::collections::HashSet::new();
        let mut index = 0;

        for citation in &self.citations {
            let rendered = citation.to_markdown();
            if seen.insert(rendered.clone()) {
                index += 1;
                output.push_str(&format!("{index}. {rendered}\n"));
            }
        }

        output
    }
}
