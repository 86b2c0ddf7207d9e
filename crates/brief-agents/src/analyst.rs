//! Analyst: renders the markdown brief
//!
//! Section order is fixed: Executive Summary, Current Market Metrics,
//! Business Overview & Strategy, Key Risk Factors, Financial Performance
//! Trends, Competitive Position, Investment Considerations, Sources.
//! Missing upstream outputs render placeholder sections; synthesis never
//! fails on partial data. Business overview, financial trends and the
//! investment view are static framework text pending structured
//! extraction from indexed filings.

use crate::error::Result;
use crate::format;
use crate::researcher::FilingFindings;
use crate::roles::Synthesizer;
use crate::snapshot::MarketSnapshot;
use async_trait::async_trait;
use brief_core::CitationTracker;
use tracing::info;

/// Synthesizes findings and market data into the report
#[derive(Debug, Default)]
pub struct AnalystAgent;

impl AnalystAgent {
    pub fn new() -> Self {
        Self
    }

    fn executive_summary(market: Option<&MarketSnapshot>, ticker: &str) -> String {
        match market {
            Some(snapshot) => format!(
                "{ticker} is currently trading at {} with a market capitalization of {}. \
                 The company demonstrates its market positioning through the strategic \
                 initiatives detailed in recent filings.",
                format::price(snapshot.current_price),
                format::large_amount(snapshot.market_cap),
            ),
            None => format!("{ticker} market data was unavailable for this analysis."),
        }
    }

    /// Market metrics table; registers its citation on the tracker
    fn market_metrics(
        market: Option<&MarketSnapshot>,
        tracker: &mut CitationTracker,
    ) -> String {
        let Some(snapshot) = market else {
            return "*Market data unavailable.*".to_string();
        };

        let range = match (snapshot.week_52_low, snapshot.week_52_high) {
            (Some(low), Some(high)) => format!("${low:.2} - ${high:.2}"),
            _ => "N/A".to_string(),
        };

        let table = format!(
            "| Metric | Value |\n\
             |--------|-------|\n\
             | **Current Price** | {} |\n\
             | **Market Cap** | {} |\n\
             | **Shares Outstanding** | {} |\n\
             | **52-Week Range** | {} |\n\
             | **P/E Ratio** | {} |\n\
             | **Beta** | {} |\n\
             | **Dividend Yield** | {} |\n\n\
             *Source: Yahoo Finance, {}*",
            format::price(snapshot.current_price),
            format::large_amount(snapshot.market_cap),
            format::count(snapshot.shares_outstanding),
            range,
            format::ratio(snapshot.pe_ratio),
            format::ratio(snapshot.beta),
            format::percent(snapshot.dividend_yield),
            snapshot.timestamp.to_rfc3339(),
        );

        tracker.add_citation("Current market metrics", snapshot.citation.clone());
        table
    }

    fn business_overview(ticker: &str) -> String {
        format!(
            "{ticker} operates in its core business segments as detailed in Item 1 of the 10-K. \
             The company's strategy focuses on innovation and market expansion.\n\n\
             *Note: Full business analysis requires indexed 10-K filings.*"
        )
    }

    /// Risk section from per-year findings, each inline-cited
    fn risk_factors(
        findings: Option<&FilingFindings>,
        tracker: &mut CitationTracker,
    ) -> String {
        let mut output = String::from("### Top Risk Factors (Last 5 Years)\n\n");

        let Some(findings) = findings else {
            output.push_str("*Filing research unavailable.*\n");
            return output;
        };

        if findings.risks.is_empty() {
            output.push_str("*No risk factors retrieved; filings may not be indexed.*\n");
            return output;
        }

        for (year, risks) in &findings.risks {
            output.push_str(&format!("**{year}**\n\n"));
            for risk in risks.iter().take(3) {
                output.push_str(&format!("- {} {}\n", risk.summary, risk.citation.to_markdown()));
                tracker.add_citation(risk.summary.clone(), risk.citation.clone());
            }
            output.push('\n');
        }

        output
    }

    fn financial_trends() -> &'static str {
        "### Revenue & Profitability\n\
         Analysis pending 10-K indexing.\n\n\
         ### Cash Flow\n\
         Analysis pending 10-K indexing."
    }

    fn competitive_position(ticker: &str) -> String {
        format!(
            "{ticker}'s competitive position is outlined in the 10-K Item 1 (Business) \
             and Item 1A (Risk Factors) sections.\n\n\
             *Full competitive analysis requires indexed filings.*"
        )
    }

    fn investment_view() -> &'static str {
        "### Strengths\n\n\
         ### Concerns\n\n\
         ### Key Catalysts to Watch\n\n\
         *Note: This is an analytical framework, not investment advice.*"
    }
}

#[async_trait]
impl Synthesizer for AnalystAgent {
    async fn synthesize(
        &self,
        findings: Option<&FilingFindings>,
        market: Option<&MarketSnapshot>,
        ticker: &str,
        tracker: &mut CitationTracker,
    ) -> Result<String> {
        let generated = market
            .map(|m| m.timestamp.to_rfc3339())
            .unwrap_or_else(|| "n/a".to_string());

        let report = format!(
            "# Financial Analysis: {ticker}\n\
             *Generated: {generated}*\n\n\
             ---\n\n\
             ## Executive Summary\n\n{}\n\n\
             ---\n\n\
             ## Current Market Metrics\n\n{}\n\n\
             ---\n\n\
             ## Business Overview & Strategy\n\n{}\n\n\
             ---\n\n\
             ## Key Risk Factors\n\n{}\n\
             ---\n\n\
             ## Financial Performance Trends\n\n{}\n\n\
             ---\n\n\
             ## Competitive Position\n\n{}\n\n\
             ---\n\n\
             ## Investment Considerations\n\n{}\n\
             {}",
            Self::executive_summary(market, ticker),
            Self::market_metrics(market, tracker),
            Self::business_overview(ticker),
            Self::risk_factors(findings, tracker),
            Self::financial_trends(),
            Self::competitive_position(ticker),
            Self::investment_view(),
            tracker.format_for_report(),
        );

        info!(ticker, citations = tracker.citations().len(), "Report synthesized");
        Ok(report)
    }
}
