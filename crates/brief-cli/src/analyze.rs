//! `analyze` command

use crate::tracking::TrackingProvider;
use anyhow::Context;
use async_trait::async_trait;
use brief_agents::{
    AnalystAgent, AuditorAgent, FilingResearcherAgent, MarketData, PlanExecutor, Planner,
    YahooMarketAgent, format,
};
use brief_llm::{LlmProvider, OpenAiProvider};
use brief_memory::GlobalMemory;
use brief_retrieval::{
    CrossEncoderReranker, HybridRetriever, PairScorer, QueryDecomposer, RetrievalPipeline,
};
use brief_utils::CostTracker;
use chrono::Datelike;
use comfy_table::Table;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::info;

const MODEL: &str = "gpt-4o";
const GLOBAL_MEMORY_PATH: &str = "global_memory.db";
const SUMMARY_CHARS: usize = 500;

/// Lexical (query, passage) scorer standing in for a learned cross-encoder
///
/// Scores by the fraction of query terms present in the passage.
struct OverlapScorer;

#[async_trait]
impl PairScorer for OverlapScorer {
    async fn score(&self, query: &str, passages: &[&str]) -> brief_retrieval::Result<Vec<f64>> {
        let query_terms: HashSet<String> =
            query.to_lowercase().split_whitespace().map(str::to_string).collect();

        Ok(passages
            .iter()
            .map(|passage| {
                if query_terms.is_empty() {
                    return 0.0;
                }
                let passage = passage.to_lowercase();
                let passage_terms: HashSet<&str> = passage.split_whitespace().collect();
                let overlap = query_terms
                    .iter()
                    .filter(|t| passage_terms.contains(t.as_str()))
                    .count();
                overlap as f64 / query_terms.len() as f64
            })
            .collect())
    }
}

pub async fn run(ticker: &str, user_id: &str, simple: bool) -> anyhow::Result<()> {
    println!("Analyzing {ticker}...\n");

    if simple {
        return run_simple(ticker).await;
    }
    run_full(ticker, user_id).await
}

/// Metrics-only report straight from the market snapshot
async fn run_simple(ticker: &str) -> anyhow::Result<()> {
    let agent = YahooMarketAgent::new();
    let snapshot = agent
        .fetch(ticker)
        .await
        .with_context(|| format!("fetching market data for {ticker}"))?;

    let range = match (snapshot.week_52_low, snapshot.week_52_high) {
        (Some(low), Some(high)) => format!("${low:.2} - ${high:.2}"),
        _ => "N/A".to_string(),
    };

    println!(
        "# Market Analysis: {ticker}\n\n\
         ## Current Market Metrics\n\n\
         | Metric | Value |\n\
         |--------|-------|\n\
         | **Current Price** | {} |\n\
         | **Market Cap** | {} |\n\
         | **Shares Outstanding** | {} |\n\
         | **52-Week Range** | {} |\n\
         | **P/E Ratio** | {} |\n\
         | **Beta** | {} |\n\n\
         *Source: Yahoo Finance, {}*\n",
        format::price(snapshot.current_price),
        format::large_amount(snapshot.market_cap),
        format::count(snapshot.shares_outstanding),
        range,
        format::ratio(snapshot.pe_ratio),
        format::ratio(snapshot.beta),
        snapshot.timestamp.to_rfc3339(),
    );

    Ok(())
}

/// Full multi-agent workflow: plan, execute, audit, persist
async fn run_full(ticker: &str, user_id: &str) -> anyhow::Result<()> {
    if std::env::var("OPENAI_API_KEY").is_err() {
        anyhow::bail!(
            "OPENAI_API_KEY not found. Set it in .env or export OPENAI_API_KEY='your-key-here'"
        );
    }

    let tracker = Arc::new(Mutex::new(CostTracker::new()));
    let provider: Arc<dyn LlmProvider> = Arc::new(TrackingProvider::new(
        Arc::new(OpenAiProvider::from_env().context("configuring the OpenAI provider")?),
        tracker.clone(),
    ));

    // Filing corpus is empty until 10-Ks are indexed; the researcher then
    // reports no retrievable evidence and the analyst renders the
    // corresponding placeholders.
    let pipeline = Arc::new(RetrievalPipeline::new(
        QueryDecomposer::new(provider.clone(), MODEL),
        HybridRetriever::new(None, Vec::new()),
        CrossEncoderReranker::new(Box::new(|| Ok(Arc::new(OverlapScorer) as Arc<dyn PairScorer>))),
    ));

    let years = research_years(chrono::Utc::now().year());

    let executor = PlanExecutor::new(
        Arc::new(FilingResearcherAgent::new(pipeline, years)),
        Arc::new(YahooMarketAgent::new()),
        Arc::new(AnalystAgent::new()),
        Arc::new(AuditorAgent::new()),
    );

    info!(ticker, user_id, "Creating execution plan");
    let planner = Planner::new(provider, MODEL);
    let plan = planner.create_plan(&format!("Analyze {ticker}")).await;

    info!(steps = plan.steps.len(), "Executing plan");
    let results = executor.execute(&plan, ticker).await?;

    let report = results.report().unwrap_or("No report generated");
    println!("{}\n{report}\n{}", "=".repeat(80), "=".repeat(80));

    if let Some(verification) = results.verification() {
        println!(
            "\nAudit confidence: {:.1}%",
            verification.overall_confidence * 100.0
        );
        let uncited = verification.citation_check.uncited_claims.len();
        if uncited > 0 {
            println!("Warning: {uncited} claims lack citations");
        }
    }

    tracker
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .track_api_call("yfinance", 0.0);

    let memory = GlobalMemory::connect(GLOBAL_MEMORY_PATH)
        .await
        .context("opening global memory")?;
    let summary: String = report.chars().take(SUMMARY_CHARS).collect();
    memory
        .save_analysis(ticker, &summary, &serde_json::json!({}), Vec::new())
        .await
        .context("saving analysis to global memory")?;

    print_cost_summary(&tracker);
    println!("\nAnalysis complete.");
    Ok(())
}

/// The five most recent completed fiscal years
fn research_years(current_year: i32) -> Vec<String> {
    (current_year - 5..current_year).map(|y| y.to_string()).collect()
}

fn print_cost_summary(tracker: &Arc<Mutex<CostTracker>>) {
    let summary = tracker
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .summary();

    let mut table = Table::new();
    table.set_header(vec!["Category", "Item", "Cost (USD)"]);
    for (model, cost) in &summary.llm_cost_breakdown {
        table.add_row(vec!["LLM".to_string(), model.clone(), format!("{cost:.4}")]);
    }
    for (api, cost) in &summary.api_cost_breakdown {
        table.add_row(vec!["API".to_string(), api.clone(), format!("{cost:.4}")]);
    }
    table.add_row(vec![
        "Total".to_string(),
        String::new(),
        format!("{:.4}", summary.total_cost_usd),
    ]);

    println!("\nCost summary\n{table}");
}
