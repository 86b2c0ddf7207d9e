//! API and LLM cost accounting
//!
//! Per-call accumulation keyed by model or API name. Prices are
//! per-token USD; models without a pricing entry accrue zero cost but
//! still appear in the breakdown.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Per-token USD rates as (input, output) pairs
fn pricing(model: &str) -> (f64, f64) {
    match model {
        "gpt-4o" => (0.005 / 1000.0, 0.015 / 1000.0),
        "embedding-ada-002" => (0.0001 / 1000.0, 0.0),
        _ => (0.0, 0.0),
    }
}

/// Aggregated cost report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostSummary {
    pub total_cost_usd: f64,
    pub llm_cost_breakdown: BTreeMap<String, f64>,
    pub api_cost_breakdown: BTreeMap<String, f64>,
    /// "LLM" when model calls dominate the total, otherwise "API"
    pub dominant_cost: String,
}

/// Accumulates LLM and external API costs for one run
#[derive(Debug, Clone, Default)]
pub struct CostTracker {
    llm_costs: BTreeMap<String, f64>,
    api_costs: BTreeMap<String, f64>,
}

impl CostTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one model call
    pub fn track_llm_call(&mut self, model: &str, input_tokens: u64, output_tokens: u64) {
        let (input_rate, output_rate) = pricing(model);
        let cost = input_tokens as f64 * input_rate + output_tokens as f64 * output_rate;
        *self.llm_costs.entry(model.to_string()).or_insert(0.0) += cost;
        debug!(model, input_tokens, output_tokens, cost, "Tracked LLM call");
    }

    /// Record one external API call with an explicit cost
    pub fn track_api_call(&mut self, api_name: &str, cost: f64) {
        *self.api_costs.entry(api_name.to_string()).or_insert(0.0) += cost;
    }

    pub fn summary(&self) -> CostSummary {
        let total_llm: f64 = self.llm_costs.values().sum();
        let total_api: f64 = self.api_costs.values().sum();

        CostSummary {
            total_cost_usd: total_llm + total_api,
            llm_cost_breakdown: self.llm_costs.clone(),
            api_cost_breakdown: self.api_costs.clone(),
            dominant_cost: if total_llm > total_api { "LLM" } else { "API" }.to_string(),
        }
    }
}
