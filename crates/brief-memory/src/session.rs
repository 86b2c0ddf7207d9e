//! Ephemeral per-conversation memory

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One conversation turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: String,
    pub message: String,
    pub metadata: HashMap<String, serde_json::Value>,
    pub timestamp: DateTime<Utc>,
}

/// In-process memory scoped to one conversation
///
/// Holds the turn history, intermediate plans and a retrieval cache so
/// repeated questions in a session do not re-run the pipeline.
#[derive(Debug, Default)]
pub struct SessionMemory {
    turns: Vec<ConversationTurn>,
    plans: Vec<serde_json::Value>,
    retrieval_cache: HashMap<String, Vec<String>>,
}

impl SessionMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_turn(&mut self, role: impl Into<String>, message: impl Into<String>) {
        self.add_turn_with_metadata(role, message, HashMap::new());
    }

    pub fn add_turn_with_metadata(
        &mut self,
        role: impl Into<String>,
        message: impl Into<String>,
        metadata: HashMap<String, serde_json::Value>,
    ) {
        self.turns.push(ConversationTurn {
            role: role.into(),
            message: message.into(),
            metadata,
            timestamp: Utc::now(),
        });
    }

    pub fn save_plan(&mut self, plan: serde_json::Value) {
        self.plans.push(plan);
    }

    pub fn plans(&self) -> &[serde_json::Value] {
        &self.plans
    }

    pub fn cache_retrieval(&mut self, query: impl Into<String>, results: Vec<String>) {
        self.retrieval_cache.insert(query.into(), results);
    }

    pub fn cached_retrieval(&self, query: &str) -> Option<&[String]> {
        self.retrieval_cache.get(query).map(Vec::as_slice)
    }

    /// Last `n` turns, oldest first
    pub fn context_window(&self, n: usize) -> &[ConversationTurn] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }

    pub fn turn_count(&self) -> usize {
        self.turns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_window_returns_last_n() {
        let mut session = SessionMemory::new();
        for i in 0..10 {
            session.add_turn("user", format!("Message {i}"));
        }

        let window = session.context_window(5);
        assert_eq!(window.len(), 5);
        assert_eq!(window[0].message, "Message 5");
        assert_eq!(window[4].message, "Message 9");
    }

    #[test]
    fn test_context_window_shorter_history() {
        let mut session = SessionMemory::new();
        session.add_turn("user", "hello");
        assert_eq!(session.context_window(5).len(), 1);
    }

    #[test]
    fn test_retrieval_cache_round_trip() {
        let mut session = SessionMemory::new();
        session.cache_retrieval("risks", vec!["supply chain".to_string()]);

        assert_eq!(
            session.cached_retrieval("risks"),
            Some(&["supply chain".to_string()][..])
        );
        assert!(session.cached_retrieval("revenue").is_none());
    }

    #[test]
    fn test_plans_accumulate() {
        let mut session = SessionMemory::new();
        session.save_plan(serde_json::json!({"steps": []}));
        session.save_plan(serde_json::json!({"steps": [1]}));
        assert_eq!(session.plans().len(), 2);
    }
}
