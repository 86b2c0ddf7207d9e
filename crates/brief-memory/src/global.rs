//! Persistent cross-session memory

use crate::error::Result;
use crate::vectors::{ScoredSummary, VectorCollection};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::sync::Mutex;
use tracing::{debug, info};

/// Preference TTL; expired rows are treated as absent on read
const PREFERENCES_TTL_DAYS: i64 = 365;

/// Per-user analysis preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPreferences {
    pub risk_taxonomy: Vec<String>,
    pub writing_style: String,
    pub preferred_kpis: Vec<String>,
    pub version: i64,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            risk_taxonomy: Vec::new(),
            writing_style: "narrative".to_string(),
            preferred_kpis: Vec::new(),
            version: 1,
        }
    }
}

/// One saved analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub ticker: String,
    pub analysis_date: DateTime<Utc>,
    pub summary: String,
    pub key_metrics: serde_json::Value,
}

/// Sqlite-backed memory shared across sessions
///
/// The vector collection mirrors `analysis_history` in process and is
/// rebuilt from the table on connect.
pub struct GlobalMemory {
    pool: SqlitePool,
    vectors: Mutex<VectorCollection>,
}

impl GlobalMemory {
    /// Open (creating if missing) the database at `path`
    pub async fn connect(path: &str) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        Self::from_pool(pool).await
    }

    /// In-memory database, used in tests
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> Result<Self> {
        let memory = Self {
            pool,
            vectors: Mutex::new(VectorCollection::new()),
        };
        memory.init_tables().await?;
        memory.load_vectors().await?;
        Ok(memory)
    }

    async fn init_tables(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS user_preferences (
                user_id TEXT PRIMARY KEY,
                risk_taxonomy TEXT,
                writing_style TEXT,
                preferred_kpis TEXT,
                version INTEGER,
                created_at TEXT,
                ttl_expires TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS analysis_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                ticker TEXT,
                analysis_date TEXT,
                summary TEXT,
                key_metrics TEXT,
                embedding TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn load_vectors(&self) -> Result<()> {
        let rows = sqlx::query("SELECT ticker, summary, embedding FROM analysis_history")
            .fetch_all(&self.pool)
            .await?;

        let mut vectors = self.lock_vectors();
        for row in &rows {
            let ticker: String = row.try_get("ticker")?;
            let summary: String = row.try_get("summary")?;
            let embedding: String = row.try_get("embedding")?;
            let embedding: Vec<f64> = serde_json::from_str(&embedding)?;
            vectors.add(ticker, summary, embedding);
        }
        if !vectors.is_empty() {
            info!(entries = vectors.len(), "Loaded analysis embeddings");
        }
        Ok(())
    }

    /// Upsert preferences for a user, refreshing the TTL
    pub async fn save_user_preferences(
        &self,
        user_id: &str,
        preferences: &UserPreferences,
    ) -> Result<()> {
        let now = Utc::now();
        let ttl = now + Duration::days(PREFERENCES_TTL_DAYS);

        sqlx::query(
            r#"
            INSERT OR REPLACE INTO user_preferences
            (user_id, risk_taxonomy, writing_style, preferred_kpis, version, created_at, ttl_expires)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(serde_json::to_string(&preferences.risk_taxonomy)?)
        .bind(&preferences.writing_style)
        .bind(serde_json::to_string(&preferences.preferred_kpis)?)
        .bind(preferences.version)
        .bind(now.to_rfc3339())
        .bind(ttl.to_rfc3339())
        .execute(&self.pool)
        .await?;

        debug!(user_id, version = preferences.version, "Saved user preferences");
        Ok(())
    }

    /// Preferences for a user; `None` when absent or past their TTL
    pub async fn get_user_preferences(&self, user_id: &str) -> Result<Option<UserPreferences>> {
        let row = sqlx::query(
            "SELECT risk_taxonomy, writing_style, preferred_kpis, version, ttl_expires \
             FROM user_preferences WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let ttl_expires: String = row.try_get("ttl_expires")?;
        if let Ok(ttl) = DateTime::parse_from_rfc3339(&ttl_expires) {
            if ttl < Utc::now() {
                return Ok(None);
            }
        }

        let risk_taxonomy: String = row.try_get("risk_taxonomy")?;
        let preferred_kpis: String = row.try_get("preferred_kpis")?;
        Ok(Some(UserPreferences {
            risk_taxonomy: serde_json::from_str(&risk_taxonomy)?,
            writing_style: row.try_get("writing_style")?,
            preferred_kpis: serde_json::from_str(&preferred_kpis)?,
            version: row.try_get("version")?,
        }))
    }

    /// Append an analysis to the history and the vector collection
    pub async fn save_analysis(
        &self,
        ticker: &str,
        summary: &str,
        metrics: &serde_json::Value,
        embedding: Vec<f64>,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO analysis_history (ticker, analysis_date, summary, key_metrics, embedding) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(ticker)
        .bind(Utc::now().to_rfc3339())
        .bind(summary)
        .bind(metrics.to_string())
        .bind(serde_json::to_string(&embedding)?)
        .execute(&self.pool)
        .await?;

        self.lock_vectors().add(ticker, summary, embedding);
        debug!(ticker, "Saved analysis");
        Ok(())
    }

    /// Most recent analyses for a ticker, newest first
    pub async fn recent_analyses(&self, ticker: &str, n: u32) -> Result<Vec<AnalysisRecord>> {
        let rows = sqlx::query(
            "SELECT ticker, analysis_date, summary, key_metrics FROM analysis_history \
             WHERE ticker = ? ORDER BY id DESC LIMIT ?",
        )
        .bind(ticker)
        .bind(n)
        .fetch_all(&self.pool)
        .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            let analysis_date: String = row.try_get("analysis_date")?;
            let key_metrics: String = row.try_get("key_metrics")?;
            records.push(AnalysisRecord {
                ticker: row.try_get("ticker")?,
                analysis_date: DateTime::parse_from_rfc3339(&analysis_date)
                    .map(|d| d.with_timezone(&Utc))
                    .unwrap_or_else(|_| Utc::now()),
                summary: row.try_get("summary")?,
                key_metrics: serde_json::from_str(&key_metrics)?,
            });
        }
        Ok(records)
    }

    /// Previously analyzed companies nearest to the given embedding
    pub fn similar_analyses(&self, embedding: &[f64], n: usize) -> Vec<ScoredSummary> {
        self.lock_vectors().similar(embedding, n)
    }

    fn lock_vectors(&self) -> std::sync::MutexGuard<'_, VectorCollection> {
        self.vectors.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preferences() -> UserPreferences {
        UserPreferences {
            risk_taxonomy: vec!["market".to_string(), "operational".to_string()],
            writing_style: "bullet-first".to_string(),
            preferred_kpis: vec!["gross margin".to_string()],
            version: 2,
        }
    }

    #[tokio::test]
    async fn test_preferences_round_trip() {
        let memory = GlobalMemory::in_memory().await.expect("connect");
        memory
            .save_user_preferences("user1", &preferences())
            .await
            .expect("save");

        let loaded = memory
            .get_user_preferences("user1")
            .await
            .expect("get")
            .expect("present");
        assert_eq!(loaded.risk_taxonomy, vec!["market", "operational"]);
        assert_eq!(loaded.writing_style, "bullet-first");
        assert_eq!(loaded.version, 2);
    }

    #[tokio::test]
    async fn test_upsert_replaces_row() {
        let memory = GlobalMemory::in_memory().await.expect("connect");
        memory
            .save_user_preferences("user1", &preferences())
            .await
            .expect("save");

        let mut updated = preferences();
        updated.writing_style = "narrative".to_string();
        updated.version = 3;
        memory
            .save_user_preferences("user1", &updated)
            .await
            .expect("save again");

        let loaded = memory
            .get_user_preferences("user1")
            .await
            .expect("get")
            .expect("present");
        assert_eq!(loaded.writing_style, "narrative");
        assert_eq!(loaded.version, 3);
    }

    #[tokio::test]
    async fn test_unknown_user_is_none() {
        let memory = GlobalMemory::in_memory().await.expect("connect");
        let loaded = memory.get_user_preferences("nobody").await.expect("get");
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_expired_preferences_are_none() {
        let memory = GlobalMemory::in_memory().await.expect("connect");
        let expired = (Utc::now() - Duration::days(1)).to_rfc3339();
        sqlx::query(
            "INSERT INTO user_preferences \
             (user_id, risk_taxonomy, writing_style, preferred_kpis, version, created_at, ttl_expires) \
             VALUES ('user1', '[]', 'narrative', '[]', 1, ?, ?)",
        )
        .bind(Utc::now().to_rfc3339())
        .bind(expired)
        .execute(&memory.pool)
        .await
        .expect("insert");

        let loaded = memory.get_user_preferences("user1").await.expect("get");
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_history_is_append_only() {
        let memory = GlobalMemory::in_memory().await.expect("connect");
        let metrics = serde_json::json!({"price": 100.0});
        memory
            .save_analysis("NVDA", "first pass", &metrics, vec![1.0, 0.0])
            .await
            .expect("save");
        memory
            .save_analysis("NVDA", "second pass", &metrics, vec![0.0, 1.0])
            .await
            .expect("save");

        let records = memory.recent_analyses("NVDA", 10).await.expect("recent");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].summary, "second pass");
        assert_eq!(records[1].summary, "first pass");
    }

    #[tokio::test]
    async fn test_similar_analyses_uses_saved_embeddings() {
        let memory = GlobalMemory::in_memory().await.expect("connect");
        let metrics = serde_json::json!({});
        memory
            .save_analysis("NVDA", "gpu maker", &metrics, vec![1.0, 0.0])
            .await
            .expect("save");
        memory
            .save_analysis("KO", "beverage company", &metrics, vec![0.0, 1.0])
            .await
            .expect("save");

        let hits = memory.similar_analyses(&[0.9, 0.1], 1);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].ticker, "NVDA");
    }
}
