//! Analysis Storage
//!
//! Persistence boundary for completed analyses. The engine never touches a
//! store; callers save what they want to keep.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{EngineError, Result};
use crate::model::Analysis;

/// Largest page `history` will return
pub const MAX_HISTORY_LIMIT: usize = 500;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: Uuid,
    pub stored_at: DateTime<Utc>,
    pub analysis: Analysis,
}

/// Analysis storage trait
#[async_trait]
pub trait AnalysisStore: Send + Sync {
    /// Persist an analysis and return its record id
    async fn save(&self, analysis: &Analysis) -> Result<Uuid>;

    /// Most recently saved analysis
    async fn latest(&self) -> Result<Option<AnalysisRecord>>;

    /// Analyses whose metrics timestamp is at or after `since`, newest
    /// first, at most `limit` (1..=500) of them
    async fn history(&self, since: DateTime<Utc>, limit: usize) -> Result<Vec<AnalysisRecord>>;
}

/// In-memory analysis store (for development and tests)
pub struct MemoryAnalysisStore {
    records: RwLock<Vec<AnalysisRecord>>,
}

impl Default for MemoryAnalysisStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryAnalysisStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl AnalysisStore for MemoryAnalysisStore {
    async fn save(&self, analysis: &Analysis) -> Result<Uuid> {
        let record = AnalysisRecord {
            id: Uuid::new_v4(),
            stored_at: Utc::now(),
            analysis: analysis.clone(),
        };
        let id = record.id;

        self.records.write().await.push(record);
        tracing::debug!(%id, "Analysis saved");
        Ok(id)
    }

    async fn latest(&self) -> Result<Option<AnalysisRecord>> {
        Ok(self.records.read().await.last().cloned())
    }

    async fn history(&self, since: DateTime<Utc>, limit: usize) -> Result<Vec<AnalysisRecord>> {
        if limit == 0 || limit > MAX_HISTORY_LIMIT {
            return Err(EngineError::InvalidParameter(format!(
                "history limit must be between 1 and {MAX_HISTORY_LIMIT}, got {limit}"
            )));
        }

        let records = self.records.read().await;
        let mut matching: Vec<AnalysisRecord> = records
            .iter()
            .filter(|r| r.analysis.metrics.timestamp >= since)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.analysis.metrics.timestamp.cmp(&a.analysis.metrics.timestamp));
        matching.truncate(limit);
        Ok(matching)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::VolatilityEngine;
    use crate::source::DemoSnapshotSource;
    use chrono::Duration;

    fn analysis_at(timestamp: DateTime<Utc>) -> Analysis {
        let mut snapshot = DemoSnapshotSource::new().snapshot();
        snapshot.timestamp = timestamp;
        let mut config = crate::config::EngineConfig::default();
        config.projection.paths = 50;
        VolatilityEngine::new(config).analyze(&snapshot).unwrap()
    }

    #[tokio::test]
    async fn test_save_and_latest() {
        let store = MemoryAnalysisStore::new();
        assert!(store.latest().await.unwrap().is_none());

        let first = store.save(&analysis_at(Utc::now())).await.unwrap();
        let second = store.save(&analysis_at(Utc::now())).await.unwrap();
        assert_ne!(first, second);
        assert_eq!(store.len().await, 2);
        assert_eq!(store.latest().await.unwrap().unwrap().id, second);
    }

    #[tokio::test]
    async fn test_history_filters_and_orders() {
        let store = MemoryAnalysisStore::new();
        let now = Utc::now();
        for days_ago in [10, 1, 5, 3] {
            store.save(&analysis_at(now - Duration::days(days_ago))).await.unwrap();
        }

        let week = store.history(now - Duration::days(7), 10).await.unwrap();
        assert_eq!(week.len(), 3);
        assert_eq!(week[0].analysis.metrics.timestamp, now - Duration::days(1));
        assert_eq!(week[2].analysis.metrics.timestamp, now - Duration::days(5));

        let top = store.history(now - Duration::days(30), 2).await.unwrap();
        assert_eq!(top.len(), 2);
    }

    #[tokio::test]
    async fn test_history_limit_bounds() {
        let store = MemoryAnalysisStore::new();
        assert!(matches!(
            store.history(Utc::now(), 0).await,
            Err(EngineError::InvalidParameter(_))
        ));
        assert!(store.history(Utc::now(), 501).await.is_err());
        assert!(store.history(Utc::now(), 500).await.unwrap().is_empty());
    }
}
