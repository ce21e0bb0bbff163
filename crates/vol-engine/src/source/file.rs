//! JSON File Snapshot Source

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::SnapshotSource;
use crate::error::{EngineError, Result};
use crate::model::MarketSnapshot;

/// Reads a snapshot from a JSON document using the collector field names
/// (`eth_price`, `eth_iv_deribit`, ...).
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SnapshotSource for JsonFileSource {
    async fn fetch(&self) -> Result<MarketSnapshot> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            EngineError::Source(format!("{}: {e}", self.path.display()))
        })?;
        let snapshot: MarketSnapshot = serde_json::from_str(&raw)?;
        tracing::debug!(path = %self.path.display(), "Loaded snapshot from file");
        Ok(snapshot)
    }

    async fn health_check(&self) -> bool {
        tokio::fs::metadata(&self.path).await.is_ok()
    }

    fn name(&self) -> &str {
        "JsonFile"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("vol-engine-{}-{name}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_reads_snapshot() {
        let path = temp_path("snapshot.json");
        tokio::fs::write(
            &path,
            r#"{"eth_price": "3614.96", "eth_iv_deribit": 65.4, "eth_rv_30d": 59.0, "historical_iv": [45, 90]}"#,
        )
        .await
        .unwrap();

        let source = JsonFileSource::new(&path);
        assert!(source.health_check().await);
        let snapshot = source.fetch().await.unwrap();
        assert_eq!(snapshot.spot_price, Some(dec!(3614.96)));
        assert_eq!(snapshot.historical_iv, vec![45.0, 90.0]);

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_file_is_source_error() {
        let source = JsonFileSource::new(temp_path("absent.json"));
        assert!(!source.health_check().await);
        assert!(matches!(source.fetch().await, Err(EngineError::Source(_))));
    }

    #[tokio::test]
    async fn test_malformed_json_is_serialization_error() {
        let path = temp_path("bad.json");
        tokio::fs::write(&path, "{not json").await.unwrap();
        let result = JsonFileSource::new(&path).fetch().await;
        assert!(matches!(result, Err(EngineError::Serialization(_))));
        tokio::fs::remove_file(&path).await.unwrap();
    }
}
