//! Snapshot Sources
//!
//! Abstractions over where market snapshots come from. Live venue adapters
//! implement [`SnapshotSource`] outside this crate; the demo fixture and JSON
//! file reader are provided here.

mod demo;
mod file;

pub use demo::DemoSnapshotSource;
pub use file::JsonFileSource;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::MarketSnapshot;

/// Snapshot source trait (Strategy pattern)
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetch the latest market snapshot
    async fn fetch(&self) -> Result<MarketSnapshot>;

    /// Check if the source is reachable
    async fn health_check(&self) -> bool;

    /// Source name
    fn name(&self) -> &str;
}

/// Which source produced a snapshot
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotOrigin {
    Primary,
    Fallback,
}

/// Try `primary`, and on failure fall back to `fallback`.
///
/// The primary error is logged and discarded; a fallback failure is returned.
pub async fn fetch_with_fallback(
    primary: &dyn SnapshotSource,
    fallback: &dyn SnapshotSource,
) -> Result<(MarketSnapshot, SnapshotOrigin)> {
    match primary.fetch().await {
        Ok(snapshot) => Ok((snapshot, SnapshotOrigin::Primary)),
        Err(e) => {
            tracing::warn!(
                source = primary.name(),
                fallback = fallback.name(),
                error = %e,
                "Snapshot fetch failed, using fallback"
            );
            let snapshot = fallback.fetch().await?;
            Ok((snapshot, SnapshotOrigin::Fallback))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    struct Unreachable;

    #[async_trait]
    impl SnapshotSource for Unreachable {
        async fn fetch(&self) -> Result<MarketSnapshot> {
            Err(EngineError::Source("connection refused".into()))
        }

        async fn health_check(&self) -> bool {
            false
        }

        fn name(&self) -> &str {
            "Unreachable"
        }
    }

    #[tokio::test]
    async fn test_primary_used_when_available() {
        let demo = DemoSnapshotSource::new();
        let (_, origin) = fetch_with_fallback(&demo, &Unreachable).await.unwrap();
        assert_eq!(origin, SnapshotOrigin::Primary);
    }

    #[tokio::test]
    async fn test_fallback_on_primary_failure() {
        let demo = DemoSnapshotSource::new();
        let (snapshot, origin) = fetch_with_fallback(&Unreachable, &demo).await.unwrap();
        assert_eq!(origin, SnapshotOrigin::Fallback);
        assert_eq!(snapshot.implied_vol, Some(65.4));
    }

    #[tokio::test]
    async fn test_both_failing_returns_fallback_error() {
        let result = fetch_with_fallback(&Unreachable, &Unreachable).await;
        assert!(matches!(result, Err(EngineError::Source(_))));
    }
}
