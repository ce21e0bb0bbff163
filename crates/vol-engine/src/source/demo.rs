//! Demo Snapshot Source
//!
//! A cached ETH market snapshot for demos and tests. Values are a realistic
//! mid-volatility reading with bearish options flow.

use async_trait::async_trait;
use rust_decimal_macros::dec;

use super::SnapshotSource;
use crate::error::Result;
use crate::model::{MarketSnapshot, OptionsFlow};

/// Static snapshot source
pub struct DemoSnapshotSource {
    with_history: bool,
}

impl Default for DemoSnapshotSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoSnapshotSource {
    pub const fn new() -> Self {
        Self { with_history: true }
    }

    /// Omit the historical IV series so rank falls back to the default range
    pub const fn without_history() -> Self {
        Self { with_history: false }
    }

    pub fn snapshot(&self) -> MarketSnapshot {
        let mut snapshot = MarketSnapshot::new(dec!(3614.96), 65.4)
            .with_realized(23.63, 23.48, 59.0)
            .with_reference_realized(11.37, 12.47)
            .with_vol_index(17.73)
            .with_options_flow(OptionsFlow {
                calls_bought: 20.8,
                calls_sold: 26.4,
                puts_bought: 32.5,
                puts_sold: 24.8,
                net_put_bias: 10.1,
            });
        snapshot.implied_vol_alt = Some(65.0);
        snapshot.bond_vol_index = Some(89.20);

        if self.with_history {
            snapshot = snapshot.with_history((0..10_i32).map(|i| 45.0 + 5.0 * f64::from(i)).collect());
        }
        snapshot
    }
}

#[async_trait]
impl SnapshotSource for DemoSnapshotSource {
    async fn fetch(&self) -> Result<MarketSnapshot> {
        Ok(self.snapshot())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "Demo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_demo_snapshot_is_valid() {
        let source = DemoSnapshotSource::new();
        let snapshot = source.fetch().await.unwrap();

        assert!(snapshot.validate().is_ok());
        assert_eq!(snapshot.spot_price, Some(dec!(3614.96)));
        assert_eq!(snapshot.realized_vol_30d, Some(59.0));
        assert_eq!(snapshot.historical_iv.first(), Some(&45.0));
        assert_eq!(snapshot.historical_iv.last(), Some(&90.0));
        assert!(source.health_check().await);
    }

    #[tokio::test]
    async fn test_without_history() {
        let snapshot = DemoSnapshotSource::without_history().fetch().await.unwrap();
        assert!(snapshot.historical_iv.is_empty());
    }
}
