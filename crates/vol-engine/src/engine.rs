//! Volatility Engine
//!
//! Wires the calculators together: snapshot in, [`Analysis`] out.
//!
//! ```text
//! MarketSnapshot ──validate──► rank / percentile / premium
//!                              skew / regime / cross-asset
//!                              forward projection (seeded)
//!                                     │
//!                                     ▼
//!                              MetricsBundle ──► position rules ──► assessment
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::analytics::{
    ForwardProjector, RegimeClassifier, cross_asset_signals, iv_percentile, iv_rank, risk_premium,
    skew_metrics,
};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::model::{Analysis, CurrentMetrics, MarketSnapshot, MetricsBundle};
use crate::strategy::{PositionEvaluator, assess};

/// Stateless analysis engine. Safe to share across threads.
#[derive(Clone, Debug, Default)]
pub struct VolatilityEngine {
    config: EngineConfig,
    classifier: RegimeClassifier,
    projector: ForwardProjector,
    evaluator: PositionEvaluator,
}

impl VolatilityEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            classifier: RegimeClassifier::new(config.regime.clone()),
            projector: ForwardProjector::new(config.projection.clone()),
            evaluator: PositionEvaluator::new(config.positions.clone()),
            config,
        }
    }

    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyze a snapshot with a generator seeded from the configured seed.
    /// Repeated calls on the same snapshot give identical results.
    pub fn analyze(&self, snapshot: &MarketSnapshot) -> Result<Analysis> {
        let mut rng = StdRng::seed_from_u64(self.config.projection.seed);
        self.analyze_with_rng(snapshot, &mut rng)
    }

    /// Analyze a snapshot drawing the projection from `rng`
    pub fn analyze_with_rng<R: Rng + ?Sized>(
        &self,
        snapshot: &MarketSnapshot,
        rng: &mut R,
    ) -> Result<Analysis> {
        let metrics = self.metrics(snapshot, rng)?;
        let positions = self.evaluator.evaluate(&metrics);
        let assessment = assess(&metrics, &positions, &self.config.assessment);

        tracing::info!(
            iv = metrics.current.implied_vol,
            rank = metrics.current.iv_rank,
            premium = ?metrics.current.risk_premium,
            regime = metrics.regime.crypto.as_str(),
            positions = positions.len(),
            "Volatility analysis complete"
        );

        Ok(Analysis {
            metrics,
            positions,
            assessment,
        })
    }

    /// Derive the metrics bundle without evaluating positions.
    /// The snapshot is validated first; an invalid snapshot yields no bundle.
    pub fn metrics<R: Rng + ?Sized>(
        &self,
        snapshot: &MarketSnapshot,
        rng: &mut R,
    ) -> Result<MetricsBundle> {
        snapshot.validate()?;
        let spot_price = snapshot.spot()?;
        let implied_vol = snapshot.implied_vol()?;
        let history = &snapshot.historical_iv;

        if history.len() < 2 {
            tracing::warn!(
                points = history.len(),
                min = self.config.rank.fallback_min,
                max = self.config.rank.fallback_max,
                "IV history too short, ranking against fallback range"
            );
        }

        let current = CurrentMetrics {
            implied_vol,
            realized_vol_30d: snapshot.realized_vol_30d,
            risk_premium: risk_premium(Some(implied_vol), snapshot.realized_vol_30d),
            iv_rank: iv_rank(implied_vol, history, &self.config.rank),
            iv_percentile: iv_percentile(implied_vol, history),
        };
        tracing::debug!(
            rank = current.iv_rank,
            percentile = current.iv_percentile,
            premium = ?current.risk_premium,
            "Current metrics"
        );

        let skew = skew_metrics(&snapshot.skew_curve, &self.config.skew);
        let regime = self.classifier.classify(implied_vol, snapshot.vol_index);
        let cross_asset = cross_asset_signals(snapshot, &self.classifier);
        let projection = self.projector.project(implied_vol, rng)?;

        Ok(MetricsBundle {
            timestamp: snapshot.timestamp,
            spot_price,
            current,
            skew,
            regime,
            cross_asset,
            projection,
            options_flow: snapshot.options_flow.clone(),
        })
    }
}
