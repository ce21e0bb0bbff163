//! Volatility Analytics
//!
//! Pure calculators over snapshot values. None of these hold state; the
//! forward projector is the only one that consumes randomness, and it takes
//! the generator from the caller.

mod cross_asset;
mod premium;
mod projection;
mod rank;
mod regime;
mod skew;

pub use cross_asset::{CrossAssetSignals, cross_asset_signals};
pub use premium::{realized_volatility, risk_premium};
pub use projection::{ForwardProjector, ProjectionSummary, percentile_linear};
pub use rank::{iv_percentile, iv_rank};
pub use regime::{CryptoRegime, ReferenceRegime, RegimeAnalysis, RegimeClassifier};
pub use skew::{SkewMetrics, SkewSource, skew_metrics};
