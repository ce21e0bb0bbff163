//! Volatility Skew Metrics

use serde::{Deserialize, Serialize};

use crate::config::SkewConfig;
use crate::model::SkewPoint;

/// Where the skew numbers came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkewSource {
    /// Configured constants; no strike data was supplied
    Placeholder,
    /// Computed from the snapshot's strike-level curve
    Curve,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkewMetrics {
    /// Wing put IV minus wing call IV
    pub put_call_skew: f64,

    /// Near put IV minus near call IV
    pub atm_skew: f64,

    /// Population std of IV across strikes
    pub smile_curvature: f64,

    pub source: SkewSource,
}

/// Skew descriptors from a strike curve, or the configured placeholders when
/// the curve has fewer than three points.
#[allow(clippy::cast_precision_loss)]
pub fn skew_metrics(curve: &[SkewPoint], config: &SkewConfig) -> SkewMetrics {
    if curve.len() < 3 {
        return SkewMetrics {
            put_call_skew: config.placeholder_put_call,
            atm_skew: config.placeholder_atm,
            smile_curvature: config.placeholder_curvature,
            source: SkewSource::Placeholder,
        };
    }

    let mut sorted = curve.to_vec();
    sorted.sort_by(|a, b| a.moneyness.total_cmp(&b.moneyness));
    let ivs: Vec<f64> = sorted.iter().map(|p| p.iv).collect();
    let n = ivs.len();

    let mean = ivs.iter().sum::<f64>() / n as f64;
    let variance = ivs.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;

    SkewMetrics {
        put_call_skew: ivs[0] - ivs[n - 1],
        atm_skew: ivs[1] - ivs[n - 2],
        smile_curvature: variance.sqrt(),
        source: SkewSource::Curve,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve(points: &[(f64, f64)]) -> Vec<SkewPoint> {
        points
            .iter()
            .map(|&(moneyness, iv)| SkewPoint { moneyness, iv })
            .collect()
    }

    #[test]
    fn test_placeholder_without_curve() {
        let metrics = skew_metrics(&[], &SkewConfig::default());
        assert_eq!(metrics.source, SkewSource::Placeholder);
        assert!((metrics.put_call_skew - 13.0).abs() < f64::EPSILON);
        assert!((metrics.atm_skew - 5.0).abs() < f64::EPSILON);
        assert!((metrics.smile_curvature - 4.7).abs() < f64::EPSILON);
    }

    #[test]
    fn test_typical_curve_reproduces_placeholders() {
        // Input order does not matter
        let points = curve(&[(1.0, 65.0), (0.8, 75.0), (1.2, 62.0), (0.9, 68.0), (1.1, 63.0)]);
        let metrics = skew_metrics(&points, &SkewConfig::default());

        assert_eq!(metrics.source, SkewSource::Curve);
        assert!((metrics.put_call_skew - 13.0).abs() < 1e-12);
        assert!((metrics.atm_skew - 5.0).abs() < 1e-12);
        assert!((metrics.smile_curvature - 21.84_f64.sqrt()).abs() < 1e-12);
        assert!((metrics.smile_curvature - 4.7).abs() < 0.05);
    }

    #[test]
    fn test_short_curve_falls_back() {
        let points = curve(&[(0.9, 70.0), (1.1, 60.0)]);
        assert_eq!(skew_metrics(&points, &SkewConfig::default()).source, SkewSource::Placeholder);
    }
}
