//! Headline Assessment
//!
//! Condenses the metrics and candidate positions into a few labels.

use serde::{Deserialize, Serialize};

use crate::analytics::CryptoRegime;
use crate::config::AssessmentThresholds;
use crate::model::{CandidatePosition, MetricsBundle, PositionKind, Priority};

/// Where current implied vol sits in its own history
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IvValuation {
    #[serde(rename = "EXPENSIVE")]
    Expensive,
    #[serde(rename = "MODERATELY EXPENSIVE")]
    ModeratelyExpensive,
    #[serde(rename = "FAIR VALUE")]
    FairValue,
    #[serde(rename = "CHEAP")]
    Cheap,
}

impl IvValuation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Expensive => "EXPENSIVE",
            Self::ModeratelyExpensive => "MODERATELY EXPENSIVE",
            Self::FairValue => "FAIR VALUE",
            Self::Cheap => "CHEAP",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PremiumAssessment {
    #[serde(rename = "VERY HIGH")]
    VeryHigh,
    #[serde(rename = "HIGH")]
    High,
    #[serde(rename = "MODERATE")]
    Moderate,
    #[serde(rename = "FAIR")]
    Fair,
    #[serde(rename = "NEGATIVE")]
    Negative,
    /// No realized volatility to compare against
    #[serde(rename = "UNAVAILABLE")]
    Unavailable,
}

impl PremiumAssessment {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VeryHigh => "VERY HIGH",
            Self::High => "HIGH",
            Self::Moderate => "MODERATE",
            Self::Fair => "FAIR",
            Self::Negative => "NEGATIVE",
            Self::Unavailable => "UNAVAILABLE",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Confidence {
    High,
    Medium,
}

impl Confidence {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    pub iv_valuation: IvValuation,
    pub risk_premium: PremiumAssessment,
    pub regime: CryptoRegime,

    /// First HIGH-priority candidate, if any rule produced one
    pub top_opportunity: Option<PositionKind>,

    pub confidence: Confidence,
}

/// First HIGH-priority position in evaluation order
pub fn top_opportunity(positions: &[CandidatePosition]) -> Option<&CandidatePosition> {
    positions.iter().find(|p| p.priority == Priority::High)
}

pub fn assess(
    metrics: &MetricsBundle,
    positions: &[CandidatePosition],
    thresholds: &AssessmentThresholds,
) -> Assessment {
    let rank = metrics.current.iv_rank;
    let premium = metrics.current.risk_premium;

    let iv_valuation = if rank > thresholds.rank_expensive {
        IvValuation::Expensive
    } else if rank > thresholds.rank_moderately_expensive {
        IvValuation::ModeratelyExpensive
    } else if rank > thresholds.rank_fair {
        IvValuation::FairValue
    } else {
        IvValuation::Cheap
    };

    let risk_premium = match premium {
        None => PremiumAssessment::Unavailable,
        Some(v) if v > thresholds.premium_very_high => PremiumAssessment::VeryHigh,
        Some(v) if v > thresholds.premium_high => PremiumAssessment::High,
        Some(v) if v > thresholds.premium_moderate => PremiumAssessment::Moderate,
        Some(v) if v > thresholds.premium_fair => PremiumAssessment::Fair,
        Some(_) => PremiumAssessment::Negative,
    };

    let confident = rank > thresholds.confidence_min_rank
        && premium.is_some_and(|v| v.abs() > thresholds.confidence_min_abs_premium);

    Assessment {
        iv_valuation,
        risk_premium,
        regime: metrics.regime.crypto,
        top_opportunity: top_opportunity(positions).map(|p| p.kind),
        confidence: if confident {
            Confidence::High
        } else {
            Confidence::Medium
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{
        CrossAssetSignals, ProjectionSummary, RegimeAnalysis, SkewMetrics, SkewSource,
    };
    use crate::model::CurrentMetrics;
    use crate::strategy::PositionEvaluator;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn metrics(rank: f64, premium: Option<f64>) -> MetricsBundle {
        MetricsBundle {
            timestamp: Utc::now(),
            spot_price: dec!(3614.96),
            current: CurrentMetrics {
                implied_vol: 65.4,
                realized_vol_30d: premium.map(|p| 65.4 - p),
                risk_premium: premium,
                iv_rank: rank,
                iv_percentile: rank,
            },
            skew: SkewMetrics {
                put_call_skew: 13.0,
                atm_skew: 5.0,
                smile_curvature: 4.7,
                source: SkewSource::Placeholder,
            },
            regime: RegimeAnalysis {
                crypto: CryptoRegime::Medium,
                reference: None,
                divergence: None,
            },
            cross_asset: CrossAssetSignals {
                primary_reference_rv_ratio: None,
                iv_index_ratio: None,
                index_regime: None,
            },
            projection: ProjectionSummary {
                mean: 65.0,
                std_dev: 5.0,
                p5: 57.0,
                median: 65.0,
                p95: 73.0,
                paths: 1,
                days: 30,
                sample: vec![65.0],
            },
            options_flow: None,
        }
    }

    fn assess_default(rank: f64, premium: Option<f64>) -> Assessment {
        let m = metrics(rank, premium);
        let positions = PositionEvaluator::default().evaluate(&m);
        assess(&m, &positions, &AssessmentThresholds::default())
    }

    #[test]
    fn test_valuation_bands() {
        assert_eq!(assess_default(0.8, Some(0.0)).iv_valuation, IvValuation::Expensive);
        assert_eq!(assess_default(0.7, Some(0.0)).iv_valuation, IvValuation::ModeratelyExpensive);
        assert_eq!(assess_default(0.39, Some(0.0)).iv_valuation, IvValuation::FairValue);
        assert_eq!(assess_default(0.2, Some(0.0)).iv_valuation, IvValuation::Cheap);
    }

    #[test]
    fn test_premium_bands() {
        let label = |p| assess_default(0.5, p).risk_premium;
        assert_eq!(label(Some(20.0)), PremiumAssessment::VeryHigh);
        assert_eq!(label(Some(15.0)), PremiumAssessment::High);
        assert_eq!(label(Some(6.4)), PremiumAssessment::Moderate);
        assert_eq!(label(Some(0.0)), PremiumAssessment::Fair);
        assert_eq!(label(Some(-3.0)), PremiumAssessment::Negative);
        assert_eq!(label(None), PremiumAssessment::Unavailable);
    }

    #[test]
    fn test_top_opportunity_and_confidence() {
        let rich = assess_default(0.39, Some(6.4));
        assert_eq!(rich.top_opportunity, Some(PositionKind::ShortPutSpread));
        assert_eq!(rich.confidence, Confidence::High);
        assert_eq!(rich.regime, CryptoRegime::Medium);

        let flat = assess_default(0.39, Some(1.0));
        assert_eq!(flat.top_opportunity, None);
        assert_eq!(flat.confidence, Confidence::Medium);

        let unknown = assess_default(0.9, None);
        assert_eq!(unknown.top_opportunity, None);
        assert_eq!(unknown.confidence, Confidence::Medium);
    }

    #[test]
    fn test_labels_serialize_with_spaces() {
        let json = serde_json::to_string(&IvValuation::ModeratelyExpensive).unwrap();
        assert_eq!(json, "\"MODERATELY EXPENSIVE\"");
        assert_eq!(PremiumAssessment::VeryHigh.as_str(), "VERY HIGH");
    }
}
