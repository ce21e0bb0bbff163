//! Cross-Asset Volatility Signals

use serde::{Deserialize, Serialize};

use super::regime::{ReferenceRegime, RegimeClassifier};
use crate::model::MarketSnapshot;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CrossAssetSignals {
    /// Primary 7d realized vol over reference 7d realized vol
    pub primary_reference_rv_ratio: Option<f64>,

    /// Primary implied vol over the traditional volatility index
    pub iv_index_ratio: Option<f64>,

    pub index_regime: Option<ReferenceRegime>,
}

pub fn cross_asset_signals(
    snapshot: &MarketSnapshot,
    classifier: &RegimeClassifier,
) -> CrossAssetSignals {
    let primary_reference_rv_ratio = match (snapshot.realized_vol_7d, snapshot.reference_rv_7d) {
        (Some(primary), Some(reference)) if reference > 0.0 => Some(primary / reference),
        _ => None,
    };

    let iv_index_ratio = match (snapshot.implied_vol, snapshot.vol_index) {
        (Some(iv), Some(index)) if index > 0.0 => Some(iv / index),
        _ => None,
    };

    CrossAssetSignals {
        primary_reference_rv_ratio,
        iv_index_ratio,
        index_regime: snapshot.vol_index.map(|v| classifier.reference(v)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_ratios() {
        let snapshot = MarketSnapshot::new(dec!(3614.96), 65.4)
            .with_realized(23.63, 23.48, 59.0)
            .with_reference_realized(11.37, 12.47)
            .with_vol_index(17.73);
        let signals = cross_asset_signals(&snapshot, &RegimeClassifier::default());

        assert!((signals.primary_reference_rv_ratio.unwrap() - 23.48 / 11.37).abs() < 1e-12);
        assert!((signals.iv_index_ratio.unwrap() - 65.4 / 17.73).abs() < 1e-12);
        assert_eq!(signals.index_regime, Some(ReferenceRegime::Low));
    }

    #[test]
    fn test_zero_or_absent_denominators() {
        let snapshot = MarketSnapshot::new(dec!(3614.96), 65.4)
            .with_realized(23.63, 23.48, 59.0)
            .with_reference_realized(0.0, 12.47);
        let signals = cross_asset_signals(&snapshot, &RegimeClassifier::default());

        assert_eq!(signals.primary_reference_rv_ratio, None);
        assert_eq!(signals.iv_index_ratio, None);
        assert_eq!(signals.index_regime, None);

        let zero_index = MarketSnapshot::new(dec!(3614.96), 65.4).with_vol_index(0.0);
        let signals = cross_asset_signals(&zero_index, &RegimeClassifier::default());
        assert_eq!(signals.iv_index_ratio, None);
        assert_eq!(signals.index_regime, Some(ReferenceRegime::Low));
    }
}
