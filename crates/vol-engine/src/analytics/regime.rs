//! Volatility Regime Classification

use serde::{Deserialize, Serialize};

use crate::config::RegimeThresholds;

/// Primary asset (crypto) implied-volatility regime
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CryptoRegime {
    #[serde(rename = "low_vol")]
    Low,
    #[serde(rename = "medium_vol")]
    Medium,
    #[serde(rename = "high_vol")]
    High,
    #[serde(rename = "crisis_vol")]
    Crisis,
}

impl CryptoRegime {
    /// Band position, shared ordering with [`ReferenceRegime::ordinal`]
    pub const fn ordinal(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
            Self::Crisis => 3,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low_vol",
            Self::Medium => "medium_vol",
            Self::High => "high_vol",
            Self::Crisis => "crisis_vol",
        }
    }
}

/// Traditional-market (VIX) regime
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceRegime {
    Low,
    Medium,
    High,
}

impl ReferenceRegime {
    pub const fn ordinal(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeAnalysis {
    pub crypto: CryptoRegime,

    /// Absent when no reference index was observed
    pub reference: Option<ReferenceRegime>,

    /// Bands differ by position; absent with the reference regime
    pub divergence: Option<bool>,
}

/// Maps volatility levels onto regime bands. Lower edges are inclusive.
#[derive(Clone, Debug, Default)]
pub struct RegimeClassifier {
    thresholds: RegimeThresholds,
}

impl RegimeClassifier {
    pub const fn new(thresholds: RegimeThresholds) -> Self {
        Self { thresholds }
    }

    pub fn crypto(&self, implied_vol: f64) -> CryptoRegime {
        let t = &self.thresholds;
        if implied_vol < t.crypto_medium {
            CryptoRegime::Low
        } else if implied_vol < t.crypto_high {
            CryptoRegime::Medium
        } else if implied_vol < t.crypto_crisis {
            CryptoRegime::High
        } else {
            CryptoRegime::Crisis
        }
    }

    pub fn reference(&self, index: f64) -> ReferenceRegime {
        let t = &self.thresholds;
        if index < t.reference_medium {
            ReferenceRegime::Low
        } else if index < t.reference_high {
            ReferenceRegime::Medium
        } else {
            ReferenceRegime::High
        }
    }

    /// Classify both markets and flag when their band positions disagree
    pub fn classify(&self, implied_vol: f64, index: Option<f64>) -> RegimeAnalysis {
        let crypto = self.crypto(implied_vol);
        let reference = index.map(|v| self.reference(v));
        RegimeAnalysis {
            crypto,
            reference,
            divergence: reference.map(|r| r.ordinal() != crypto.ordinal()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crypto_band_edges() {
        let classifier = RegimeClassifier::default();
        let cases = [
            (39.9, CryptoRegime::Low),
            (40.0, CryptoRegime::Medium),
            (69.9, CryptoRegime::Medium),
            (70.0, CryptoRegime::High),
            (99.9, CryptoRegime::High),
            (100.0, CryptoRegime::Crisis),
            (0.0, CryptoRegime::Low),
            (250.0, CryptoRegime::Crisis),
        ];
        for (iv, expected) in cases {
            assert_eq!(classifier.crypto(iv), expected, "iv = {iv}");
        }
    }

    #[test]
    fn test_reference_band_edges() {
        let classifier = RegimeClassifier::default();
        assert_eq!(classifier.reference(19.99), ReferenceRegime::Low);
        assert_eq!(classifier.reference(20.0), ReferenceRegime::Medium);
        assert_eq!(classifier.reference(29.99), ReferenceRegime::Medium);
        assert_eq!(classifier.reference(30.0), ReferenceRegime::High);
    }

    #[test]
    fn test_divergence_compares_band_position() {
        let classifier = RegimeClassifier::default();

        let aligned = classifier.classify(55.0, Some(25.0));
        assert_eq!(aligned.crypto, CryptoRegime::Medium);
        assert_eq!(aligned.reference, Some(ReferenceRegime::Medium));
        assert_eq!(aligned.divergence, Some(false));

        let diverged = classifier.classify(65.4, Some(17.73));
        assert_eq!(diverged.divergence, Some(true));

        // Crisis sits above every reference band
        let crisis = classifier.classify(120.0, Some(45.0));
        assert_eq!(crisis.divergence, Some(true));
    }

    #[test]
    fn test_missing_reference_index() {
        let analysis = RegimeClassifier::default().classify(65.4, None);
        assert_eq!(analysis.crypto, CryptoRegime::Medium);
        assert_eq!(analysis.reference, None);
        assert_eq!(analysis.divergence, None);
    }

    #[test]
    fn test_custom_thresholds() {
        let classifier = RegimeClassifier::new(RegimeThresholds {
            crypto_medium: 30.0,
            ..RegimeThresholds::default()
        });
        assert_eq!(classifier.crypto(35.0), CryptoRegime::Medium);
    }

    #[test]
    fn test_serialized_labels() {
        assert_eq!(serde_json::to_string(&CryptoRegime::Crisis).unwrap(), "\"crisis_vol\"");
        assert_eq!(serde_json::to_string(&ReferenceRegime::Low).unwrap(), "\"low\"");
    }
}
