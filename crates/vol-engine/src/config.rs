//! Engine Configuration
//!
//! Every threshold, offset and model constant the engine uses. `Default`
//! reproduces the documented behaviour; `from_env` overrides the simulation
//! knobs that operators most often tune.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Top-level engine configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub rank: RankConfig,
    pub regime: RegimeThresholds,
    pub projection: ProjectionParams,
    pub skew: SkewConfig,
    pub positions: PositionRules,
    pub assessment: AssessmentThresholds,
}

impl EngineConfig {
    /// Defaults overridden by `VOL_*` environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        let p = &mut config.projection;

        if let Some(seed) = env_parse("VOL_SEED")? {
            p.seed = seed;
        }
        if let Some(paths) = env_parse("VOL_PATHS")? {
            p.paths = paths;
        }
        if let Some(days) = env_parse("VOL_DAYS")? {
            p.days = days;
        }
        if let Some(mean) = env_parse("VOL_LONG_TERM_MEAN")? {
            p.long_term_mean = mean;
        }
        if let Some(speed) = env_parse("VOL_MEAN_REVERSION")? {
            p.mean_reversion_speed = speed;
        }
        if let Some(vol_of_vol) = env_parse("VOL_OF_VOL")? {
            p.vol_of_vol = vol_of_vol;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that would make the engine's output meaningless
    pub fn validate(&self) -> Result<()> {
        let p = &self.projection;
        if p.paths == 0 {
            return Err(EngineError::Config("projection.paths must be at least 1".into()));
        }
        if !(p.floor < p.ceiling) {
            return Err(EngineError::Config(format!(
                "projection floor {} must be below ceiling {}",
                p.floor, p.ceiling
            )));
        }
        if !(p.dt > 0.0) || !p.dt.is_finite() {
            return Err(EngineError::Config("projection.dt must be positive".into()));
        }
        let process = [
            ("mean_reversion_speed", p.mean_reversion_speed),
            ("long_term_mean", p.long_term_mean),
            ("vol_of_vol", p.vol_of_vol),
        ];
        for (name, value) in process {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::Config(format!(
                    "projection.{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        if !(self.rank.fallback_min < self.rank.fallback_max) {
            return Err(EngineError::Config("rank fallback range is empty".into()));
        }

        let r = &self.regime;
        if !(r.crypto_medium < r.crypto_high && r.crypto_high < r.crypto_crisis) {
            return Err(EngineError::Config("crypto regime thresholds must increase".into()));
        }
        if !(r.reference_medium < r.reference_high) {
            return Err(EngineError::Config("reference regime thresholds must increase".into()));
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Result<Option<T>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| EngineError::Config(format!("{key}: cannot parse '{raw}'"))),
        Err(_) => Ok(None),
    }
}

/// IV rank fallback range used when history is too short
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RankConfig {
    pub fallback_min: f64,
    pub fallback_max: f64,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            fallback_min: 30.0,
            fallback_max: 120.0,
        }
    }
}

/// Lower edges of each regime band (inclusive)
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RegimeThresholds {
    pub crypto_medium: f64,
    pub crypto_high: f64,
    pub crypto_crisis: f64,
    pub reference_medium: f64,
    pub reference_high: f64,
}

impl Default for RegimeThresholds {
    fn default() -> Self {
        Self {
            crypto_medium: 40.0,
            crypto_high: 70.0,
            crypto_crisis: 100.0,
            reference_medium: 20.0,
            reference_high: 30.0,
        }
    }
}

/// Mean-reverting IV process and batch size
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionParams {
    pub mean_reversion_speed: f64,
    pub long_term_mean: f64,
    pub vol_of_vol: f64,

    /// Step size in years
    pub dt: f64,

    pub floor: f64,
    pub ceiling: f64,
    pub paths: usize,
    pub days: usize,
    pub seed: u64,

    /// Max raw terminal draws kept in the summary
    pub sample_cap: usize,
}

impl Default for ProjectionParams {
    fn default() -> Self {
        Self {
            mean_reversion_speed: 0.5,
            long_term_mean: 55.0,
            vol_of_vol: 15.0,
            dt: 1.0 / 252.0,
            floor: 10.0,
            ceiling: 150.0,
            paths: 10_000,
            days: 30,
            seed: 42,
            sample_cap: 1000,
        }
    }
}

/// Skew values reported when no strike-level curve is available
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SkewConfig {
    pub placeholder_put_call: f64,
    pub placeholder_atm: f64,
    pub placeholder_curvature: f64,
}

impl Default for SkewConfig {
    fn default() -> Self {
        Self {
            placeholder_put_call: 13.0,
            placeholder_atm: 5.0,
            placeholder_curvature: 4.7,
        }
    }
}

/// Short put spread: sell/buy puts below spot when premium, skew and rank are rich
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PutSpreadRule {
    pub min_premium: f64,
    pub min_skew: f64,
    pub min_rank: f64,
    pub sell_strike_factor: Decimal,
    pub buy_strike_factor: Decimal,
    pub dte: u32,
    pub credit: Decimal,
    pub max_risk: Decimal,
    pub win_probability: f64,
}

impl Default for PutSpreadRule {
    fn default() -> Self {
        Self {
            min_premium: 3.0,
            min_skew: 8.0,
            min_rank: 0.3,
            sell_strike_factor: dec!(0.94),
            buy_strike_factor: dec!(0.89),
            dte: 31,
            credit: dec!(50),
            max_risk: dec!(150),
            win_probability: 0.75,
        }
    }
}

/// Short ATM straddle
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct StraddleRule {
    pub min_premium: f64,
    pub min_rank: f64,
    /// Entry additionally requires implied vol above this level
    pub entry_min_iv: f64,
    pub dte: u32,
    pub credit: Decimal,
    pub win_probability: f64,
}

impl Default for StraddleRule {
    fn default() -> Self {
        Self {
            min_premium: 5.0,
            min_rank: 0.35,
            entry_min_iv: 60.0,
            dte: 31,
            credit: dec!(200),
            win_probability: 0.60,
        }
    }
}

/// ATM call calendar (always suggested)
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarRule {
    pub near_dte: u32,
    pub far_dte: u32,
    pub debit: Decimal,
    pub max_profit: Decimal,
    pub win_probability: f64,
}

impl Default for CalendarRule {
    fn default() -> Self {
        Self {
            near_dte: 14,
            far_dte: 31,
            debit: dec!(30),
            max_profit: dec!(60),
            win_probability: 0.55,
        }
    }
}

/// Standing protective put (always suggested)
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct HedgeRule {
    pub strike_factor: Decimal,
    pub dte: u32,
    pub debit: Decimal,
}

impl Default for HedgeRule {
    fn default() -> Self {
        Self {
            strike_factor: dec!(0.89),
            dte: 45,
            debit: dec!(95),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionRules {
    pub put_spread: PutSpreadRule,
    pub straddle: StraddleRule,
    pub calendar: CalendarRule,
    pub hedge: HedgeRule,
}

/// Cut-offs for the textual assessment labels (exclusive lower bounds)
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AssessmentThresholds {
    pub rank_expensive: f64,
    pub rank_moderately_expensive: f64,
    pub rank_fair: f64,
    pub premium_very_high: f64,
    pub premium_high: f64,
    pub premium_moderate: f64,
    pub premium_fair: f64,
    pub confidence_min_rank: f64,
    pub confidence_min_abs_premium: f64,
}

impl Default for AssessmentThresholds {
    fn default() -> Self {
        Self {
            rank_expensive: 0.7,
            rank_moderately_expensive: 0.4,
            rank_fair: 0.2,
            premium_very_high: 15.0,
            premium_high: 8.0,
            premium_moderate: 3.0,
            premium_fair: -3.0,
            confidence_min_rank: 0.3,
            confidence_min_abs_premium: 3.0,
        }
    }
}
