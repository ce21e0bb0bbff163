//! Domain Models
//!
//! Input snapshots, derived metrics and candidate positions.
//! Strikes, premiums and risk figures use `rust_decimal`; volatilities are
//! annualized percentages held as `f64`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::analytics::{
    CrossAssetSignals, ProjectionSummary, RegimeAnalysis, SkewMetrics, realized_volatility,
};
use crate::error::{EngineError, Result};
use crate::strategy::Assessment;

/// Options flow split (percent of traded volume)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OptionsFlow {
    pub calls_bought: f64,
    pub calls_sold: f64,
    pub puts_bought: f64,
    pub puts_sold: f64,
    /// Puts bought minus calls bought
    pub net_put_bias: f64,
}

/// One point of a strike-level implied volatility curve
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkewPoint {
    /// Strike / spot
    pub moneyness: f64,

    /// Implied volatility at this strike (annualized %)
    pub iv: f64,
}

/// A point-in-time record of market observations.
///
/// Every numeric field except the timestamp is optional so that partially
/// populated fetches can be represented; [`MarketSnapshot::validate`] decides
/// which absences are fatal.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MarketSnapshot {
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,

    /// Spot price in USD
    #[serde(rename = "eth_price", default)]
    pub spot_price: Option<Decimal>,

    /// Primary implied volatility (volatility index of the main venue)
    #[serde(rename = "eth_iv_deribit", default)]
    pub implied_vol: Option<f64>,

    /// Secondary venue implied volatility
    #[serde(rename = "eth_iv_binance", default)]
    pub implied_vol_alt: Option<f64>,

    #[serde(rename = "eth_rv_1d", default)]
    pub realized_vol_1d: Option<f64>,

    #[serde(rename = "eth_rv_7d", default)]
    pub realized_vol_7d: Option<f64>,

    #[serde(rename = "eth_rv_30d", default)]
    pub realized_vol_30d: Option<f64>,

    /// Reference asset (BTC) realized volatility
    #[serde(rename = "btc_rv_7d", default)]
    pub reference_rv_7d: Option<f64>,

    #[serde(rename = "btc_rv_30d", default)]
    pub reference_rv_30d: Option<f64>,

    /// Traditional-market volatility index (VIX)
    #[serde(rename = "vix", default)]
    pub vol_index: Option<f64>,

    /// Bond volatility index (MOVE)
    #[serde(rename = "move_index", default)]
    pub bond_vol_index: Option<f64>,

    #[serde(default)]
    pub options_flow: Option<OptionsFlow>,

    /// Strike-level IV curve, ordered or not
    #[serde(default)]
    pub skew_curve: Vec<SkewPoint>,

    /// Historical implied volatility, most recent last
    #[serde(default)]
    pub historical_iv: Vec<f64>,
}

impl MarketSnapshot {
    pub fn new(spot_price: Decimal, implied_vol: f64) -> Self {
        Self {
            timestamp: Utc::now(),
            spot_price: Some(spot_price),
            implied_vol: Some(implied_vol),
            implied_vol_alt: None,
            realized_vol_1d: None,
            realized_vol_7d: None,
            realized_vol_30d: None,
            reference_rv_7d: None,
            reference_rv_30d: None,
            vol_index: None,
            bond_vol_index: None,
            options_flow: None,
            skew_curve: Vec::new(),
            historical_iv: Vec::new(),
        }
    }

    pub const fn with_realized(mut self, rv_1d: f64, rv_7d: f64, rv_30d: f64) -> Self {
        self.realized_vol_1d = Some(rv_1d);
        self.realized_vol_7d = Some(rv_7d);
        self.realized_vol_30d = Some(rv_30d);
        self
    }

    pub const fn with_reference_realized(mut self, rv_7d: f64, rv_30d: f64) -> Self {
        self.reference_rv_7d = Some(rv_7d);
        self.reference_rv_30d = Some(rv_30d);
        self
    }

    pub const fn with_vol_index(mut self, vix: f64) -> Self {
        self.vol_index = Some(vix);
        self
    }

    pub fn with_history(mut self, history: Vec<f64>) -> Self {
        self.historical_iv = history;
        self
    }

    pub fn with_skew_curve(mut self, curve: Vec<SkewPoint>) -> Self {
        self.skew_curve = curve;
        self
    }

    pub fn with_options_flow(mut self, flow: OptionsFlow) -> Self {
        self.options_flow = Some(flow);
        self
    }

    /// Build a snapshot from a flat mapping of named fields.
    ///
    /// Keys follow the collector's naming (`eth_price`, `eth_iv_deribit`,
    /// `vix`, ...). Absent or `null` keys stay absent. A non-numeric value for a
    /// numeric key is an input error. When `eth_prices` (daily closes, oldest
    /// first) is present, absent realized-volatility fields are computed from it.
    pub fn from_fields(fields: &HashMap<String, serde_json::Value>) -> Result<Self> {
        let spot_price = decimal(fields, "eth_price")?;

        let mut snapshot = Self {
            timestamp: Utc::now(),
            spot_price,
            implied_vol: number(fields, "eth_iv_deribit")?,
            implied_vol_alt: number(fields, "eth_iv_binance")?,
            realized_vol_1d: number(fields, "eth_rv_1d")?,
            realized_vol_7d: number(fields, "eth_rv_7d")?,
            realized_vol_30d: number(fields, "eth_rv_30d")?,
            reference_rv_7d: number(fields, "btc_rv_7d")?,
            reference_rv_30d: number(fields, "btc_rv_30d")?,
            vol_index: number(fields, "vix")?,
            bond_vol_index: number(fields, "move_index")?,
            options_flow: None,
            skew_curve: Vec::new(),
            historical_iv: number_series(fields, "historical_iv")?,
        };

        if let Some(raw) = fields.get("timestamp").and_then(|v| v.as_str()) {
            snapshot.timestamp = DateTime::parse_from_rfc3339(raw)
                .map_err(|e| EngineError::invalid("timestamp", raw, e.to_string()))?
                .with_timezone(&Utc);
        }

        let flow = (
            number(fields, "calls_bought")?,
            number(fields, "calls_sold")?,
            number(fields, "puts_bought")?,
            number(fields, "puts_sold")?,
            number(fields, "net_put_bias")?,
        );
        if let (Some(calls_bought), Some(calls_sold), Some(puts_bought), Some(puts_sold), net) = flow {
            snapshot.options_flow = Some(OptionsFlow {
                calls_bought,
                calls_sold,
                puts_bought,
                puts_sold,
                net_put_bias: net.unwrap_or(puts_bought - calls_bought),
            });
        }

        if let Some(curve) = fields.get("skew_curve").filter(|v| !v.is_null()) {
            snapshot.skew_curve = serde_json::from_value(curve.clone())
                .map_err(|e| EngineError::invalid("skew_curve", curve, e.to_string()))?;
        }

        let prices = number_series(fields, "eth_prices")?;
        if !prices.is_empty() {
            snapshot.realized_vol_1d = snapshot.realized_vol_1d.or_else(|| realized_volatility(&prices, 1));
            snapshot.realized_vol_7d = snapshot.realized_vol_7d.or_else(|| realized_volatility(&prices, 7));
            snapshot.realized_vol_30d = snapshot.realized_vol_30d.or_else(|| realized_volatility(&prices, 30));
        }

        Ok(snapshot)
    }

    /// Check the snapshot invariants: positive price, required implied
    /// volatility present, and every volatility figure finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        let spot = self.spot()?;
        if spot <= Decimal::ZERO {
            return Err(EngineError::invalid("eth_price", spot, "must be positive"));
        }
        check_vol("eth_iv_deribit", self.implied_vol()?)?;

        let optional = [
            ("eth_iv_binance", self.implied_vol_alt),
            ("eth_rv_1d", self.realized_vol_1d),
            ("eth_rv_7d", self.realized_vol_7d),
            ("eth_rv_30d", self.realized_vol_30d),
            ("btc_rv_7d", self.reference_rv_7d),
            ("btc_rv_30d", self.reference_rv_30d),
            ("vix", self.vol_index),
            ("move_index", self.bond_vol_index),
        ];
        for (field, value) in optional {
            if let Some(v) = value {
                check_vol(field, v)?;
            }
        }

        for (i, &v) in self.historical_iv.iter().enumerate() {
            check_vol(&format!("historical_iv[{i}]"), v)?;
        }
        for (i, point) in self.skew_curve.iter().enumerate() {
            check_vol(&format!("skew_curve[{i}].iv"), point.iv)?;
            if !point.moneyness.is_finite() || point.moneyness <= 0.0 {
                return Err(EngineError::invalid(
                    format!("skew_curve[{i}].moneyness"),
                    point.moneyness,
                    "must be positive",
                ));
            }
        }

        Ok(())
    }

    /// Spot price, or a missing-input error
    pub fn spot(&self) -> Result<Decimal> {
        self.spot_price
            .ok_or_else(|| EngineError::MissingInput("eth_price".into()))
    }

    /// Primary implied volatility, or a missing-input error
    pub fn implied_vol(&self) -> Result<f64> {
        self.implied_vol
            .ok_or_else(|| EngineError::MissingInput("eth_iv_deribit".into()))
    }
}

fn check_vol(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(EngineError::invalid(field, value, "must be finite"));
    }
    if value < 0.0 {
        return Err(EngineError::invalid(field, value, "must be non-negative"));
    }
    Ok(())
}

fn number(fields: &HashMap<String, serde_json::Value>, key: &str) -> Result<Option<f64>> {
    match fields.get(key) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(value) => value
            .as_f64()
            .map(Some)
            .ok_or_else(|| EngineError::invalid(key, value, "expected a number")),
    }
}

/// Decimal from the JSON number's shortest textual form, so `3614.96`
/// stays `3614.96` instead of picking up binary noise.
fn decimal(fields: &HashMap<String, serde_json::Value>, key: &str) -> Result<Option<Decimal>> {
    match fields.get(key) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Number(n)) => {
            let text = n.to_string();
            Decimal::from_str_exact(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .map(Some)
                .map_err(|e| EngineError::invalid(key, n, e.to_string()))
        }
        Some(other) => Err(EngineError::invalid(key, other, "expected a number")),
    }
}

fn number_series(fields: &HashMap<String, serde_json::Value>, key: &str) -> Result<Vec<f64>> {
    match fields.get(key) {
        None | Some(serde_json::Value::Null) => Ok(Vec::new()),
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .map(|v| {
                v.as_f64()
                    .ok_or_else(|| EngineError::invalid(key, v, "expected an array of numbers"))
            })
            .collect(),
        Some(other) => Err(EngineError::invalid(key, other, "expected an array of numbers")),
    }
}

/// Headline metrics for the current snapshot
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CurrentMetrics {
    pub implied_vol: f64,
    pub realized_vol_30d: Option<f64>,

    /// Implied minus 30d realized; absent when either side is absent
    pub risk_premium: Option<f64>,

    /// 0..1
    pub iv_rank: f64,

    /// 0..1
    pub iv_percentile: f64,
}

/// Everything derived from one snapshot
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MetricsBundle {
    pub timestamp: DateTime<Utc>,
    pub spot_price: Decimal,
    pub current: CurrentMetrics,
    pub skew: SkewMetrics,
    pub regime: RegimeAnalysis,
    pub cross_asset: CrossAssetSignals,
    pub projection: ProjectionSummary,
    pub options_flow: Option<OptionsFlow>,
}

/// Order of a single option leg
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegAction {
    Buy,
    Sell,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leg {
    pub action: LegAction,
    pub option_type: OptionType,
    pub strike: Decimal,
    pub dte: u32,
}

impl Leg {
    pub const fn new(action: LegAction, option_type: OptionType, strike: Decimal, dte: u32) -> Self {
        Self { action, option_type, strike, dte }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionKind {
    ShortPutSpread,
    ShortStraddle,
    CalendarSpread,
    ProtectivePut,
}

impl PositionKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::ShortPutSpread => "Short Put Spread",
            Self::ShortStraddle => "Short Straddle",
            Self::CalendarSpread => "Calendar Spread",
            Self::ProtectivePut => "Protective Put",
        }
    }
}

impl std::fmt::Display for PositionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Priority tier of a candidate position
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    High,
    Medium,
    Low,
    Hedge,
}

impl Priority {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
            Self::Hedge => "HEDGE",
        }
    }
}

/// Structured detail behind a position's display strings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PositionDetails {
    pub legs: Vec<Leg>,
    pub breakevens: Vec<Decimal>,
    pub sizing: String,
    pub rationale: String,
}

/// A rule-triggered trade suggestion
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CandidatePosition {
    pub kind: PositionKind,

    /// What the position is trying to capture
    pub strategy: String,

    /// Human-readable strikes, e.g. "SELL $3398 Put / BUY $3217 Put"
    pub strikes: String,

    pub expiry: String,

    /// Positive for a credit, negative for a debit (USD per contract)
    pub net_credit_debit: Decimal,

    /// `None` for undefined-risk structures
    pub max_risk: Option<Decimal>,

    /// `None` for open-ended payoffs (hedges)
    pub max_profit: Option<Decimal>,

    pub win_probability: Option<f64>,

    pub priority: Priority,

    /// Whether the entry rule fired (unconditional positions are always true)
    pub entry_criteria_met: bool,

    pub details: PositionDetails,
}

/// Full engine output for one snapshot
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Analysis {
    pub metrics: MetricsBundle,
    pub positions: Vec<CandidatePosition>,
    pub assessment: Assessment,
}

impl Analysis {
    /// First position with the given priority, in evaluation order
    pub fn first_with_priority(&self, priority: Priority) -> Option<&CandidatePosition> {
        self.positions.iter().find(|p| p.priority == priority)
    }
}
