//! Candidate Position Rules
//!
//! Each rule is evaluated independently and in a fixed order: short put
//! spread, short straddle, calendar spread, protective put. The last two are
//! suggested unconditionally.

use rust_decimal::Decimal;

use crate::config::PositionRules;
use crate::model::{
    CandidatePosition, Leg, LegAction, MetricsBundle, OptionType, PositionDetails, PositionKind,
    Priority,
};

/// The subset of metrics the position rules read
#[derive(Clone, Copy, Debug)]
pub struct RuleInputs {
    pub spot: Decimal,
    pub implied_vol: f64,
    pub risk_premium: Option<f64>,
    pub put_call_skew: f64,
    pub iv_rank: f64,
}

impl From<&MetricsBundle> for RuleInputs {
    fn from(metrics: &MetricsBundle) -> Self {
        Self {
            spot: metrics.spot_price,
            implied_vol: metrics.current.implied_vol,
            risk_premium: metrics.current.risk_premium,
            put_call_skew: metrics.skew.put_call_skew,
            iv_rank: metrics.current.iv_rank,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PositionEvaluator {
    rules: PositionRules,
}

impl PositionEvaluator {
    pub const fn new(rules: PositionRules) -> Self {
        Self { rules }
    }

    pub fn evaluate(&self, metrics: &MetricsBundle) -> Vec<CandidatePosition> {
        self.evaluate_inputs(&RuleInputs::from(metrics))
    }

    /// Run every rule against `inputs`, in priority order
    pub fn evaluate_inputs(&self, inputs: &RuleInputs) -> Vec<CandidatePosition> {
        let mut positions = Vec::with_capacity(4);

        if let Some(spread) = self.put_spread(inputs) {
            positions.push(spread);
        }
        if let Some(straddle) = self.straddle(inputs) {
            positions.push(straddle);
        }
        positions.push(self.calendar(inputs));
        positions.push(self.protective_put(inputs));

        tracing::debug!(
            count = positions.len(),
            premium = ?inputs.risk_premium,
            rank = inputs.iv_rank,
            "Evaluated position rules"
        );

        positions
    }

    fn put_spread(&self, inputs: &RuleInputs) -> Option<CandidatePosition> {
        let rule = &self.rules.put_spread;
        let premium = inputs.risk_premium?;
        if !(premium > rule.min_premium
            && inputs.put_call_skew > rule.min_skew
            && inputs.iv_rank > rule.min_rank)
        {
            return None;
        }

        let sell = inputs.spot * rule.sell_strike_factor;
        let buy = inputs.spot * rule.buy_strike_factor;

        Some(CandidatePosition {
            kind: PositionKind::ShortPutSpread,
            strategy: "Monetize elevated put skew and positive VRP".into(),
            strikes: format!("SELL ${} Put / BUY ${} Put", usd(sell), usd(buy)),
            expiry: format!("{} DTE", rule.dte),
            net_credit_debit: rule.credit,
            max_risk: Some(rule.max_risk),
            max_profit: Some(rule.credit),
            win_probability: Some(rule.win_probability),
            priority: Priority::High,
            entry_criteria_met: true,
            details: PositionDetails {
                legs: vec![
                    Leg::new(LegAction::Sell, OptionType::Put, sell, rule.dte),
                    Leg::new(LegAction::Buy, OptionType::Put, buy, rule.dte),
                ],
                breakevens: vec![sell - rule.credit],
                sizing: "10-30 spreads".into(),
                rationale: format!(
                    "VRP: {premium:.1}%, Skew: {:.1}%, IVR: {:.2}",
                    inputs.put_call_skew, inputs.iv_rank
                ),
            },
        })
    }

    fn straddle(&self, inputs: &RuleInputs) -> Option<CandidatePosition> {
        let rule = &self.rules.straddle;
        let premium = inputs.risk_premium?;
        if !(premium > rule.min_premium && inputs.iv_rank > rule.min_rank) {
            return None;
        }

        let strike = inputs.spot;
        Some(CandidatePosition {
            kind: PositionKind::ShortStraddle,
            strategy: "Capture volatility risk premium with delta-neutral exposure".into(),
            strikes: format!("SELL ${} Call & Put", usd(strike)),
            expiry: format!("{} DTE", rule.dte),
            net_credit_debit: rule.credit,
            max_risk: None,
            max_profit: Some(rule.credit),
            win_probability: Some(rule.win_probability),
            priority: Priority::Medium,
            entry_criteria_met: inputs.implied_vol > rule.entry_min_iv,
            details: PositionDetails {
                legs: vec![
                    Leg::new(LegAction::Sell, OptionType::Call, strike, rule.dte),
                    Leg::new(LegAction::Sell, OptionType::Put, strike, rule.dte),
                ],
                breakevens: vec![strike - rule.credit, strike + rule.credit],
                sizing: "1-5 straddles".into(),
                rationale: format!("VRP: {premium:.1}%, IV: {:.1}%", inputs.implied_vol),
            },
        })
    }

    fn calendar(&self, inputs: &RuleInputs) -> CandidatePosition {
        let rule = &self.rules.calendar;
        let strike = inputs.spot;

        CandidatePosition {
            kind: PositionKind::CalendarSpread,
            strategy: "Exploit term structure backwardation".into(),
            strikes: format!(
                "SELL {} DTE / BUY {} DTE ${} Call",
                rule.near_dte,
                rule.far_dte,
                usd(strike)
            ),
            expiry: format!("{}/{} DTE", rule.near_dte, rule.far_dte),
            net_credit_debit: -rule.debit,
            max_risk: Some(rule.debit),
            max_profit: Some(rule.max_profit),
            win_probability: Some(rule.win_probability),
            priority: Priority::Low,
            entry_criteria_met: true,
            details: PositionDetails {
                legs: vec![
                    Leg::new(LegAction::Sell, OptionType::Call, strike, rule.near_dte),
                    Leg::new(LegAction::Buy, OptionType::Call, strike, rule.far_dte),
                ],
                breakevens: Vec::new(),
                sizing: "5-25 calendars".into(),
                rationale: "Term structure backwardation".into(),
            },
        }
    }

    fn protective_put(&self, inputs: &RuleInputs) -> CandidatePosition {
        let rule = &self.rules.hedge;
        let strike = inputs.spot * rule.strike_factor;
        let protection = ((Decimal::ONE - rule.strike_factor) * Decimal::ONE_HUNDRED).normalize();

        CandidatePosition {
            kind: PositionKind::ProtectivePut,
            strategy: "Portfolio protection given bearish options flow".into(),
            strikes: format!("BUY ${} Put", usd(strike)),
            expiry: format!("{} DTE", rule.dte),
            net_credit_debit: -rule.debit,
            max_risk: Some(rule.debit),
            max_profit: None,
            win_probability: None,
            priority: Priority::Hedge,
            entry_criteria_met: true,
            details: PositionDetails {
                legs: vec![Leg::new(LegAction::Buy, OptionType::Put, strike, rule.dte)],
                breakevens: vec![strike - rule.debit],
                sizing: "1 put per 1 ETH held".into(),
                rationale: format!(
                    "Bearish options flow protection, {protection}% below current price"
                ),
            },
        }
    }
}

/// Whole-dollar rendering for display strings
fn usd(value: Decimal) -> Decimal {
    value.round_dp(0)
}
