//! Plain-text Report Rendering

use crate::model::{Analysis, CandidatePosition};

fn opt_pct(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.1}%"))
}

fn opt_ratio(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}x"))
}

/// Render an analysis as a terminal report
pub fn render_report(analysis: &Analysis) -> String {
    let m = &analysis.metrics;
    let a = &analysis.assessment;
    let mut output = String::new();

    output.push_str("ETH VOLATILITY ANALYSIS\n");
    output.push_str(&format!("{}\n", m.timestamp.format("%Y-%m-%d %H:%M UTC")));
    output.push_str("═".repeat(50).as_str());

    output.push_str("\nCURRENT METRICS\n");
    output.push_str(&format!("  Spot Price:       ${}\n", m.spot_price.round_dp(2)));
    output.push_str(&format!("  Implied Vol:      {:.1}%\n", m.current.implied_vol));
    output.push_str(&format!("  Realized Vol 30d: {}\n", opt_pct(m.current.realized_vol_30d)));
    output.push_str(&format!("  Risk Premium:     {}\n", opt_pct(m.current.risk_premium)));
    output.push_str(&format!("  IV Rank:          {:.2}\n", m.current.iv_rank));
    output.push_str(&format!("  IV Percentile:    {:.2}\n", m.current.iv_percentile));

    output.push_str("\nSKEW\n");
    output.push_str(&format!("  Put-Call Skew:    {:.1}%\n", m.skew.put_call_skew));
    output.push_str(&format!("  ATM Skew:         {:.1}%\n", m.skew.atm_skew));
    output.push_str(&format!("  Smile Curvature:  {:.1}\n", m.skew.smile_curvature));
    if m.skew.source == crate::analytics::SkewSource::Placeholder {
        output.push_str("  (placeholder values, no strike curve supplied)\n");
    }

    output.push_str("\nREGIME\n");
    output.push_str(&format!("  Crypto:           {}\n", m.regime.crypto.as_str()));
    output.push_str(&format!(
        "  VIX:              {}\n",
        m.regime.reference.map_or("n/a", |r| r.as_str())
    ));
    if m.regime.divergence == Some(true) {
        output.push_str("  ⚠️  Crypto and traditional regimes diverge\n");
    }
    output.push_str(&format!(
        "  ETH/BTC RV 7d:    {}\n",
        opt_ratio(m.cross_asset.primary_reference_rv_ratio)
    ));
    output.push_str(&format!(
        "  ETH IV / VIX:     {}\n",
        opt_ratio(m.cross_asset.iv_index_ratio)
    ));

    let p = &m.projection;
    output.push_str(&format!("\n{}-DAY IV PROJECTION ({} paths)\n", p.days, p.paths));
    output.push_str(&format!("  Mean:             {:.1}% (± {:.1})\n", p.mean, p.std_dev));
    output.push_str(&format!(
        "  5th / 50th / 95th: {:.1}% / {:.1}% / {:.1}%\n",
        p.p5, p.median, p.p95
    ));

    output.push('\n');
    output.push_str("═".repeat(50).as_str());
    output.push_str("\nCANDIDATE POSITIONS\n");
    for position in &analysis.positions {
        output.push_str(&render_position(position));
    }

    output.push('\n');
    output.push_str("═".repeat(50).as_str());
    output.push_str("\n📊 ASSESSMENT:\n");
    output.push_str(&format!("  Implied Vol:      {}\n", a.iv_valuation.as_str()));
    output.push_str(&format!("  Risk Premium:     {}\n", a.risk_premium.as_str()));
    output.push_str(&format!("  Regime:           {}\n", a.regime.as_str()));
    output.push_str(&format!(
        "  Top Opportunity:  {}\n",
        a.top_opportunity.map_or_else(|| "none".to_string(), |k| k.to_string())
    ));
    output.push_str(&format!("  Confidence:       {}\n", a.confidence.as_str()));

    output
}

fn render_position(position: &CandidatePosition) -> String {
    let mut output = String::new();
    let marker = if position.entry_criteria_met { "✓" } else { "○" };

    output.push_str(&format!(
        "\n{marker} [{}] {}\n",
        position.priority.as_str(),
        position.kind
    ));
    output.push_str(&format!("  {}\n", position.strategy));
    output.push_str(&format!("  Strikes:  {}\n", position.strikes));
    output.push_str(&format!("  Expiry:   {}\n", position.expiry));
    output.push_str(&format!("  Net:      ${}\n", position.net_credit_debit));
    if let Some(risk) = position.max_risk {
        output.push_str(&format!("  Max Risk: ${risk}\n"));
    } else {
        output.push_str("  Max Risk: undefined\n");
    }
    if let Some(win) = position.win_probability {
        output.push_str(&format!("  Win Prob: {:.0}%\n", win * 100.0));
    }
    output.push_str(&format!("  Sizing:   {}\n", position.details.sizing));
    output.push_str(&format!("  Why:      {}\n", position.details.rationale));
    output
}
