//! Volatility Risk Premium and Realized Volatility

const TRADING_DAYS: f64 = 252.0;

/// Implied minus realized volatility.
///
/// Absence on either side propagates; no default is substituted.
pub fn risk_premium(implied: Option<f64>, realized: Option<f64>) -> Option<f64> {
    Some(implied? - realized?)
}

/// Annualized realized volatility (%) of the last `window` daily log returns.
///
/// Uses the population standard deviation. Returns `None` when there are not
/// enough prices, the window is zero, or any price in the window is not positive.
#[allow(clippy::cast_precision_loss)]
pub fn realized_volatility(prices: &[f64], window: usize) -> Option<f64> {
    if window == 0 || prices.len() < window + 1 {
        return None;
    }

    let tail = &prices[prices.len() - window - 1..];
    if tail.iter().any(|&p| !(p > 0.0) || !p.is_finite()) {
        return None;
    }

    let returns: Vec<f64> = tail.windows(2).map(|w| (w[1] / w[0]).ln()).collect();
    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;

    Some(variance.sqrt() * TRADING_DAYS.sqrt() * 100.0)
}
