//! IV Rank and IV Percentile

use crate::config::RankConfig;

/// Position of `current` within the historical min-max range, clamped to [0, 1].
///
/// With fewer than two historical points the configured fallback range is used.
/// A degenerate range (all values equal) yields the neutral 0.5.
pub fn iv_rank(current: f64, history: &[f64], config: &RankConfig) -> f64 {
    let (min, max) = if history.len() < 2 {
        (config.fallback_min, config.fallback_max)
    } else {
        history.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
    };

    if max == min {
        return 0.5;
    }

    ((current - min) / (max - min)).clamp(0.0, 1.0)
}

/// Fraction of historical observations at or below `current`; 0.5 on empty history.
#[allow(clippy::cast_precision_loss)]
pub fn iv_percentile(current: f64, history: &[f64]) -> f64 {
    if history.is_empty() {
        return 0.5;
    }
    let at_or_below = history.iter().filter(|&&v| v <= current).count();
    at_or_below as f64 / history.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    const HISTORY: [f64; 10] = [45.0, 50.0, 55.0, 60.0, 65.0, 70.0, 75.0, 80.0, 85.0, 90.0];

    #[test]
    fn test_rank_endpoints() {
        let config = RankConfig::default();
        assert_eq!(iv_rank(45.0, &HISTORY, &config), 0.0);
        assert_eq!(iv_rank(90.0, &HISTORY, &config), 1.0);
        assert!((iv_rank(65.4, &HISTORY, &config) - 20.4 / 45.0).abs() < 1e-12);
    }

    #[test]
    fn test_rank_endpoints_any_order() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let config = RankConfig::default();
        let mut series: Vec<Vec<f64>> = vec![
            vec![90.0, 45.0],
            vec![61.0, 43.0, 88.0, 52.5, 52.5, 70.0],
            vec![120.5, 12.0, 12.0, 64.0, 120.5],
            vec![0.0, 3.25],
        ];
        let mut rng = StdRng::seed_from_u64(11);
        for len in [2, 5, 30, 250] {
            series.push((0..len).map(|_| rng.random_range(10.0..150.0)).collect());
        }

        for history in &series {
            let min = history.iter().copied().fold(f64::INFINITY, f64::min);
            let max = history.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            assert!(min < max);
            assert_eq!(iv_rank(min, history, &config), 0.0, "min of {history:?}");
            assert_eq!(iv_rank(max, history, &config), 1.0, "max of {history:?}");
        }
    }

    #[test]
    fn test_rank_is_clamped() {
        let config = RankConfig::default();
        for current in [-10.0, 0.0, 30.0, 44.9, 90.1, 200.0] {
            let rank = iv_rank(current, &HISTORY, &config);
            assert!((0.0..=1.0).contains(&rank), "rank {rank} for {current}");
        }
        assert_eq!(iv_rank(10.0, &HISTORY, &config), 0.0);
        assert_eq!(iv_rank(150.0, &HISTORY, &config), 1.0);
    }

    #[test]
    fn test_rank_flat_history_is_neutral() {
        let config = RankConfig::default();
        assert_eq!(iv_rank(10.0, &[60.0, 60.0, 60.0], &config), 0.5);
        assert_eq!(iv_rank(99.0, &[60.0, 60.0], &config), 0.5);
    }

    #[test]
    fn test_rank_short_history_uses_fallback_range() {
        let config = RankConfig::default();
        // (65.4 - 30) / (120 - 30)
        let expected = 35.4 / 90.0;
        assert!((iv_rank(65.4, &[], &config) - expected).abs() < 1e-12);
        assert!((iv_rank(65.4, &[80.0], &config) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_percentile_basics() {
        assert_eq!(iv_percentile(65.4, &[]), 0.5);
        assert_eq!(iv_percentile(65.4, &HISTORY), 0.5);
        assert_eq!(iv_percentile(65.0, &HISTORY), 0.5);
        assert_eq!(iv_percentile(40.0, &HISTORY), 0.0);
        assert_eq!(iv_percentile(95.0, &HISTORY), 1.0);
    }

    #[test]
    fn test_percentile_monotonic() {
        let history = [70.0, 52.5, 52.5, 61.0, 88.0, 43.0, 61.0];
        let mut previous = 0.0;
        for step in 0..=200 {
            let x = 30.0 + f64::from(step) * 0.35;
            let p = iv_percentile(x, &history);
            assert!(p >= previous, "percentile dropped at {x}");
            assert!((0.0..=1.0).contains(&p));
            previous = p;
        }
    }
}
