//! Forward Implied-Volatility Projection
//!
//! Monte Carlo simulation of a discretised mean-reverting process:
//!
//! ```text
//! iv[t+1] = clamp(iv[t] + κ·(θ − iv[t])·dt + σ·√dt·Z, floor, ceiling)
//! ```
//!
//! κ = mean-reversion speed, θ = long-term mean, σ = vol-of-vol, Z ~ N(0, 1).
//! A single generator drives every path in order (path by path, day by day),
//! so a fixed seed reproduces the batch bit for bit.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};

use crate::config::ProjectionParams;
use crate::error::{EngineError, Result};

/// Terminal distribution of the simulated implied volatility
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub mean: f64,

    /// Population standard deviation
    pub std_dev: f64,

    pub p5: f64,
    pub median: f64,
    pub p95: f64,

    pub paths: usize,
    pub days: usize,

    /// Leading terminal values in simulation order, capped for display
    pub sample: Vec<f64>,
}

#[derive(Clone, Debug, Default)]
pub struct ForwardProjector {
    params: ProjectionParams,
}

impl ForwardProjector {
    pub const fn new(params: ProjectionParams) -> Self {
        Self { params }
    }

    pub const fn params(&self) -> &ProjectionParams {
        &self.params
    }

    /// Advance one day given a standard normal draw
    pub fn step(&self, iv: f64, z: f64) -> f64 {
        let p = &self.params;
        let drift = p.mean_reversion_speed * (p.long_term_mean - iv) * p.dt;
        let shock = p.vol_of_vol * p.dt.sqrt() * z;
        (iv + drift + shock).clamp(p.floor, p.ceiling)
    }

    /// Daily values of one path (excluding the start), drawing from `rng`
    /// exactly as a batch path would.
    pub fn trace_path<R: Rng + ?Sized>(&self, start: f64, days: usize, rng: &mut R) -> Vec<f64> {
        let mut iv = start;
        (0..days)
            .map(|_| {
                let z: f64 = StandardNormal.sample(rng);
                iv = self.step(iv, z);
                iv
            })
            .collect()
    }

    /// Run the configured batch with a generator seeded from the configured seed
    pub fn project_seeded(&self, current_iv: f64) -> Result<ProjectionSummary> {
        let mut rng = StdRng::seed_from_u64(self.params.seed);
        self.project(current_iv, &mut rng)
    }

    /// Run the configured batch (`paths` × `days`) with the caller's generator
    pub fn project<R: Rng + ?Sized>(&self, current_iv: f64, rng: &mut R) -> Result<ProjectionSummary> {
        self.project_with(current_iv, self.params.paths, self.params.days, rng)
    }

    /// Simulate `paths` independent paths of `days` steps from `current_iv`.
    ///
    /// `days == 0` returns `current_iv` as a single-point distribution without
    /// touching the generator.
    #[allow(clippy::cast_precision_loss)]
    pub fn project_with<R: Rng + ?Sized>(
        &self,
        current_iv: f64,
        paths: usize,
        days: usize,
        rng: &mut R,
    ) -> Result<ProjectionSummary> {
        if paths == 0 {
            return Err(EngineError::InvalidParameter(
                "projection needs at least one path".into(),
            ));
        }
        if !current_iv.is_finite() || current_iv < 0.0 {
            return Err(EngineError::invalid(
                "implied_vol",
                current_iv,
                "must be finite and non-negative",
            ));
        }
        if !(self.params.floor <= self.params.ceiling) {
            return Err(EngineError::InvalidParameter(format!(
                "floor {} above ceiling {}",
                self.params.floor, self.params.ceiling
            )));
        }
        let p = &self.params;
        let process = [
            ("mean_reversion_speed", p.mean_reversion_speed),
            ("long_term_mean", p.long_term_mean),
            ("vol_of_vol", p.vol_of_vol),
            ("dt", p.dt),
        ];
        for (name, value) in process {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::InvalidParameter(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }

        if days == 0 {
            return Ok(ProjectionSummary {
                mean: current_iv,
                std_dev: 0.0,
                p5: current_iv,
                median: current_iv,
                p95: current_iv,
                paths,
                days,
                sample: vec![current_iv],
            });
        }

        let mut terminal = Vec::with_capacity(paths);
        for _ in 0..paths {
            let mut iv = current_iv;
            for _ in 0..days {
                let z: f64 = StandardNormal.sample(rng);
                iv = self.step(iv, z);
            }
            terminal.push(iv);
        }

        let n = terminal.len() as f64;
        let mean = terminal.iter().sum::<f64>() / n;
        let variance = terminal.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let sample = terminal.iter().take(self.params.sample_cap).copied().collect();

        terminal.sort_by(f64::total_cmp);
        let summary = ProjectionSummary {
            mean,
            std_dev: variance.sqrt(),
            p5: percentile_linear(&terminal, 5.0),
            median: percentile_linear(&terminal, 50.0),
            p95: percentile_linear(&terminal, 95.0),
            paths,
            days,
            sample,
        };

        tracing::debug!(
            paths,
            days,
            mean = summary.mean,
            p5 = summary.p5,
            p95 = summary.p95,
            "Forward IV projection complete"
        );

        Ok(summary)
    }
}

/// Percentile `q` (0..=100) of ascending `sorted` values, linearly
/// interpolated between closest ranks. `NaN` for an empty slice.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn percentile_linear(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let rank = (q.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}
