use clap::Parser;
use std::path::PathBuf;

/// ETH volatility report: IV rank, risk premium, regime, forward IV
/// projection and candidate option positions.
#[derive(Parser, Debug)]
#[command(name = "vol-report", version, about)]
pub struct Cli {
    /// Snapshot JSON file (collector field names); the demo snapshot is used when omitted
    #[arg(long, short = 's')]
    pub snapshot: Option<PathBuf>,

    /// Fall back to the demo snapshot if the file cannot be read
    #[arg(long, requires = "snapshot")]
    pub fallback_demo: bool,

    /// Random seed for the IV projection (overrides VOL_SEED)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of simulated paths (overrides VOL_PATHS)
    #[arg(long)]
    pub paths: Option<usize>,

    /// Projection horizon in days (overrides VOL_DAYS)
    #[arg(long)]
    pub days: Option<usize>,

    /// Print the full analysis as JSON instead of the text report
    #[arg(long)]
    pub json: bool,
}
