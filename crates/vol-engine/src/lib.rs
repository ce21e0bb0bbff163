//! # vol-engine
//!
//! Crypto options volatility metrics: IV rank and percentile, volatility risk
//! premium, regime classification, a mean-reverting Monte Carlo projection of
//! implied volatility and rule-based candidate positions.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────────┐     ┌──────────────────────────────────────────┐
//! │  SnapshotSource  │────►│  VolatilityEngine::analyze               │
//! │  (demo, file,    │     │   ├─ rank / percentile   (history)       │
//! │   live adapters) │     │   ├─ risk premium        (IV − RV 30d)   │
//! └──────────────────┘     │   ├─ skew                (strike curve)  │
//!                          │   ├─ regime + cross-asset (VIX, BTC RV)  │
//!                          │   ├─ forward projection  (seeded MC)     │
//!                          │   └─ position rules ──► assessment       │
//!                          └───────────────┬──────────────────────────┘
//!                                          │ Analysis
//!                     ┌────────────────────┼──────────────────┐
//!                     ▼                    ▼                  ▼
//!               AnalysisStore       NarrativeService     render_report
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use vol_engine::{EngineConfig, VolatilityEngine};
//! use vol_engine::source::DemoSnapshotSource;
//!
//! let engine = VolatilityEngine::new(EngineConfig::default());
//! let analysis = engine.analyze(&DemoSnapshotSource::new().snapshot())?;
//! println!("{}", vol_engine::render_report(&analysis));
//! # Ok::<(), vol_engine::EngineError>(())
//! ```

pub mod analytics;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod narrative;
pub mod report;
pub mod source;
pub mod store;
pub mod strategy;

pub use config::EngineConfig;
pub use engine::VolatilityEngine;
pub use error::{EngineError, Result};
pub use model::{Analysis, CandidatePosition, MarketSnapshot, MetricsBundle, PositionKind, Priority};
pub use report::render_report;
