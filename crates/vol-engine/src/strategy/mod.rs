//! Trading Strategy Rules
//!
//! Rule-based candidate positions and the headline assessment built on them.

mod assessment;
mod positions;

pub use assessment::{Assessment, Confidence, IvValuation, PremiumAssessment, assess, top_opportunity};
pub use positions::{PositionEvaluator, RuleInputs};
