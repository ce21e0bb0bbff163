//! Narrative Generation
//!
//! Prose commentary on a finished [`Analysis`], produced by an external
//! language model behind the [`Narrator`] trait. Any narrator failure, or a
//! missing narrator, yields a fixed fallback text so callers always get
//! something to show.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{Analysis, CandidatePosition, PositionKind};

pub const MARKET_ANALYSIS_FALLBACK: &str =
    "AI analysis temporarily unavailable. Please refer to quantitative metrics for trading decisions.";
pub const EXECUTIVE_SUMMARY_FALLBACK: &str = "Executive summary temporarily unavailable.";
pub const RISK_ASSESSMENT_FALLBACK: &str =
    "Risk assessment temporarily unavailable. Please apply standard risk management protocols.";
pub const COMMENTARY_FALLBACK: &str = "Commentary temporarily unavailable.";
pub const QUESTION_FALLBACK: &str =
    "I'm unable to process your question at the moment. Please try again later.";

/// A single completion request
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NarrativeRequest {
    pub system: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Language model client trait
#[async_trait]
pub trait Narrator: Send + Sync {
    async fn complete(&self, request: &NarrativeRequest) -> Result<String>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeOrigin {
    Generated,
    Fallback,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Narrative {
    pub text: String,
    pub origin: NarrativeOrigin,
}

impl Narrative {
    fn fallback(text: &str) -> Self {
        Self {
            text: text.to_string(),
            origin: NarrativeOrigin::Fallback,
        }
    }
}

#[derive(Clone, Default)]
pub struct NarrativeService {
    narrator: Option<Arc<dyn Narrator>>,
}

impl NarrativeService {
    pub fn new(narrator: Arc<dyn Narrator>) -> Self {
        Self {
            narrator: Some(narrator),
        }
    }

    /// Service that always answers with fallback texts
    pub const fn disabled() -> Self {
        Self { narrator: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.narrator.is_some()
    }

    pub async fn market_analysis(&self, analysis: &Analysis) -> Narrative {
        let request = NarrativeRequest {
            system: "You are an expert quantitative analyst specializing in cryptocurrency options trading.".into(),
            prompt: market_analysis_prompt(analysis),
            max_tokens: 800,
            temperature: 0.3,
        };
        self.run("market analysis", request, MARKET_ANALYSIS_FALLBACK).await
    }

    pub async fn executive_summary(&self, analysis: &Analysis) -> Narrative {
        let request = NarrativeRequest {
            system: "You are writing an executive summary for institutional cryptocurrency traders.".into(),
            prompt: executive_summary_prompt(analysis),
            max_tokens: 300,
            temperature: 0.3,
        };
        self.run("executive summary", request, EXECUTIVE_SUMMARY_FALLBACK).await
    }

    pub async fn risk_assessment(&self, analysis: &Analysis) -> Narrative {
        let request = NarrativeRequest {
            system: "You are a risk management expert for cryptocurrency derivatives.".into(),
            prompt: risk_assessment_prompt(analysis),
            max_tokens: 600,
            temperature: 0.3,
        };
        self.run("risk assessment", request, RISK_ASSESSMENT_FALLBACK).await
    }

    /// One commentary per candidate position, in evaluation order
    pub async fn position_commentary(&self, analysis: &Analysis) -> Vec<(PositionKind, Narrative)> {
        let mut commentary = Vec::with_capacity(analysis.positions.len());
        for position in &analysis.positions {
            let request = NarrativeRequest {
                system: "You are an expert options trader providing position analysis.".into(),
                prompt: position_prompt(position, analysis),
                max_tokens: 200,
                temperature: 0.3,
            };
            let narrative = self.run("position commentary", request, COMMENTARY_FALLBACK).await;
            commentary.push((position.kind, narrative));
        }
        commentary
    }

    pub async fn answer_question(&self, question: &str, analysis: &Analysis) -> Narrative {
        let request = NarrativeRequest {
            system: "You are an expert cryptocurrency options analyst providing accurate, data-driven answers.".into(),
            prompt: question_prompt(question, analysis),
            max_tokens: 400,
            temperature: 0.3,
        };
        self.run("question", request, QUESTION_FALLBACK).await
    }

    async fn run(&self, task: &str, request: NarrativeRequest, fallback: &str) -> Narrative {
        let Some(narrator) = &self.narrator else {
            tracing::warn!(task, "No narrator configured, using fallback text");
            return Narrative::fallback(fallback);
        };

        match narrator.complete(&request).await {
            Ok(text) => Narrative {
                text,
                origin: NarrativeOrigin::Generated,
            },
            Err(e) => {
                tracing::error!(task, error = %e, "Narrative generation failed");
                Narrative::fallback(fallback)
            }
        }
    }
}

fn pct(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.1}%"))
}

pub fn market_analysis_prompt(analysis: &Analysis) -> String {
    let m = &analysis.metrics;
    let mut prompt = String::new();

    prompt.push_str("Analyze the current ETH options market conditions and provide insights.\n\n");
    prompt.push_str("Current Market Data:\n");
    prompt.push_str(&format!("- ETH Price: ${}\n", m.spot_price));
    prompt.push_str(&format!("- ETH Implied Volatility: {:.1}%\n", m.current.implied_vol));
    prompt.push_str(&format!("- ETH Realized Volatility (30D): {}\n", pct(m.current.realized_vol_30d)));
    prompt.push_str(&format!(
        "- VIX Regime: {}\n",
        m.regime.reference.map_or("N/A", |r| r.as_str())
    ));
    prompt.push_str(&format!(
        "- ETH/BTC 7D RV Ratio: {}\n\n",
        m.cross_asset
            .primary_reference_rv_ratio
            .map_or_else(|| "N/A".to_string(), |r| format!("{r:.2}"))
    ));
    prompt.push_str("Analysis Results:\n");
    prompt.push_str(&format!("- Volatility Risk Premium: {}\n", pct(m.current.risk_premium)));
    prompt.push_str(&format!("- IV Rank: {:.2}\n", m.current.iv_rank));
    prompt.push_str(&format!("- Put-Call Skew: {:.1}%\n", m.skew.put_call_skew));
    prompt.push_str(&format!("- Volatility Regime: {}\n", m.regime.crypto.as_str()));
    prompt.push_str(&format!("- Monte Carlo Expected IV (30D): {:.1}%\n\n", m.projection.mean));
    prompt.push_str(
        "Cover the current regime, key opportunities and risks, cross-asset implications \
         and the forward-looking outlook. Keep it professional and actionable.",
    );
    prompt
}

pub fn executive_summary_prompt(analysis: &Analysis) -> String {
    let m = &analysis.metrics;
    let a = &analysis.assessment;
    let mut prompt = String::new();

    prompt.push_str("Generate a concise executive summary for institutional traders.\n\n");
    prompt.push_str(&format!("Assessment: IV {}\n", a.iv_valuation.as_str()));
    prompt.push_str(&format!("VRP: {}\n", pct(m.current.risk_premium)));
    prompt.push_str(&format!(
        "Top Opportunity: {}\n",
        a.top_opportunity.map_or("None", PositionKind::label)
    ));
    prompt.push_str(&format!("Regime: {}\n\n", a.regime.as_str()));
    prompt.push_str("Forward Outlook:\n");
    prompt.push_str(&format!("- Expected IV (30D): {:.1}%\n", m.projection.mean));
    prompt.push_str(&format!("- 5th Percentile: {:.1}%\n", m.projection.p5));
    prompt.push_str(&format!("- 95th Percentile: {:.1}%\n\n", m.projection.p95));
    prompt.push_str("Answer in 3-4 sentences: assessment, top opportunity, key risks, recommended action.");
    prompt
}

pub fn risk_assessment_prompt(analysis: &Analysis) -> String {
    let m = &analysis.metrics;
    let mut prompt = String::new();

    prompt.push_str("Provide a risk assessment for ETH options trading.\n\n");
    prompt.push_str("Key Metrics:\n");
    prompt.push_str(&format!("- IV Rank: {:.2}\n", m.current.iv_rank));
    prompt.push_str(&format!("- Volatility Risk Premium: {}\n", pct(m.current.risk_premium)));
    prompt.push_str(&format!("- Regime: {}\n", m.regime.crypto.as_str()));
    prompt.push_str(&format!(
        "- Cross-asset divergence: {}\n",
        m.regime.divergence.map_or("N/A", |d| if d { "yes" } else { "no" })
    ));
    prompt.push_str(&format!(
        "- ETH/VIX Ratio: {}\n\n",
        m.cross_asset
            .iv_index_ratio
            .map_or_else(|| "N/A".to_string(), |r| format!("{r:.2}"))
    ));
    prompt.push_str(
        "Assess volatility expansion, liquidity, regime transition, cross-asset contagion \
         and model risk. Give specific risk management recommendations.",
    );
    prompt
}

pub fn position_prompt(position: &CandidatePosition, analysis: &Analysis) -> String {
    let mut prompt = String::new();

    prompt.push_str("Analyze this ETH options position:\n\n");
    prompt.push_str(&format!("Position: {}\n", position.kind));
    prompt.push_str(&format!("Strategy: {}\n", position.strategy));
    prompt.push_str(&format!("Strikes: {}\n", position.strikes));
    prompt.push_str(&format!("Priority: {}\n", position.priority.as_str()));
    prompt.push_str(&format!(
        "Win Probability: {}\n",
        position
            .win_probability
            .map_or_else(|| "N/A".to_string(), |p| format!("{:.0}%", p * 100.0))
    ));
    prompt.push_str(&format!("Entry Criteria Met: {}\n\n", position.entry_criteria_met));
    prompt.push_str(&format!("ETH Price: ${}\n", analysis.metrics.spot_price));
    prompt.push_str(&format!("Current IV: {:.1}%\n\n", analysis.metrics.current.implied_vol));
    prompt.push_str("In 2-3 sentences: why it fits now, key risks, timing.");
    prompt
}

pub fn question_prompt(question: &str, analysis: &Analysis) -> String {
    let m = &analysis.metrics;
    let mut prompt = String::new();

    prompt.push_str("Current ETH Options Market Context:\n");
    prompt.push_str(&format!("- ETH Price: ${}\n", m.spot_price));
    prompt.push_str(&format!("- Implied Volatility: {:.1}%\n", m.current.implied_vol));
    prompt.push_str(&format!("- Realized Volatility: {}\n", pct(m.current.realized_vol_30d)));
    prompt.push_str(&format!("- VRP: {}\n", pct(m.current.risk_premium)));
    prompt.push_str(&format!("- IV Rank: {:.2}\n", m.current.iv_rank));
    prompt.push_str(&format!("- Regime: {}\n\n", m.regime.crypto.as_str()));
    prompt.push_str(&format!("User Question: {question}\n\n"));
    prompt.push_str(
        "Answer from the data above. If the question needs data that is not available, \
         say what would be needed.",
    );
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::engine::VolatilityEngine;
    use crate::error::EngineError;
    use crate::source::DemoSnapshotSource;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Echo {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Narrator for Echo {
        async fn complete(&self, request: &NarrativeRequest) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("{} tokens", request.max_tokens))
        }
    }

    struct Down;

    #[async_trait]
    impl Narrator for Down {
        async fn complete(&self, _request: &NarrativeRequest) -> Result<String> {
            Err(EngineError::Narrator("rate limited".into()))
        }
    }

    fn analysis() -> Analysis {
        let mut config = EngineConfig::default();
        config.projection.paths = 100;
        VolatilityEngine::new(config)
            .analyze(&DemoSnapshotSource::new().snapshot())
            .unwrap()
    }

    #[tokio::test]
    async fn test_generated_text_passes_through() {
        let echo = Arc::new(Echo { calls: AtomicUsize::new(0) });
        let service = NarrativeService::new(echo.clone());
        let analysis = analysis();

        let summary = service.executive_summary(&analysis).await;
        assert_eq!(summary.origin, NarrativeOrigin::Generated);
        assert_eq!(summary.text, "300 tokens");

        let commentary = service.position_commentary(&analysis).await;
        assert_eq!(commentary.len(), analysis.positions.len());
        assert_eq!(echo.calls.load(Ordering::SeqCst), 1 + analysis.positions.len());
    }

    #[tokio::test]
    async fn test_failure_yields_fallback() {
        let service = NarrativeService::new(Arc::new(Down));
        let analysis = analysis();

        let market = service.market_analysis(&analysis).await;
        assert_eq!(market.origin, NarrativeOrigin::Fallback);
        assert_eq!(market.text, MARKET_ANALYSIS_FALLBACK);
        assert_eq!(service.risk_assessment(&analysis).await.text, RISK_ASSESSMENT_FALLBACK);
        assert_eq!(
            service.answer_question("Is IV cheap?", &analysis).await.text,
            QUESTION_FALLBACK
        );
        for (_, narrative) in service.position_commentary(&analysis).await {
            assert_eq!(narrative.text, COMMENTARY_FALLBACK);
        }
    }

    #[tokio::test]
    async fn test_disabled_service_uses_fallbacks() {
        let service = NarrativeService::disabled();
        assert!(!service.is_enabled());
        let summary = service.executive_summary(&analysis()).await;
        assert_eq!(summary, Narrative::fallback(EXECUTIVE_SUMMARY_FALLBACK));
    }

    #[test]
    fn test_prompts_carry_metrics() {
        let analysis = analysis();
        let prompt = market_analysis_prompt(&analysis);
        assert!(prompt.contains("ETH Price: $3614.96"));
        assert!(prompt.contains("Volatility Risk Premium: 6.4%"));
        assert!(prompt.contains("Volatility Regime: medium_vol"));

        let question = question_prompt("Should I sell puts?", &analysis);
        assert!(question.contains("User Question: Should I sell puts?"));

        let summary = executive_summary_prompt(&analysis);
        assert!(summary.contains("Top Opportunity: Short Put Spread"));
    }
}
