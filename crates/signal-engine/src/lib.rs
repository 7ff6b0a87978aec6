pub mod analyzer;
pub mod synthesizer;

pub use analyzer::{evaluate, EvidenceSummary};
pub use synthesizer::synthesize;

use risk_metrics::{RiskAssessor, DEFAULT_RISK_FREE_RATE};
use signal_core::{Bar, EngineError, SentimentReading, SignalResult};
use technical_indicators::compute_snapshot;

/// Engine tunables; defaults match the documented constants, with an
/// environment override for the risk-free rate.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Annual risk-free rate used by the Sharpe ratio
    pub risk_free_rate: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let risk_free_rate = std::env::var("STOCKPULSE_RISK_FREE_RATE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_RISK_FREE_RATE);
        Self { risk_free_rate }
    }
}

/// The trading signal synthesis engine.
///
/// Pure with respect to its inputs: identical bar and sentiment input
/// yields identical output, with no clock-dependent state.
pub struct SignalEngine {
    config: EngineConfig,
}

impl SignalEngine {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Compute one symbol's signal without a benchmark series; beta
    /// uses the documented fallback constant.
    pub fn compute_signal(
        &self,
        symbol: &str,
        bars: &[Bar],
        sentiment: SentimentReading,
    ) -> Result<SignalResult, EngineError> {
        self.compute_signal_with_benchmark(symbol, bars, None, sentiment)
    }

    /// Compute one symbol's signal, correlating against a benchmark
    /// series for beta when one is supplied.
    pub fn compute_signal_with_benchmark(
        &self,
        symbol: &str,
        bars: &[Bar],
        benchmark: Option<&[Bar]>,
        sentiment: SentimentReading,
    ) -> Result<SignalResult, EngineError> {
        let snapshot = compute_snapshot(bars)?;
        let risk = RiskAssessor::new(self.config.risk_free_rate).assess(bars, benchmark)?;
        let summary = analyzer::evaluate(&snapshot);
        Ok(synthesizer::synthesize(
            symbol, snapshot, summary, risk, sentiment,
        ))
    }
}

impl Default for SignalEngine {
    fn default() -> Self {
        Self::new()
    }
}
