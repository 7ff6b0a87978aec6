use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OHLCV bar data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// News article from the qualitative feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub description: Option<String>,
    pub published_utc: DateTime<Utc>,
    pub tickers: Vec<String>,
}

/// MACD value plus its smoothed signal line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPair {
    pub value: f64,
    pub signal: f64,
}

/// Trailing-window indicator values ending at the last bar.
///
/// A field is `None` when the series is shorter than that indicator's
/// window; the volume ratio is always present (1.0 when the averaging
/// window is degenerate).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub ma_short: Option<f64>,
    pub ma_medium: Option<f64>,
    pub ma_long: Option<f64>,
    pub oscillator: Option<f64>,
    pub trend: Option<TrendPair>,
    pub volume_ratio: f64,
    pub momentum: Option<f64>,
    pub current_price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Bullish,
    Bearish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    Weak,
    Medium,
    Strong,
}

/// One piece of directional evidence emitted by a triggered rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub direction: Direction,
    pub strength: Strength,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Volatility and market-sensitivity profile of one symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskProfile {
    pub volatility_pct: f64,
    pub beta: f64,
    pub sharpe_ratio: f64,
    pub risk_level: RiskLevel,
    pub max_drawdown_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

/// Bounded sentiment estimate; `score` in [-1, 1], `confidence` in [0, 1]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentReading {
    pub score: f64,
    pub label: SentimentLabel,
    pub confidence: f64,
}

impl SentimentReading {
    /// The documented default substituted when the qualitative feed fails
    pub fn neutral() -> Self {
        Self {
            score: 0.0,
            label: SentimentLabel::Neutral,
            confidence: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalAction {
    Buy,
    Hold,
    Sell,
}

impl SignalAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalAction::Buy => "buy",
            SignalAction::Hold => "hold",
            SignalAction::Sell => "sell",
        }
    }
}

/// Upside targets scaled by volatility and signal strength
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTargets {
    pub conservative: f64,
    pub moderate: f64,
    pub aggressive: f64,
}

/// Full per-symbol recommendation.
///
/// Recomputed on every request and never persisted by the engine;
/// identical inputs yield identical output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalResult {
    pub symbol: String,
    pub signal: SignalAction,
    pub confidence: f64,
    pub reasoning: String,
    pub evidence: Vec<Evidence>,
    pub indicators: IndicatorSnapshot,
    pub risk: RiskProfile,
    pub sentiment: SentimentReading,
    pub price_targets: PriceTargets,
    pub stop_loss: f64,
}
