//! Folds technical evidence, sentiment and risk into one graded
//! recommendation with price targets and a stop-loss. Stateless per
//! call; three terminal labels only.

use signal_core::{
    IndicatorSnapshot, PriceTargets, RiskLevel, RiskProfile, SentimentLabel, SentimentReading,
    SignalAction, SignalResult,
};

use crate::analyzer::EvidenceSummary;

/// Net score beyond which the recommendation leaves `hold`
const ACTION_THRESHOLD: f64 = 2.0;

const BASE_CONFIDENCE: f64 = 0.5;
const CONFIDENCE_PER_POINT: f64 = 0.1;
const MAX_BASE_CONFIDENCE: f64 = 0.9;

const SENTIMENT_BONUS: f64 = 0.1;
const HIGH_RISK_PENALTY: f64 = 0.1;

/// Never fully certain, never exactly zero
const CONFIDENCE_FLOOR: f64 = 0.1;
const CONFIDENCE_CEILING: f64 = 0.95;

/// Net score at which targets use the full volatility range
const NET_SCALE: f64 = 5.0;

const NO_EVIDENCE_REASONING: &str = "no indicator rules triggered";

/// Combine the evidence summary with sentiment and risk into the
/// final per-symbol result.
pub fn synthesize(
    symbol: &str,
    snapshot: IndicatorSnapshot,
    summary: EvidenceSummary,
    risk: RiskProfile,
    sentiment: SentimentReading,
) -> SignalResult {
    let net = summary.net_score;

    let signal = if net > ACTION_THRESHOLD {
        SignalAction::Buy
    } else if net < -ACTION_THRESHOLD {
        SignalAction::Sell
    } else {
        SignalAction::Hold
    };

    let mut confidence = match signal {
        SignalAction::Hold => BASE_CONFIDENCE,
        _ => (BASE_CONFIDENCE + net.abs() * CONFIDENCE_PER_POINT).min(MAX_BASE_CONFIDENCE),
    };

    // Sentiment only reinforces an agreeing directional call
    match (sentiment.label, signal) {
        (SentimentLabel::Positive, SignalAction::Buy)
        | (SentimentLabel::Negative, SignalAction::Sell) => confidence += SENTIMENT_BONUS,
        _ => {}
    }

    if signal == SignalAction::Buy && risk.risk_level == RiskLevel::High {
        confidence -= HIGH_RISK_PENALTY;
    }

    let confidence = confidence.clamp(CONFIDENCE_FLOOR, CONFIDENCE_CEILING);

    let reasoning = if summary.evidence.is_empty() {
        NO_EVIDENCE_REASONING.to_string()
    } else {
        summary
            .evidence
            .iter()
            .map(|e| e.reason.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    };

    let (price_targets, stop_loss) =
        price_targets(snapshot.current_price, risk.volatility_pct, net);

    SignalResult {
        symbol: symbol.to_string(),
        signal,
        confidence,
        reasoning,
        evidence: summary.evidence,
        indicators: snapshot,
        risk,
        sentiment,
        price_targets,
        stop_loss,
    }
}

/// Targets scale with volatility and signal strength; a neutral or
/// low-volatility symbol gets near-flat targets rather than a
/// fabricated move.
fn price_targets(price: f64, volatility_pct: f64, net_score: f64) -> (PriceTargets, f64) {
    let range = price * (volatility_pct / 100.0) * (net_score.abs() / NET_SCALE);

    let targets = PriceTargets {
        conservative: price + 0.5 * range,
        moderate: price + range,
        aggressive: price + 1.5 * range,
    };
    (targets, price - 0.7 * range)
}
