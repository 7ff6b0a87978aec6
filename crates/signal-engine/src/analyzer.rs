//! Maps indicator values to directional evidence.
//!
//! The rule table is the single source of truth: every rule is
//! evaluated independently and all matching rules fire. A rule whose
//! inputs are absent simply does not trigger.

use signal_core::{Direction, Evidence, IndicatorSnapshot, Strength};

const OVERSOLD: f64 = 30.0;
const OVERBOUGHT: f64 = 70.0;
const VOLUME_SPIKE_RATIO: f64 = 1.5;
const MOMENTUM_BAND_PCT: f64 = 5.0;

/// Evidence list in rule order plus the aggregate directional weight
#[derive(Debug, Clone)]
pub struct EvidenceSummary {
    pub evidence: Vec<Evidence>,
    pub net_score: f64,
}

struct Rule {
    reason: &'static str,
    direction: Direction,
    strength: Strength,
    weight: f64,
    triggers: fn(&IndicatorSnapshot) -> bool,
}

const RULES: &[Rule] = &[
    Rule {
        reason: "oversold",
        direction: Direction::Bullish,
        strength: Strength::Strong,
        weight: 2.0,
        triggers: |s| s.oscillator.is_some_and(|o| o < OVERSOLD),
    },
    Rule {
        reason: "overbought",
        direction: Direction::Bearish,
        strength: Strength::Strong,
        weight: 2.0,
        triggers: |s| s.oscillator.is_some_and(|o| o > OVERBOUGHT),
    },
    Rule {
        reason: "golden cross configuration",
        direction: Direction::Bullish,
        strength: Strength::Medium,
        weight: 1.0,
        triggers: |s| matches!(
            (s.ma_short, s.ma_medium, s.ma_long),
            (Some(short), Some(medium), Some(long)) if short > medium && medium > long
        ),
    },
    Rule {
        reason: "death cross configuration",
        direction: Direction::Bearish,
        strength: Strength::Medium,
        weight: 1.0,
        triggers: |s| matches!(
            (s.ma_short, s.ma_medium, s.ma_long),
            (Some(short), Some(medium), Some(long)) if short < medium && medium < long
        ),
    },
    Rule {
        reason: "trend above signal",
        direction: Direction::Bullish,
        strength: Strength::Medium,
        weight: 1.0,
        triggers: |s| s.trend.is_some_and(|t| t.value > t.signal),
    },
    Rule {
        reason: "trend below signal",
        direction: Direction::Bearish,
        strength: Strength::Medium,
        weight: 1.0,
        triggers: |s| s.trend.is_some_and(|t| t.value < t.signal),
    },
    Rule {
        reason: "volume spike",
        direction: Direction::Bullish,
        strength: Strength::Weak,
        weight: 0.5,
        triggers: |s| s.volume_ratio > VOLUME_SPIKE_RATIO,
    },
    Rule {
        reason: "positive momentum",
        direction: Direction::Bullish,
        strength: Strength::Weak,
        weight: 0.5,
        triggers: |s| s.momentum.is_some_and(|m| m > MOMENTUM_BAND_PCT),
    },
    Rule {
        reason: "negative momentum",
        direction: Direction::Bearish,
        strength: Strength::Weak,
        weight: 0.5,
        triggers: |s| s.momentum.is_some_and(|m| m < -MOMENTUM_BAND_PCT),
    },
];

/// Run the full rule table against a snapshot
pub fn evaluate(snapshot: &IndicatorSnapshot) -> EvidenceSummary {
    let mut evidence = Vec::new();
    let mut net_score = 0.0;

    for rule in RULES {
        if (rule.triggers)(snapshot) {
            evidence.push(Evidence {
                direction: rule.direction,
                strength: rule.strength,
                reason: rule.reason.to_string(),
            });
            net_score += match rule.direction {
                Direction::Bullish => rule.weight,
                Direction::Bearish => -rule.weight,
            };
        }
    }

    EvidenceSummary {
        evidence,
        net_score,
    }
}
