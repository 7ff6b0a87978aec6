//! Folds independent per-holding signal results into portfolio-level
//! risk and rebalancing guidance. A failed holding is reported inline
//! and never aborts the rest of the batch.

use serde::{Deserialize, Serialize};
use signal_core::{RiskLevel, SignalAction, SignalResult};

const LOW_RISK_BELOW: f64 = 15.0;
const MEDIUM_RISK_BELOW: f64 = 25.0;

/// Holding count at which breadth stops improving diversification
const FULL_BREADTH_COUNT: f64 = 10.0;

const OVERWEIGHT_PCT: f64 = 20.0;
const UNDERWEIGHT_PCT: f64 = 10.0;
const REDUCE_FACTOR: f64 = 0.7;
const INCREASE_FACTOR: f64 = 1.5;
const ALLOCATION_FLOOR_PCT: f64 = 5.0;
const ALLOCATION_CAP_PCT: f64 = 25.0;

/// One portfolio position: symbol plus its allocation percentage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub symbol: String,
    pub allocation: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    Low,
    #[default]
    Medium,
    High,
}

/// Per-holding outcome: either the computed signal or the error that
/// sank this symbol's pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingReport {
    pub symbol: String,
    pub allocation: f64,
    pub signal: Option<SignalResult>,
    pub error: Option<String>,
}

impl HoldingReport {
    pub fn analyzed(symbol: String, allocation: f64, signal: SignalResult) -> Self {
        Self {
            symbol,
            allocation,
            signal: Some(signal),
            error: None,
        }
    }

    pub fn failed(symbol: String, allocation: f64, error: String) -> Self {
        Self {
            symbol,
            allocation,
            signal: None,
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RebalanceAction {
    Reduce,
    Increase,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebalanceAdvice {
    pub symbol: String,
    pub action: RebalanceAction,
    pub reason: String,
    pub suggested_allocation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioRisk {
    pub total_risk: f64,
    pub risk_level: RiskLevel,
    pub diversification_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketStance {
    Bullish,
    Bearish,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioAnalysis {
    pub holdings: Vec<HoldingReport>,
    pub portfolio_risk: PortfolioRisk,
    pub rebalancing: Vec<RebalanceAdvice>,
    pub overall_recommendation: MarketStance,
    pub risk_tolerance: RiskTolerance,
}

/// Fold per-holding reports into the portfolio view
pub fn aggregate(reports: Vec<HoldingReport>, risk_tolerance: RiskTolerance) -> PortfolioAnalysis {
    PortfolioAnalysis {
        portfolio_risk: portfolio_risk(&reports),
        rebalancing: rebalancing(&reports),
        overall_recommendation: overall_stance(&reports),
        holdings: reports,
        risk_tolerance,
    }
}

/// Allocation-weighted volatility across analyzed holdings;
/// diversification rewards breadth and penalizes concentration.
fn portfolio_risk(reports: &[HoldingReport]) -> PortfolioRisk {
    let total_risk: f64 = reports
        .iter()
        .filter_map(|r| {
            r.signal
                .as_ref()
                .map(|s| s.risk.volatility_pct * r.allocation / 100.0)
        })
        .sum();

    let risk_level = if total_risk < LOW_RISK_BELOW {
        RiskLevel::Low
    } else if total_risk < MEDIUM_RISK_BELOW {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    };

    PortfolioRisk {
        total_risk,
        risk_level,
        diversification_score: diversification_score(reports),
    }
}

fn diversification_score(reports: &[HoldingReport]) -> f64 {
    let max_allocation = reports.iter().map(|r| r.allocation).fold(0.0, f64::max);
    let breadth = reports.len() as f64 / FULL_BREADTH_COUNT;
    (breadth * (1.0 - max_allocation / 100.0)).min(1.0)
}

fn rebalancing(reports: &[HoldingReport]) -> Vec<RebalanceAdvice> {
    let mut advice = Vec::new();

    for report in reports {
        let Some(signal) = &report.signal else {
            continue;
        };
        match signal.signal {
            SignalAction::Sell if report.allocation > OVERWEIGHT_PCT => {
                advice.push(RebalanceAdvice {
                    symbol: report.symbol.clone(),
                    action: RebalanceAction::Reduce,
                    reason: "sell signal on an overweight position".to_string(),
                    suggested_allocation: (report.allocation * REDUCE_FACTOR)
                        .max(ALLOCATION_FLOOR_PCT),
                });
            }
            SignalAction::Buy if report.allocation < UNDERWEIGHT_PCT => {
                advice.push(RebalanceAdvice {
                    symbol: report.symbol.clone(),
                    action: RebalanceAction::Increase,
                    reason: "buy signal on an underweight position".to_string(),
                    suggested_allocation: (report.allocation * INCREASE_FACTOR)
                        .min(ALLOCATION_CAP_PCT),
                });
            }
            _ => {}
        }
    }

    advice
}

fn overall_stance(reports: &[HoldingReport]) -> MarketStance {
    let mut buys = 0;
    let mut sells = 0;
    for report in reports {
        match report.signal.as_ref().map(|s| s.signal) {
            Some(SignalAction::Buy) => buys += 1,
            Some(SignalAction::Sell) => sells += 1,
            _ => {}
        }
    }

    if buys > 2 * sells {
        MarketStance::Bullish
    } else if sells > 2 * buys {
        MarketStance::Bearish
    } else {
        MarketStance::Neutral
    }
}
