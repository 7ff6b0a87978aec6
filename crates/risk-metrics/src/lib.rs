use signal_core::{Bar, EngineError, RiskLevel, RiskProfile};
use statrs::statistics::Statistics;

/// Trading days per year, used for annualization
pub const TRADING_DAYS: f64 = 252.0;

/// Documented stand-in used when no benchmark series is supplied.
/// Risk output is never randomized.
pub const FALLBACK_BETA: f64 = 1.0;

pub const DEFAULT_RISK_FREE_RATE: f64 = 0.02;

const LOW_RISK_THRESHOLD: f64 = 0.15;
const MEDIUM_RISK_THRESHOLD: f64 = 0.25;

/// Derives the volatility, beta, Sharpe ratio and drawdown profile of
/// a bar series.
pub struct RiskAssessor {
    risk_free_rate: f64,
}

impl RiskAssessor {
    pub fn new(risk_free_rate: f64) -> Self {
        Self { risk_free_rate }
    }

    /// Assess one symbol's series, optionally against a benchmark
    /// series for beta. Without a benchmark, beta is the documented
    /// [`FALLBACK_BETA`] constant.
    pub fn assess(
        &self,
        bars: &[Bar],
        benchmark: Option<&[Bar]>,
    ) -> Result<RiskProfile, EngineError> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let returns = daily_returns(&closes)?;
        if returns.len() < 2 {
            return Err(EngineError::InsufficientData(
                "need at least 3 bars to estimate volatility".to_string(),
            ));
        }

        // Annualized, as a decimal; the profile reports a percentage
        let volatility = returns.as_slice().std_dev() * TRADING_DAYS.sqrt();

        let beta = match benchmark {
            Some(bench_bars) => {
                let bench_closes: Vec<f64> = bench_bars.iter().map(|b| b.close).collect();
                beta_vs_benchmark(&returns, &daily_returns(&bench_closes)?)
            }
            None => FALLBACK_BETA,
        };

        let annualized_return = returns.as_slice().mean() * TRADING_DAYS;
        let sharpe_ratio = if volatility == 0.0 {
            0.0
        } else {
            (annualized_return - self.risk_free_rate) / volatility
        };

        Ok(RiskProfile {
            volatility_pct: volatility * 100.0,
            beta,
            sharpe_ratio,
            risk_level: risk_level(volatility, beta),
            max_drawdown_pct: max_drawdown(&closes),
        })
    }
}

impl Default for RiskAssessor {
    fn default() -> Self {
        Self::new(DEFAULT_RISK_FREE_RATE)
    }
}

/// Simple percent change between consecutive closes
pub fn daily_returns(closes: &[f64]) -> Result<Vec<f64>, EngineError> {
    let mut returns = Vec::with_capacity(closes.len().saturating_sub(1));
    for w in closes.windows(2) {
        if !w[0].is_finite() || w[0] <= 0.0 {
            return Err(EngineError::InvalidData(
                "non-positive or non-finite close in return series".to_string(),
            ));
        }
        returns.push((w[1] - w[0]) / w[0]);
    }
    Ok(returns)
}

/// Beta as covariance(stock, benchmark) / variance(benchmark) over
/// the overlapping tail of the two return series.
pub fn beta_vs_benchmark(stock_returns: &[f64], benchmark_returns: &[f64]) -> f64 {
    let n = stock_returns.len().min(benchmark_returns.len());
    if n < 2 {
        return FALLBACK_BETA;
    }

    let stock = &stock_returns[stock_returns.len() - n..];
    let bench = &benchmark_returns[benchmark_returns.len() - n..];

    let stock_mean = stock.iter().sum::<f64>() / n as f64;
    let bench_mean = bench.iter().sum::<f64>() / n as f64;

    let mut covariance = 0.0;
    let mut bench_variance = 0.0;
    for i in 0..n {
        let stock_diff = stock[i] - stock_mean;
        let bench_diff = bench[i] - bench_mean;
        covariance += stock_diff * bench_diff;
        bench_variance += bench_diff * bench_diff;
    }

    if bench_variance == 0.0 {
        FALLBACK_BETA
    } else {
        covariance / bench_variance
    }
}

/// Risk grade on the combined volatility × beta score, with
/// volatility as a decimal (not a percentage).
pub fn risk_level(volatility: f64, beta: f64) -> RiskLevel {
    let risk_score = volatility * beta;
    if risk_score < LOW_RISK_THRESHOLD {
        RiskLevel::Low
    } else if risk_score < MEDIUM_RISK_THRESHOLD {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

/// Largest peak-to-trough percentage decline, one forward scan
/// tracking the running peak.
pub fn max_drawdown(prices: &[f64]) -> f64 {
    if prices.is_empty() {
        return 0.0;
    }

    let mut peak = prices[0];
    let mut max_dd = 0.0;
    for &price in prices {
        if price > peak {
            peak = price;
        }
        let drawdown = (peak - price) / peak;
        if drawdown > max_dd {
            max_dd = drawdown;
        }
    }
    max_dd * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                timestamp: start + Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1_000_000.0,
            })
            .collect()
    }

    #[test]
    fn flat_series_has_zero_volatility() {
        let bars = bars_from_closes(&vec![100.0; 60]);
        let profile = RiskAssessor::default().assess(&bars, None).unwrap();

        assert!(profile.volatility_pct.abs() < 1e-9);
        assert_eq!(profile.sharpe_ratio, 0.0);
        assert_eq!(profile.risk_level, RiskLevel::Low);
        assert!(profile.max_drawdown_pct.abs() < 1e-9);
    }

    #[test]
    fn fallback_beta_without_benchmark() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.7).sin()).collect();
        let profile = RiskAssessor::default()
            .assess(&bars_from_closes(&closes), None)
            .unwrap();

        assert_eq!(profile.beta, FALLBACK_BETA);
    }

    #[test]
    fn beta_of_identical_series_is_one() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.7).sin()).collect();
        let returns = daily_returns(&closes).unwrap();

        assert!((beta_vs_benchmark(&returns, &returns) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn beta_scales_with_amplified_moves() {
        let bench: Vec<f64> = (0..60).map(|i| (i as f64 * 0.5).sin() * 0.01).collect();
        let stock: Vec<f64> = bench.iter().map(|r| r * 2.0).collect();

        assert!((beta_vs_benchmark(&stock, &bench) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn beta_flat_benchmark_falls_back() {
        let stock = vec![0.01, -0.02, 0.03];
        let bench = vec![0.0, 0.0, 0.0];

        assert_eq!(beta_vs_benchmark(&stock, &bench), FALLBACK_BETA);
    }

    #[test]
    fn max_drawdown_known_decline() {
        // peak 120, trough 90: 25% drawdown
        let prices = vec![100.0, 120.0, 110.0, 90.0, 115.0];
        assert!((max_drawdown(&prices) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn max_drawdown_bounded() {
        let prices = vec![100.0, 1.0, 50.0, 0.5];
        let dd = max_drawdown(&prices);
        assert!((0.0..=100.0).contains(&dd));
    }

    #[test]
    fn max_drawdown_monotone_rise_is_zero() {
        let prices: Vec<f64> = (1..=50).map(|i| i as f64).collect();
        assert!(max_drawdown(&prices).abs() < 1e-9);
    }

    #[test]
    fn risk_level_thresholds() {
        assert_eq!(risk_level(0.10, 1.0), RiskLevel::Low);
        assert_eq!(risk_level(0.20, 1.0), RiskLevel::Medium);
        assert_eq!(risk_level(0.20, 1.5), RiskLevel::High);
        assert_eq!(risk_level(0.30, 1.0), RiskLevel::High);
    }

    #[test]
    fn rejects_non_positive_closes() {
        let bars = bars_from_closes(&[100.0, 0.0, 100.0]);
        match RiskAssessor::default().assess(&bars, None) {
            Err(EngineError::InvalidData(_)) => {}
            other => panic!("expected InvalidData, got {:?}", other),
        }
    }

    #[test]
    fn rejects_degenerate_series() {
        let bars = bars_from_closes(&[100.0, 101.0]);
        match RiskAssessor::default().assess(&bars, None) {
            Err(EngineError::InsufficientData(_)) => {}
            other => panic!("expected InsufficientData, got {:?}", other),
        }
    }
}
