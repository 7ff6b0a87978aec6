use signal_core::{Bar, EngineError, IndicatorSnapshot, TrendPair};

use crate::indicators::{macd, rsi, sma};

/// Minimum bar count for a meaningful snapshot. Fewer bars is an
/// error condition, not a degraded result: the long-window indicators
/// downstream would be meaningless.
pub const MIN_BARS: usize = 50;

const MA_SHORT_WINDOW: usize = 20;
const MA_MEDIUM_WINDOW: usize = 50;
const MA_LONG_WINDOW: usize = 200;
const OSCILLATOR_PERIOD: usize = 14;
const TREND_FAST: usize = 12;
const TREND_SLOW: usize = 26;
const TREND_SIGNAL: usize = 9;
const VOLUME_WINDOW: usize = 20;
const MOMENTUM_LOOKBACK: usize = 10;

/// Compute the trailing-window indicator snapshot for an ordered bar
/// series. Deterministic given identical input, no side effects.
pub fn compute_snapshot(bars: &[Bar]) -> Result<IndicatorSnapshot, EngineError> {
    if bars.len() < MIN_BARS {
        return Err(EngineError::InsufficientData(format!(
            "need at least {} bars, got {}",
            MIN_BARS,
            bars.len()
        )));
    }
    validate(bars)?;

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();

    let trend = {
        let series = macd(&closes, TREND_FAST, TREND_SLOW, TREND_SIGNAL);
        match (series.macd_line.last(), series.signal_line.last()) {
            (Some(&value), Some(&signal)) => Some(TrendPair { value, signal }),
            _ => None,
        }
    };

    let current_price = closes[closes.len() - 1];

    Ok(IndicatorSnapshot {
        ma_short: sma(&closes, MA_SHORT_WINDOW).last().copied(),
        ma_medium: sma(&closes, MA_MEDIUM_WINDOW).last().copied(),
        ma_long: sma(&closes, MA_LONG_WINDOW).last().copied(),
        oscillator: rsi(&closes, OSCILLATOR_PERIOD).last().copied(),
        trend,
        volume_ratio: volume_ratio(&volumes),
        momentum: momentum(&closes),
        current_price,
    })
}

fn validate(bars: &[Bar]) -> Result<(), EngineError> {
    for bar in bars {
        if !bar.close.is_finite() || bar.close <= 0.0 {
            return Err(EngineError::InvalidData(format!(
                "non-positive or non-finite close at {}",
                bar.timestamp
            )));
        }
        if !bar.volume.is_finite() || bar.volume < 0.0 {
            return Err(EngineError::InvalidData(format!(
                "negative or non-finite volume at {}",
                bar.timestamp
            )));
        }
    }
    Ok(())
}

/// Latest volume over the trailing average, clamping the window to
/// however many bars exist. 1.0 when the denominator is zero.
fn volume_ratio(volumes: &[f64]) -> f64 {
    let window = VOLUME_WINDOW.min(volumes.len());
    if window == 0 {
        return 1.0;
    }
    let avg = volumes[volumes.len() - window..].iter().sum::<f64>() / window as f64;
    if avg == 0.0 {
        1.0
    } else {
        volumes[volumes.len() - 1] / avg
    }
}

/// Percentage change of the close over the trailing lookback
fn momentum(closes: &[f64]) -> Option<f64> {
    if closes.len() < MOMENTUM_LOOKBACK {
        return None;
    }
    let base = closes[closes.len() - MOMENTUM_LOOKBACK];
    let last = closes[closes.len() - 1];
    Some((last - base) / base * 100.0)
}
