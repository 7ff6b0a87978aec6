#[cfg(test)]
mod tests {
    use super::super::indicators::*;
    use super::super::snapshot::{compute_snapshot, MIN_BARS};
    use chrono::{Duration, TimeZone, Utc};
    use signal_core::{Bar, EngineError};

    fn sample_prices() -> Vec<f64> {
        vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 45.61, 46.28, 46.28, 46.00, 46.03, 46.41, 46.22, 45.64,
        ]
    }

    fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                timestamp: start + Duration::days(i as i64),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 1_000_000.0,
            })
            .collect()
    }

    #[test]
    fn sma_basic() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = sma(&data, 3);

        assert_eq!(result.len(), 3);
        assert!((result[0] - 2.0).abs() < 1e-9);
        assert!((result[1] - 3.0).abs() < 1e-9);
        assert!((result[2] - 4.0).abs() < 1e-9);
    }

    #[test]
    fn sma_insufficient_data() {
        assert!(sma(&[1.0, 2.0], 5).is_empty());
        assert!(sma(&[1.0, 2.0], 0).is_empty());
    }

    #[test]
    fn ema_seeded_with_sma() {
        let data = vec![22.0, 24.0, 23.0, 25.0, 26.0];
        let result = ema(&data, 3);

        assert_eq!(result.len(), data.len());
        let seed = (22.0 + 24.0 + 23.0) / 3.0;
        assert!((result[0] - seed).abs() < 1e-9);
    }

    #[test]
    fn ema_tracks_uptrend() {
        let data: Vec<f64> = (1..=10).map(|i| i as f64).collect();
        let result = ema(&data, 3);

        for pair in result.windows(2) {
            assert!(pair[1] > pair[0]);
        }
    }

    #[test]
    fn rsi_bounded() {
        let result = rsi(&sample_prices(), 14);

        assert!(!result.is_empty());
        for &value in &result {
            assert!((0.0..=100.0).contains(&value));
        }
    }

    #[test]
    fn rsi_flat_series_is_neutral() {
        let flat = vec![100.0; 30];
        let result = rsi(&flat, 14);

        assert!(!result.is_empty());
        for &value in &result {
            assert!((value - 50.0).abs() < 1e-9);
        }
    }

    #[test]
    fn rsi_pure_uptrend_is_overbought() {
        let uptrend: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let result = rsi(&uptrend, 14);

        assert!(*result.last().unwrap() > 70.0);
    }

    #[test]
    fn rsi_insufficient_data() {
        assert!(rsi(&[1.0, 2.0, 3.0], 14).is_empty());
    }

    #[test]
    fn macd_lines_aligned() {
        let prices: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.3).sin()).collect();
        let result = macd(&prices, 12, 26, 9);

        assert_eq!(result.macd_line.len(), prices.len());
        assert_eq!(result.signal_line.len(), result.macd_line.len());
    }

    #[test]
    fn macd_flat_series_is_zero() {
        let flat = vec![100.0; 60];
        let result = macd(&flat, 12, 26, 9);

        assert!((result.macd_line.last().unwrap()).abs() < 1e-9);
        assert!((result.signal_line.last().unwrap()).abs() < 1e-9);
    }

    #[test]
    fn macd_insufficient_data() {
        let result = macd(&sample_prices(), 12, 26, 9);
        assert!(result.macd_line.is_empty());
        assert!(result.signal_line.is_empty());
    }

    #[test]
    fn snapshot_rejects_short_series() {
        let bars = bars_from_closes(&vec![100.0; MIN_BARS - 1]);
        match compute_snapshot(&bars) {
            Err(EngineError::InsufficientData(_)) => {}
            other => panic!("expected InsufficientData, got {:?}", other),
        }
    }

    #[test]
    fn snapshot_rejects_non_positive_close() {
        let mut closes = vec![100.0; 60];
        closes[30] = 0.0;
        match compute_snapshot(&bars_from_closes(&closes)) {
            Err(EngineError::InvalidData(_)) => {}
            other => panic!("expected InvalidData, got {:?}", other),
        }
    }

    #[test]
    fn snapshot_flat_series() {
        let bars = bars_from_closes(&vec![100.0; 60]);
        let snap = compute_snapshot(&bars).unwrap();

        assert!((snap.oscillator.unwrap() - 50.0).abs() < 1e-9);
        assert!((snap.momentum.unwrap()).abs() < 1e-9);
        assert!((snap.volume_ratio - 1.0).abs() < 1e-9);
        assert!((snap.ma_short.unwrap() - 100.0).abs() < 1e-9);
        assert!((snap.ma_medium.unwrap() - 100.0).abs() < 1e-9);
        // 60 bars cannot fill the 200-bar window
        assert!(snap.ma_long.is_none());
        let trend = snap.trend.unwrap();
        assert!(trend.value.abs() < 1e-9);
        assert!(trend.signal.abs() < 1e-9);
        assert!((snap.current_price - 100.0).abs() < 1e-9);
    }

    #[test]
    fn snapshot_long_ma_present_with_enough_bars() {
        let bars = bars_from_closes(&vec![100.0; 210]);
        let snap = compute_snapshot(&bars).unwrap();
        assert!(snap.ma_long.is_some());
    }

    #[test]
    fn snapshot_volume_spike_ratio() {
        let mut bars = bars_from_closes(&vec![100.0; 60]);
        bars.last_mut().unwrap().volume = 3_000_000.0;
        let snap = compute_snapshot(&bars).unwrap();

        // 19 bars at 1M plus one at 3M: spike well above the average
        assert!(snap.volume_ratio > 1.5);
    }

    #[test]
    fn snapshot_zero_volume_window_defaults_to_one() {
        let mut bars = bars_from_closes(&vec![100.0; 60]);
        for bar in &mut bars {
            bar.volume = 0.0;
        }
        let snap = compute_snapshot(&bars).unwrap();
        assert!((snap.volume_ratio - 1.0).abs() < 1e-9);
    }

    #[test]
    fn snapshot_momentum_matches_trailing_change() {
        let mut closes = vec![100.0; 60];
        // last 10 entries ramp from 100 to 118
        for i in 0..10 {
            closes[50 + i] = 100.0 + 2.0 * i as f64;
        }
        let snap = compute_snapshot(&bars_from_closes(&closes)).unwrap();

        let expected = (118.0 - 100.0) / 100.0 * 100.0;
        assert!((snap.momentum.unwrap() - expected).abs() < 1e-9);
    }
}
