/// Simple Moving Average
pub fn sma(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period {
        return vec![];
    }

    let mut result = Vec::with_capacity(data.len() - period + 1);
    let mut window_sum: f64 = data[..period].iter().sum();
    result.push(window_sum / period as f64);

    for i in period..data.len() {
        window_sum += data[i] - data[i - period];
        result.push(window_sum / period as f64);
    }
    result
}

/// Exponential Moving Average, index-aligned with the input.
///
/// Seeded with the SMA of the first `period` values, so the tail
/// converges to the standard EMA.
pub fn ema(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period {
        return vec![];
    }

    let alpha = 2.0 / (period as f64 + 1.0);
    let mut prev = data[..period].iter().sum::<f64>() / period as f64;

    let mut result = Vec::with_capacity(data.len());
    result.push(prev);
    for &value in &data[1..] {
        prev += alpha * (value - prev);
        result.push(prev);
    }
    result
}

/// Relative Strength Index with Wilder smoothing, bounded [0, 100].
///
/// A window with neither gains nor losses reads 50 (neutral) rather
/// than a division artifact.
pub fn rsi(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period + 1 {
        return vec![];
    }

    let mut gains = Vec::with_capacity(data.len() - 1);
    let mut losses = Vec::with_capacity(data.len() - 1);
    for w in data.windows(2) {
        let change = w[1] - w[0];
        gains.push(change.max(0.0));
        losses.push((-change).max(0.0));
    }

    let mut avg_gain = gains[..period].iter().sum::<f64>() / period as f64;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / period as f64;

    let mut result = Vec::with_capacity(gains.len() - period + 1);
    result.push(rsi_point(avg_gain, avg_loss));

    for i in period..gains.len() {
        avg_gain = (avg_gain * (period - 1) as f64 + gains[i]) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + losses[i]) / period as f64;
        result.push(rsi_point(avg_gain, avg_loss));
    }
    result
}

fn rsi_point(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            50.0
        } else {
            100.0
        }
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

/// MACD line and its signal line
pub struct MacdSeries {
    pub macd_line: Vec<f64>,
    pub signal_line: Vec<f64>,
}

pub fn macd(data: &[f64], fast: usize, slow: usize, signal: usize) -> MacdSeries {
    if fast == 0 || signal == 0 || slow <= fast || data.len() < slow {
        return MacdSeries {
            macd_line: vec![],
            signal_line: vec![],
        };
    }

    let ema_fast = ema(data, fast);
    let ema_slow = ema(data, slow);

    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = ema(&macd_line, signal);

    MacdSeries {
        macd_line,
        signal_line,
    }
}
