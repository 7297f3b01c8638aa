//! Momentum metric (Wilder RSI).
//!
//! ## What it answers
//! > "Has price moved too far, too fast, in one direction?"
//!
//! The oscillator is bounded in `[0, 100]`:
//! - near 100 → recent closes were almost all gains (overbought zone)
//! - near 0   → recent closes were almost all losses (oversold zone)
//!
//! ## Recurrence
//!
//! Average gain and average loss over the most recent `period` deltas are
//! seeded by a simple average over the first `period` deltas, then
//! exponentially smoothed with factor `1/period` for every later delta:
//!
//! ```text
//! avg = (avg * (period - 1) + delta) / period
//! RS  = avg_gain / avg_loss
//! RSI = 100 - 100 / (1 + RS)
//! ```
//!
//! When `avg_loss` is zero, RS is treated as infinite and RSI is 100.
//!
//! ## Warm-up guard
//! Undefined (`None`) until at least `period + 1` prices exist; an
//! under-filled window would produce a different, unstable value.

/// Compute the RSI over an ordered price sequence, oldest first.
///
/// Returns `None` when fewer than `period + 1` prices are available or
/// `period` is zero.
pub fn rsi(prices: &[f64], period: usize) -> Option<f64> {
    if period == 0 || prices.len() < period + 1 {
        return None;
    }

    let p = period as f64;

    // Seed: simple average gain/loss over the first `period` deltas.
    let mut gain_sum = 0.0;
    let mut loss_sum = 0.0;
    for i in 1..=period {
        let delta = prices[i] - prices[i - 1];
        if delta >= 0.0 {
            gain_sum += delta;
        } else {
            loss_sum -= delta;
        }
    }

    let mut avg_gain = gain_sum / p;
    let mut avg_loss = loss_sum / p;

    // Wilder smoothing for the remaining deltas.
    for i in (period + 1)..prices.len() {
        let delta = prices[i] - prices[i - 1];
        let (gain, loss) = if delta >= 0.0 {
            (delta, 0.0)
        } else {
            (0.0, -delta)
        };

        avg_gain = (avg_gain * (p - 1.0) + gain) / p;
        avg_loss = (avg_loss * (p - 1.0) + loss) / p;
    }

    if avg_loss == 0.0 {
        return Some(100.0);
    }

    let rs = avg_gain / avg_loss;
    Some(100.0 - 100.0 / (1.0 + rs))
}
