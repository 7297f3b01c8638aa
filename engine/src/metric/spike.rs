//! Volume-spike metric.
//!
//! Compares the current interval's notional volume against the mean of a
//! trailing history. The history must exclude the current value; callers
//! evaluate the spike *before* pushing the current sample into the window.

/// Mean of the trailing history. `None` when the history is empty
/// (the mean is undefined, so no spike decision can be made).
pub fn trailing_mean(history: &[f64]) -> Option<f64> {
    if history.is_empty() {
        return None;
    }
    Some(history.iter().sum::<f64>() / history.len() as f64)
}

/// `current / mean(history)`. `None` when the history is empty.
///
/// A zero trailing mean with a positive current value yields `f64::INFINITY`,
/// which downstream threshold checks treat as an arbitrarily large spike.
pub fn spike_ratio(current: f64, history: &[f64]) -> Option<f64> {
    let mean = trailing_mean(history)?;
    Some(current / mean)
}
