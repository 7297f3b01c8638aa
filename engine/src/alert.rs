//! Per-symbol alert state machines.
//!
//! The momentum variant is edge-triggered with hysteresis: one alert per
//! excursion into an extreme zone, re-armed only after the metric returns
//! to the neutral band. This is what prevents an alert storm while the
//! metric hovers at the same extreme.
//!
//! The spike variant is a stateless threshold check and re-alerts on every
//! qualifying closed interval. The asymmetry with the momentum variant is
//! intentional and preserved.

use crate::metric::spike::trailing_mean;

/// Hysteresis state for the momentum variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MomentumState {
    Neutral,
    High,
    Low,
}

/// Which extreme zone was entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MomentumAlert {
    Overbought,
    Oversold,
}

/// Edge-triggered threshold tracker for one symbol's momentum metric.
///
/// Transition rules on each observed value:
/// - value > upper and state != High → emit `Overbought`, state = High
/// - value < lower and state != Low  → emit `Oversold`,  state = Low
/// - lower <= value <= upper         → state = Neutral, no emission
/// - same extreme persists           → no emission, no state change
///
/// An absent metric (`None`) means "no decision this tick": no emission and
/// no state change, never an error.
#[derive(Debug)]
pub struct MomentumAlerter {
    upper: f64,
    lower: f64,
    state: MomentumState,
}

impl MomentumAlerter {
    pub fn new(upper: f64, lower: f64) -> Self {
        Self {
            upper,
            lower,
            state: MomentumState::Neutral,
        }
    }

    pub fn observe(&mut self, metric: Option<f64>) -> Option<MomentumAlert> {
        let value = metric?;

        if value > self.upper {
            if self.state != MomentumState::High {
                self.state = MomentumState::High;
                return Some(MomentumAlert::Overbought);
            }
        } else if value < self.lower {
            if self.state != MomentumState::Low {
                self.state = MomentumState::Low;
                return Some(MomentumAlert::Oversold);
            }
        } else {
            // Back inside the neutral band: re-arm both edges.
            self.state = MomentumState::Neutral;
        }

        None
    }

    pub fn state(&self) -> MomentumState {
        self.state
    }
}

/// Details of a fired volume spike, used to build the alert text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpikeSignal {
    pub current: f64,
    pub trailing_mean: f64,
    pub ratio: f64,
}

/// Stateless spike threshold for one symbol's notional volume.
///
/// Fires whenever `current >= multiplier * trailing_mean`, `current >= floor`,
/// and the trailing window is full. No suppression state: sustained elevated
/// volume re-alerts on every qualifying interval.
#[derive(Debug)]
pub struct SpikeAlerter {
    multiplier: f64,
    floor: f64,
}

impl SpikeAlerter {
    pub fn new(multiplier: f64, floor: f64) -> Self {
        Self { multiplier, floor }
    }

    pub fn observe(&self, current: f64, history: &[f64], window_full: bool) -> Option<SpikeSignal> {
        if !window_full {
            return None;
        }

        let mean = trailing_mean(history)?;

        if current >= self.multiplier * mean && current >= self.floor {
            let ratio = if mean > 0.0 {
                current / mean
            } else {
                f64::INFINITY
            };

            return Some(SpikeSignal {
                current,
                trailing_mean: mean,
                ratio,
            });
        }

        None
    }
}
