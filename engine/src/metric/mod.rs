//! Metric computers.
//!
//! Every function in this module is a pure function of a window snapshot:
//! deterministic, side-effect-free, and returning `None` whenever the
//! window does not yet hold enough history for the metric to be defined.
//! Callers must treat `None` as "no decision this tick", never as an error.

pub mod momentum;
pub mod spike;
