#![allow(dead_code)]

use ostrel::signal::Signal;
use rstest::fixture;

use crate::common::signal_of;

// ---
// Signal Fixtures
// ---

/// `sin(t)` sampled every 0.5 on `[0, 50)`.
#[fixture]
#[once]
pub fn sine_samples() -> Vec<(f64, f64)> {
    (0..100).map(|k| k as f64 * 0.5).map(|t| (t, t.sin())).collect()
}

#[fixture]
pub fn sine_signal(sine_samples: &Vec<(f64, f64)>) -> Signal<f64> {
    signal_of(sine_samples, 50.0)
}
