mod common;
mod fixtures;

use common::{STEP, random_bool, random_real, random_samples, seeded, signal_of};
use fixtures::signals::*;
use ostrel::signal::Signal;
use ostrel::strel::core::TimeInterval;
use ostrel::strel::formula_definition::Formula;
use ostrel::strel::monitor::TemporalMonitor;
use ostrel::strel::operators::{temporal, until};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

/// Grid fine enough to hit every segment of a signal sampled every `STEP`
/// inside any window whose bounds are multiples of `STEP`.
const FINE: f64 = STEP / 2.0;

/// Multiples of `FINE` in `[from, to]`.
fn fine_grid(from: f64, to: f64) -> Vec<f64> {
    let first = (from / FINE).ceil() as i64;
    let last = (to / FINE).floor() as i64;
    (first..=last).map(|k| k as f64 * FINE).collect()
}

fn brute_window(signal: &Signal<bool>, t: f64, a: f64, b: f64, conjunction: bool) -> bool {
    let mut values = fine_grid(t + a, t + b).into_iter().filter_map(|s| signal.value_at(s).copied());
    if conjunction {
        values.all(|v| v)
    } else {
        values.any(|v| v)
    }
}

/// `∃t' >= t. q(t') ∧ ∀t'' ∈ [t, t'). p(t'')`
fn brute_until(p: &Signal<bool>, q: &Signal<bool>, t: f64, end: f64) -> bool {
    let grid = fine_grid(t, end);
    grid.iter().enumerate().any(|(k, &s)| {
        q.value_at(s) == Some(&true) && grid[..k].iter().all(|&r| p.value_at(r) == Some(&true))
    })
}

// ---
// Concrete scenario
// ---

#[rstest]
fn eventually_negative_sine(sine_samples: &Vec<(f64, f64)>, sine_signal: Signal<f64>) {
    let monitor = TemporalMonitor::builder()
        .formula(Formula::eventually(TimeInterval::new(0.0, 10.0).unwrap(), Formula::atom("x<0")))
        .atom("x<0", |x: &f64| *x < 0.0)
        .build()
        .unwrap();
    let verdict = monitor.monitor(&sine_signal).unwrap();
    assert_eq!((verdict.start(), verdict.end()), (Some(0.0), Some(40.0)));

    let times: Vec<f64> = sine_samples.iter().map(|(t, _)| *t).filter(|t| *t <= 39.5).collect();
    // a sample lasts 0.5, so [t, t + 10] sees exactly the samples in that range
    let expected: Vec<Option<bool>> = times
        .iter()
        .map(|t| {
            Some(sine_samples.iter().any(|(s, x)| *s >= *t && *s <= t + 10.0 && *x < 0.0))
        })
        .collect();
    assert_eq!(verdict.sample(&times), expected);
    // ten time units always span more than half a period
    assert!(expected.iter().all(|v| *v == Some(true)));
}

#[rstest]
fn eventually_negative_sine_short_window(sine_samples: &Vec<(f64, f64)>, sine_signal: Signal<f64>) {
    let monitor = TemporalMonitor::builder()
        .formula(Formula::eventually(TimeInterval::new(0.0, 1.0).unwrap(), Formula::atom("x<0")))
        .atom("x<0", |x: &f64| *x < 0.0)
        .build()
        .unwrap();
    let verdict = monitor.monitor(&sine_signal).unwrap();
    let times: Vec<f64> = sine_samples.iter().map(|(t, _)| *t).filter(|t| *t <= 48.5).collect();
    let expected: Vec<Option<bool>> = times
        .iter()
        .map(|t| Some(sine_samples.iter().any(|(s, x)| *s >= *t && *s <= t + 1.0 && *x < 0.0)))
        .collect();
    assert_eq!(verdict.sample(&times), expected);
    assert!(expected.contains(&Some(false)));
}

#[rstest]
fn robustness_of_sine_bound(sine_signal: Signal<f64>) {
    let monitor = TemporalMonitor::builder()
        .formula(Formula::globally(None, Formula::atom("x<=1")))
        .atom("x<=1", |x: &f64| 1.0 - x)
        .build()
        .unwrap();
    let verdict = monitor.monitor(&sine_signal).unwrap();
    let margin = verdict.value_at(0.0).copied().unwrap();
    assert!(margin > 0.0 && margin < 0.01, "closest sample to the peak gives {margin}");
}

// ---
// Brute-force references
// ---

proptest! {
    #[test]
    fn bounded_globally_matches_scan(
        values in prop::collection::vec(any::<bool>(), 1..40),
        a in 0usize..4,
        width in 0usize..5,
    ) {
        let (a, b) = (a as f64 * STEP, (a + width) as f64 * STEP);
        let end = values.len() as f64 * STEP;
        let samples: Vec<(f64, bool)> =
            values.iter().enumerate().map(|(k, v)| (k as f64 * STEP, *v)).collect();
        let signal = signal_of(&samples, end);
        let out = temporal::globally(&signal, Some(&TimeInterval::new(a, b).unwrap()));
        if end < b {
            prop_assert!(out.is_empty());
        } else {
            prop_assert_eq!(out.end(), Some(end - b));
            for t in fine_grid(0.0, end - b).into_iter().filter(|t| *t < end - b) {
                prop_assert_eq!(out.value_at(t).copied(), Some(brute_window(&signal, t, a, b, true)), "at {}", t);
            }
        }
    }

    #[test]
    fn bounded_once_matches_scan(
        values in prop::collection::vec(any::<bool>(), 1..40),
        a in 0usize..3,
        width in 0usize..4,
    ) {
        let (a, b) = (a as f64 * STEP, (a + width) as f64 * STEP);
        let end = values.len() as f64 * STEP;
        let samples: Vec<(f64, bool)> =
            values.iter().enumerate().map(|(k, v)| (k as f64 * STEP, *v)).collect();
        let signal = signal_of(&samples, end);
        let out = temporal::once(&signal, Some(&TimeInterval::new(a, b).unwrap()));
        if end >= b {
            for t in fine_grid(b, end).into_iter().filter(|t| *t < end) {
                prop_assert_eq!(out.value_at(t).copied(), Some(brute_window(&signal, t, -b, -a, false)), "at {}", t);
            }
        }
    }
}

#[test]
fn unbounded_until_matches_reference() {
    let mut rng = seeded(7);
    for _ in 0..50 {
        let end = 12.0;
        let p = signal_of(&random_samples(&mut rng, end, |r| random_bool(r) || random_bool(r)), end);
        let q = signal_of(&random_samples(&mut rng, end, |r| random_bool(r) && random_bool(r)), end);
        let out = until::until(&p, &q, None);
        for t in fine_grid(0.0, end) {
            assert_eq!(out.value_at(t).copied(), Some(brute_until(&p, &q, t, end)), "at {t}");
        }
    }
}

#[test]
fn bounded_until_implies_both_parts() {
    let mut rng = seeded(11);
    let interval = TimeInterval::new(1.0, 2.5).unwrap();
    for _ in 0..30 {
        let end = 10.0;
        let p = signal_of(&random_samples(&mut rng, end, random_bool), end);
        let q = signal_of(&random_samples(&mut rng, end, random_bool), end);
        let bounded = until::until(&p, &q, Some(&interval));
        let unbounded = until::until(&p, &q, None);
        let eventually = temporal::eventually(&q, Some(&interval));
        for t in fine_grid(0.0, end - interval.end()).into_iter().filter(|t| *t < end - interval.end()) {
            let expected = unbounded.value_at(t) == Some(&true) && eventually.value_at(t) == Some(&true);
            assert_eq!(bounded.value_at(t).copied(), Some(expected), "at {t}");
        }
    }
}

#[test]
fn real_globally_is_windowed_minimum() {
    let mut rng = seeded(3);
    let end = 20.0;
    let signal = signal_of(&random_samples(&mut rng, end, random_real), end);
    let out = temporal::globally(&signal, Some(&TimeInterval::new(0.5, 2.0).unwrap()));
    for t in fine_grid(0.0, end - 2.0).into_iter().filter(|t| *t < end - 2.0) {
        let expected = fine_grid(t + 0.5, t + 2.0)
            .into_iter()
            .filter_map(|s| signal.value_at(s).copied())
            .fold(f64::INFINITY, f64::min);
        assert_eq!(out.value_at(t).copied(), Some(expected), "at {t}");
    }
}
