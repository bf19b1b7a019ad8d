//! Eventually, globally, once and historically.
//!
//! Unbounded operators are single suffix (future) or prefix (past) scans.
//! Bounded ones slide a window over the segments; their output is shorter
//! than the input by the window length.

use super::sliding_window::{Direction, slide, window_domain};
use crate::signal::Signal;
use crate::strel::core::{SignalDomain, TimeInterval};

pub fn eventually<R: SignalDomain>(signal: &Signal<R>, interval: Option<&TimeInterval>) -> Signal<R> {
    match interval {
        None => signal.iterate_backward(R::disjunction, R::min()),
        Some(i) => bounded(signal, i, Direction::Future, R::disjunction),
    }
}

pub fn globally<R: SignalDomain>(signal: &Signal<R>, interval: Option<&TimeInterval>) -> Signal<R> {
    match interval {
        None => signal.iterate_backward(R::conjunction, R::max()),
        Some(i) => bounded(signal, i, Direction::Future, R::conjunction),
    }
}

pub fn once<R: SignalDomain>(signal: &Signal<R>, interval: Option<&TimeInterval>) -> Signal<R> {
    match interval {
        None => signal.iterate_forward(R::disjunction, R::min()),
        Some(i) => bounded(signal, i, Direction::Past, R::disjunction),
    }
}

pub fn historically<R: SignalDomain>(signal: &Signal<R>, interval: Option<&TimeInterval>) -> Signal<R> {
    match interval {
        None => signal.iterate_forward(R::conjunction, R::max()),
        Some(i) => bounded(signal, i, Direction::Past, R::conjunction),
    }
}

fn bounded<R: SignalDomain>(
    signal: &Signal<R>,
    interval: &TimeInterval,
    direction: Direction,
    op: fn(&R, &R) -> R,
) -> Signal<R> {
    let (Some(start), Some(end)) = (signal.start(), signal.end()) else {
        return Signal::new();
    };
    match window_domain(start, end, interval, direction) {
        Some((from, to)) => slide(signal, interval, direction, op, from, to),
        None => Signal::new(),
    }
}
