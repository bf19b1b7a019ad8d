//! Bounded-window aggregation over piecewise-constant signals.
//!
//! The window slides over segments rather than samples: a segment enters
//! when the window first touches it and leaves once the window has moved
//! past it, so the output changes only at those event times.

use crate::signal::Signal;
use crate::strel::core::{SignalDomain, TimeInterval};

use std::collections::VecDeque;

/// Which side of the evaluation instant the window covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// `[t + a, t + b]`
    Future,
    /// `[t - b, t - a]`
    Past,
}

/// Sliding aggregate under an idempotent, commutative and associative `op`.
///
/// Entries are `(position, suffix aggregate)`: the aggregate of every pushed
/// value from `position` on. Positions whose suffix aggregate equals the one
/// of the next entry are dropped, which for min/max leaves exactly the
/// candidates of Lemire's monotonic wedge.
pub(crate) struct MonotonicWindow<R> {
    entries: VecDeque<(usize, R)>,
    op: fn(&R, &R) -> R,
}

impl<R: SignalDomain> MonotonicWindow<R> {
    pub(crate) fn new(op: fn(&R, &R) -> R) -> Self {
        MonotonicWindow {
            entries: VecDeque::new(),
            op,
        }
    }

    pub(crate) fn push(&mut self, position: usize, value: R) {
        // newest first
        let mut tail = vec![(position, value.clone())];
        while let Some((p, aggregate)) = self.entries.pop_back() {
            let merged = (self.op)(&aggregate, &value);
            if R::equal_to(&merged, &aggregate) {
                // dominates the new value, and so does everything before it
                self.entries.push_back((p, aggregate));
                break;
            }
            if tail.last().is_some_and(|(_, next)| R::equal_to(next, &merged)) {
                continue;
            }
            tail.push((p, merged));
        }
        if let (Some((_, back)), Some((_, next))) = (self.entries.back(), tail.last())
            && R::equal_to(back, next)
        {
            self.entries.pop_back();
        }
        self.entries.extend(tail.into_iter().rev());
    }

    /// Forgets every position below `position`.
    pub(crate) fn evict_before(&mut self, position: usize) {
        while self.entries.front().is_some_and(|(p, _)| *p < position) {
            self.entries.pop_front();
        }
    }

    /// Aggregate of the positions still in the window.
    pub(crate) fn aggregate(&self) -> Option<&R> {
        self.entries.front().map(|(_, v)| v)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Aggregates `signal` with `op` over the window `interval` in `direction`,
/// producing the output on `[from, to]`.
///
/// The caller guarantees that every window evaluated on `[from, to)` lies
/// inside the signal domain.
pub(crate) fn slide<R: SignalDomain>(
    signal: &Signal<R>,
    interval: &TimeInterval,
    direction: Direction,
    op: fn(&R, &R) -> R,
    from: f64,
    to: f64,
) -> Signal<R> {
    let mut result = Signal::new();
    let n = signal.size();
    if n == 0 || from > to {
        return result;
    }
    let (enter_offset, leave_offset) = match direction {
        Direction::Future => (-interval.end(), -interval.start()),
        Direction::Past => (interval.start(), interval.end()),
    };
    let enters = |i: usize| signal.segment(i).start + enter_offset;
    // the last segment never leaves
    let leaves = |i: usize| {
        if i + 1 < n {
            signal.segment(i + 1).start + leave_offset
        } else {
            f64::INFINITY
        }
    };

    let mut window = MonotonicWindow::new(op);
    // segments [lo, hi) are in the window
    let mut hi = 0;
    let mut lo = 0;
    let mut time = from;
    loop {
        while hi < n && enters(hi) <= time {
            window.push(hi, signal.segment(hi).value.clone());
            hi += 1;
        }
        while lo + 1 < n && leaves(lo) <= time {
            lo += 1;
        }
        window.evict_before(lo);
        debug_assert!(lo < hi, "window at {time} holds no segment");
        if let Some(value) = window.aggregate() {
            result.push(time, value.clone());
        }
        let next_enter = if hi < n { enters(hi) } else { f64::INFINITY };
        let next_leave = leaves(lo);
        time = next_enter.min(next_leave);
        if time >= to {
            break;
        }
    }
    result.close(to);
    result
}

/// Output domain of a bounded window over a signal on `[start, end]`, or
/// `None` when the signal is too short.
pub(crate) fn window_domain(
    start: f64,
    end: f64,
    interval: &TimeInterval,
    direction: Direction,
) -> Option<(f64, f64)> {
    let (from, to) = match direction {
        Direction::Future => (start, end - interval.end()),
        Direction::Past => (start + interval.end(), end),
    };
    (from <= to).then_some((from, to))
}
