//! Piecewise-constant signals.
//!
//! A [`Signal`] is a chain of [`Segment`]s stored in an index-addressed
//! deque. Segment `i` holds its value on `[start_i, start_{i+1})`; the last
//! segment holds it on `[start_last, end]`. Adjacent segments never carry
//! equal values.
//!
//! - [`cursor`]: forward/backward cursors and the location-synchronised
//!   [`ParallelSignalCursor`](cursor::ParallelSignalCursor).
//! - [`spatial`]: one signal per location of a spatial model.

pub mod cursor;
pub mod spatial;

use crate::error::{MonitorError, Result};
use crate::online::update::Update;

use cursor::SignalCursor;
use std::collections::VecDeque;

/// A maximal constant piece of a signal.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment<T> {
    pub start: f64,
    pub value: T,
}

/// Common read access to offline and online signals.
pub trait TimeSignal<T> {
    fn value_at(&self, time: f64) -> Option<&T>;
    fn start(&self) -> Option<f64>;
    fn end(&self) -> Option<f64>;
    /// Narrows the value held on the update's span. Returns whether anything
    /// changed.
    fn refine(&mut self, update: &Update<T>) -> Result<bool>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct Signal<T> {
    segments: VecDeque<Segment<T>>,
    end: f64,
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Signal {
            segments: VecDeque::new(),
            end: f64::NAN,
        }
    }
}

impl<T: Clone + PartialEq> Signal<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a signal from `(time, value)` samples with increasing times.
    pub fn from_samples<I>(samples: I) -> Result<Self>
    where
        I: IntoIterator<Item = (f64, T)>,
    {
        let mut signal = Signal::new();
        for (time, value) in samples {
            signal.add(time, value)?;
        }
        Ok(signal)
    }

    /// Appends `value` from `time` on. An unchanged value only extends the end.
    pub fn add(&mut self, time: f64, value: T) -> Result<()> {
        self.check_add(time, &value)?;
        match self.segments.back() {
            Some(last) if last.value == value => {}
            _ => self.segments.push_back(Segment { start: time, value }),
        }
        self.end = time;
        Ok(())
    }

    /// Fails exactly when [`Self::add`] would, without touching the signal.
    pub(crate) fn check_add(&self, time: f64, value: &T) -> Result<()> {
        if time.is_nan() {
            return Err(MonitorError::argument("sample time is NaN"));
        }
        let Some(last) = self.segments.back() else {
            return Ok(());
        };
        if time < self.end {
            return Err(MonitorError::argument(format!(
                "sample at time {time} precedes the signal end {}",
                self.end
            )));
        }
        if last.value != *value && time == last.start {
            return Err(MonitorError::argument(format!(
                "a different value is already defined at time {time}"
            )));
        }
        Ok(())
    }

    /// Prepends `value` on `[time, start)`.
    pub fn add_before(&mut self, time: f64, value: T) -> Result<()> {
        if time.is_nan() {
            return Err(MonitorError::argument("sample time is NaN"));
        }
        let Some(first) = self.segments.front() else {
            self.segments.push_front(Segment { start: time, value });
            self.end = time;
            return Ok(());
        };
        if time >= first.start {
            return Err(MonitorError::argument(format!(
                "sample at time {time} does not precede the signal start {}",
                first.start
            )));
        }
        if first.value == value {
            self.segments[0].start = time;
        } else {
            self.segments.push_front(Segment { start: time, value });
        }
        Ok(())
    }

    /// Extends the last segment up to `time`.
    pub fn end_at(&mut self, time: f64) -> Result<()> {
        if self.segments.is_empty() {
            return Err(MonitorError::argument("cannot set the end of an empty signal"));
        }
        if time.is_nan() || time < self.end {
            return Err(MonitorError::argument(format!(
                "end time {time} precedes the signal end {}",
                self.end
            )));
        }
        self.end = time;
        Ok(())
    }

    /// Appends without ordering checks, keeping the chain minimal. A value at
    /// the start of the last segment overwrites it.
    pub(crate) fn push(&mut self, time: f64, value: T) {
        let len = self.segments.len();
        let (last_start, unchanged) = match self.segments.back() {
            Some(last) => (last.start, last.value == value),
            None => (f64::NAN, false),
        };
        if len == 0 || (!unchanged && last_start != time) {
            self.segments.push_back(Segment { start: time, value });
        } else if !unchanged {
            // same start as the last segment: overwrite, then re-merge
            self.segments[len - 1].value = value;
            if len > 1 && self.segments[len - 2].value == self.segments[len - 1].value {
                self.segments.pop_back();
            }
        }
        if self.end.is_nan() || time > self.end {
            self.end = time;
        }
    }

    pub(crate) fn close(&mut self, time: f64) {
        if !self.segments.is_empty() && (self.end.is_nan() || time > self.end) {
            self.end = time;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments.
    pub fn size(&self) -> usize {
        self.segments.len()
    }

    pub fn start(&self) -> Option<f64> {
        self.segments.front().map(|s| s.start)
    }

    pub fn end(&self) -> Option<f64> {
        (!self.segments.is_empty()).then_some(self.end)
    }

    pub(crate) fn segment(&self, index: usize) -> &Segment<T> {
        &self.segments[index]
    }

    /// End of segment `index`: the next start, or the signal end.
    pub(crate) fn segment_end(&self, index: usize) -> f64 {
        self.segments
            .get(index + 1)
            .map_or(self.end, |next| next.start)
    }

    /// Index of the segment holding the value at `time`.
    pub(crate) fn index_at(&self, time: f64) -> Option<usize> {
        let start = self.start()?;
        if time < start || time > self.end {
            return None;
        }
        Some(self.segments.partition_point(|s| s.start <= time) - 1)
    }

    pub fn value_at(&self, time: f64) -> Option<&T> {
        self.index_at(time).map(|i| &self.segments[i].value)
    }

    /// Values at each of `times`, `None` outside the signal domain.
    pub fn sample(&self, times: &[f64]) -> Vec<Option<T>> {
        times
            .iter()
            .map(|t| self.value_at(*t).cloned())
            .collect()
    }

    /// `(start, end, value)` for every segment.
    pub fn segments(&self) -> impl Iterator<Item = (f64, f64, &T)> + '_ {
        (0..self.segments.len()).map(|i| {
            (
                self.segments[i].start,
                self.segment_end(i),
                &self.segments[i].value,
            )
        })
    }

    /// Segment start times in increasing order.
    pub fn breakpoints(&self) -> impl Iterator<Item = f64> + '_ {
        self.segments.iter().map(|s| s.start)
    }

    pub fn cursor(&self) -> SignalCursor<'_, T> {
        SignalCursor::forward(self)
    }

    pub fn backward_cursor(&self) -> SignalCursor<'_, T> {
        SignalCursor::backward(self)
    }

    pub fn apply<U, F>(&self, f: F) -> Signal<U>
    where
        U: Clone + PartialEq,
        F: Fn(&T) -> U,
    {
        let mut result = Signal::new();
        for segment in &self.segments {
            result.push(segment.start, f(&segment.value));
        }
        result.close(self.end);
        result
    }

    /// Pointwise combination over the common domain, re-segmented at the union
    /// of both breakpoint sets. Empty when the domains do not overlap.
    pub fn apply_binary<U, W, F>(&self, other: &Signal<U>, f: F) -> Signal<W>
    where
        U: Clone + PartialEq,
        W: Clone + PartialEq,
        F: Fn(&T, &U) -> W,
    {
        let mut result = Signal::new();
        let (Some(s1), Some(s2)) = (self.start(), other.start()) else {
            return result;
        };
        let start = s1.max(s2);
        let end = self.end.min(other.end);
        let (Some(mut i), Some(mut j)) = (self.index_at(start), other.index_at(start)) else {
            return result;
        };
        let mut time = start;
        loop {
            result.push(time, f(&self.segments[i].value, &other.segments[j].value));
            let next_i = self.segments.get(i + 1).map_or(f64::INFINITY, |s| s.start);
            let next_j = other.segments.get(j + 1).map_or(f64::INFINITY, |s| s.start);
            time = next_i.min(next_j);
            if time >= end {
                break;
            }
            if next_i == time {
                i += 1;
            }
            if next_j == time {
                j += 1;
            }
        }
        result.close(end);
        result
    }

    /// Running aggregation from the first segment on: the value at segment
    /// `k` is `f(v_k, f(v_{k-1}, ... f(v_0, init)))`.
    pub fn iterate_forward<U, F>(&self, f: F, init: U) -> Signal<U>
    where
        U: Clone + PartialEq,
        F: Fn(&T, &U) -> U,
    {
        let mut result = Signal::new();
        let mut acc = init;
        for segment in &self.segments {
            acc = f(&segment.value, &acc);
            result.push(segment.start, acc.clone());
        }
        result.close(self.end);
        result
    }

    /// Running aggregation from the last segment back to the first.
    pub fn iterate_backward<U, F>(&self, f: F, init: U) -> Signal<U>
    where
        U: Clone + PartialEq,
        F: Fn(&T, &U) -> U,
    {
        let mut values = Vec::with_capacity(self.segments.len());
        let mut acc = init;
        for segment in self.segments.iter().rev() {
            acc = f(&segment.value, &acc);
            values.push((segment.start, acc.clone()));
        }
        let mut result = Signal::new();
        for (start, value) in values.into_iter().rev() {
            result.push(start, value);
        }
        result.close(self.end);
        result
    }

    /// The part of the signal on `[from, to]`.
    pub fn restrict(&self, from: f64, to: f64) -> Signal<T> {
        let mut result = Signal::new();
        let Some(start) = self.start() else {
            return result;
        };
        let lo = from.max(start);
        let hi = to.min(self.end);
        let Some(first) = self.index_at(lo) else {
            return result;
        };
        if lo > hi {
            return result;
        }
        result.push(lo, self.segments[first].value.clone());
        for segment in self.segments.iter().skip(first + 1) {
            if segment.start >= hi {
                break;
            }
            result.push(segment.start, segment.value.clone());
        }
        result.close(hi);
        result
    }
}

impl<T: Clone + PartialEq> TimeSignal<T> for Signal<T> {
    fn value_at(&self, time: f64) -> Option<&T> {
        Signal::value_at(self, time)
    }

    fn start(&self) -> Option<f64> {
        Signal::start(self)
    }

    fn end(&self) -> Option<f64> {
        Signal::end(self)
    }

    fn refine(&mut self, _update: &Update<T>) -> Result<bool> {
        Err(MonitorError::unsupported(
            "offline signals are immutable once built and cannot be refined",
        ))
    }
}
