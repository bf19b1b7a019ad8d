//! Contiguous chains of constant segments over half-open time domains.
//!
//! A [`TimeChain`] is both the unit of batched input (a run of adjacent
//! [`Update`]s) and the state of every online signal, which narrows it in
//! place through [`TimeChain::refine`].

use super::update::Update;
use crate::error::{MonitorError, Result};
use crate::signal::{Segment, Signal};

use std::fmt::Display;
use tracing::warn;

/// Segments partitioning `[start, end)`; adjacent values differ.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeChain<V> {
    segments: Vec<Segment<V>>,
    end: f64,
}

impl<V> Default for TimeChain<V> {
    fn default() -> Self {
        TimeChain {
            segments: Vec::new(),
            end: f64::NAN,
        }
    }
}

impl<V: Clone + PartialEq> TimeChain<V> {
    /// `value` on `[start, end)`; empty when `start >= end`.
    pub fn constant(start: f64, end: f64, value: V) -> Self {
        if start < end {
            TimeChain {
                segments: vec![Segment { start, value }],
                end,
            }
        } else {
            TimeChain::default()
        }
    }

    /// Chains adjacent updates; each must start where the previous ended.
    pub fn from_updates<I>(updates: I) -> Result<Self>
    where
        I: IntoIterator<Item = Update<V>>,
    {
        let mut chain = TimeChain::default();
        for update in updates {
            chain.push(update)?;
        }
        Ok(chain)
    }

    pub fn push(&mut self, update: Update<V>) -> Result<()> {
        if !self.segments.is_empty() && update.start != self.end {
            return Err(MonitorError::argument(format!(
                "update starting at {} does not continue the chain ending at {}",
                update.start, self.end
            )));
        }
        if self.segments.last().is_none_or(|last| last.value != update.value) {
            self.segments.push(Segment {
                start: update.start,
                value: update.value,
            });
        }
        self.end = update.end;
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn start(&self) -> Option<f64> {
        self.segments.first().map(|s| s.start)
    }

    pub fn end(&self) -> Option<f64> {
        (!self.segments.is_empty()).then_some(self.end)
    }

    fn segment_end(&self, index: usize) -> f64 {
        self.segments
            .get(index + 1)
            .map_or(self.end, |next| next.start)
    }

    fn index_at(&self, time: f64) -> Option<usize> {
        let start = self.start()?;
        if time < start || time >= self.end {
            return None;
        }
        Some(self.segments.partition_point(|s| s.start <= time) - 1)
    }

    pub fn value_at(&self, time: f64) -> Option<&V> {
        self.index_at(time).map(|i| &self.segments[i].value)
    }

    /// `(start, end, value)` for every segment.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64, &V)> + '_ {
        (0..self.segments.len()).map(|i| {
            (
                self.segments[i].start,
                self.segment_end(i),
                &self.segments[i].value,
            )
        })
    }

    pub fn to_updates(&self) -> Vec<Update<V>> {
        self.iter()
            .map(|(start, end, value)| Update {
                start,
                end,
                value: value.clone(),
            })
            .collect()
    }

    /// The sub-chain on `[from, to)`.
    pub fn select(&self, from: f64, to: f64) -> TimeChain<V> {
        let Some(start) = self.start() else {
            return TimeChain::default();
        };
        let lo = from.max(start);
        let hi = to.min(self.end);
        let Some(first) = self.index_at(lo) else {
            return TimeChain::default();
        };
        if lo >= hi {
            return TimeChain::default();
        }
        let mut segments = vec![Segment {
            start: lo,
            value: self.segments[first].value.clone(),
        }];
        segments.extend(
            self.segments[first + 1..]
                .iter()
                .take_while(|s| s.start < hi)
                .cloned(),
        );
        TimeChain { segments, end: hi }
    }

    /// The chain as an offline signal on `[start, end]`.
    pub fn to_signal(&self) -> Signal<V> {
        let mut signal = Signal::new();
        for segment in &self.segments {
            signal.push(segment.start, segment.value.clone());
        }
        signal.close(self.end);
        signal
    }

    /// Replaces the values on the update's span (clipped to the chain) by the
    /// update's value, provided `refinable(old, new)` holds for every value
    /// it covers. Returns whether the chain changed.
    ///
    /// A segment the span starts inside is split; segments inside the span
    /// are replaced; a segment the span ends inside keeps its tail.
    pub fn refine<F>(&mut self, update: &Update<V>, refinable: F) -> Result<bool>
    where
        V: Display,
        F: Fn(&V, &V) -> bool,
    {
        let Some(start) = self.start() else {
            return Ok(false);
        };
        let s = update.start.max(start);
        let e = update.end.min(self.end);
        if s >= e {
            return Ok(false);
        }
        let first = self.segments.partition_point(|g| g.start <= s) - 1;
        let last = self.segments.partition_point(|g| g.start < e) - 1;
        if let Some(violated) =
            (first..=last).find(|&k| !refinable(&self.segments[k].value, &update.value))
        {
            let previous = &self.segments[violated];
            let time = previous.start.max(s);
            warn!(time, previous = %previous.value, proposed = %update.value, "refinement violation");
            return Err(MonitorError::RefinementViolation {
                time,
                previous: previous.value.to_string(),
                proposed: update.value.to_string(),
            });
        }
        if (first..=last).all(|k| self.segments[k].value == update.value) {
            return Ok(false);
        }

        let last_end = self.segment_end(last);
        let mut replacement = Vec::with_capacity(3);
        if self.segments[first].start < s {
            replacement.push(self.segments[first].clone());
        }
        replacement.push(Segment {
            start: s,
            value: update.value.clone(),
        });
        if e < last_end {
            replacement.push(Segment {
                start: e,
                value: self.segments[last].value.clone(),
            });
        }
        let inserted = replacement.len();
        self.segments.splice(first..=last, replacement);
        self.merge_between(first, first + inserted);
        Ok(true)
    }

    /// Merges equal neighbours among segments `lo - 1 ..= hi`.
    fn merge_between(&mut self, lo: usize, hi: usize) {
        let upper = hi.min(self.segments.len() - 1);
        for k in (lo.max(1)..=upper).rev() {
            if self.segments[k].value == self.segments[k - 1].value {
                self.segments.remove(k);
            }
        }
    }
}
