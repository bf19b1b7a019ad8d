//! Cursors over [`Signal`]s.

use super::Signal;

/// A position inside a signal: a time instant and the segment holding it.
///
/// Steps move between segment starts in O(1); [`SignalCursor::move_to`] and
/// [`SignalCursor::jump`] walk the chain and cost O(distance).
#[derive(Clone, Debug)]
pub struct SignalCursor<'a, T> {
    signal: &'a Signal<T>,
    index: usize,
    time: f64,
    completed: bool,
}

impl<'a, T: Clone + PartialEq> SignalCursor<'a, T> {
    /// A cursor on the first segment.
    pub fn forward(signal: &'a Signal<T>) -> Self {
        SignalCursor {
            signal,
            index: 0,
            time: signal.start().unwrap_or(f64::NAN),
            completed: signal.is_empty(),
        }
    }

    /// A cursor on the start of the last segment.
    pub fn backward(signal: &'a Signal<T>) -> Self {
        let index = signal.size().saturating_sub(1);
        SignalCursor {
            signal,
            index,
            time: if signal.is_empty() {
                f64::NAN
            } else {
                signal.segment(index).start
            },
            completed: signal.is_empty(),
        }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn value(&self) -> Option<&'a T> {
        (!self.completed).then(|| &self.signal.segment(self.index).value)
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn has_next(&self) -> bool {
        !self.completed && self.index + 1 < self.signal.size()
    }

    pub fn has_previous(&self) -> bool {
        !self.completed && (self.index > 0 || self.time > self.signal.segment(self.index).start)
    }

    /// Moves to the start of the next segment, completing past the last one.
    pub fn forward_step(&mut self) {
        if self.completed {
            return;
        }
        if self.index + 1 < self.signal.size() {
            self.index += 1;
            self.time = self.signal.segment(self.index).start;
        } else {
            self.completed = true;
        }
    }

    /// Moves to the start of the current segment, or of the previous one when
    /// already there, completing before the first.
    pub fn backward_step(&mut self) {
        if self.completed {
            return;
        }
        let start = self.signal.segment(self.index).start;
        if self.time > start {
            self.time = start;
        } else if self.index > 0 {
            self.index -= 1;
            self.time = self.signal.segment(self.index).start;
        } else {
            self.completed = true;
        }
    }

    /// Time of the next change, falling back to the signal end.
    pub fn next_time(&self) -> f64 {
        if self.signal.is_empty() {
            return f64::NAN;
        }
        self.signal.segment_end(self.index)
    }

    /// Time of the previous change, falling back to the signal start.
    pub fn previous_time(&self) -> f64 {
        if self.signal.is_empty() {
            return f64::NAN;
        }
        let start = self.signal.segment(self.index).start;
        if self.time > start || self.index == 0 {
            start
        } else {
            self.signal.segment(self.index - 1).start
        }
    }

    /// Places the cursor at `time`, completing it when `time` lies outside
    /// the signal.
    pub fn move_to(&mut self, time: f64) {
        let (Some(start), Some(end)) = (self.signal.start(), self.signal.end()) else {
            self.completed = true;
            return;
        };
        if time < start || time > end {
            self.completed = true;
            return;
        }
        while self.index + 1 < self.signal.size() && self.signal.segment(self.index + 1).start <= time {
            self.index += 1;
        }
        while self.index > 0 && self.signal.segment(self.index).start > time {
            self.index -= 1;
        }
        self.time = time;
        self.completed = false;
    }

    /// Places the cursor at the start of the segment holding `time`.
    pub fn jump(&mut self, time: f64) {
        self.move_to(time);
        if !self.completed {
            self.time = self.signal.segment(self.index).start;
        }
    }
}

impl<'a, T: Clone + PartialEq> Iterator for SignalCursor<'a, T> {
    type Item = (f64, &'a T);

    /// Yields `(segment start, value)` and steps forward.
    fn next(&mut self) -> Option<Self::Item> {
        let value = self.value()?;
        let item = (self.time, value);
        self.forward_step();
        Some(item)
    }
}

/// One cursor per location, kept on a common time instant.
///
/// At every time returned by [`ParallelSignalCursor::forward_time`] all
/// locations hold a valid value, so a spatial snapshot can be read off
/// [`ParallelSignalCursor::values`].
#[derive(Clone, Debug)]
pub struct ParallelSignalCursor<'a, T> {
    cursors: Vec<SignalCursor<'a, T>>,
    time: f64,
    end: f64,
    completed: bool,
}

impl<'a, T: Clone + PartialEq> ParallelSignalCursor<'a, T> {
    /// Starts at the latest start among `signals`; completed at once when
    /// their domains have no common instant.
    pub fn new(signals: &'a [Signal<T>]) -> Self {
        let start = signals
            .iter()
            .filter_map(Signal::start)
            .fold(f64::NEG_INFINITY, f64::max);
        let end = signals
            .iter()
            .filter_map(Signal::end)
            .fold(f64::INFINITY, f64::min);
        let mut cursors: Vec<_> = signals.iter().map(SignalCursor::forward).collect();
        let completed =
            signals.is_empty() || signals.iter().any(Signal::is_empty) || start > end;
        if !completed {
            for cursor in &mut cursors {
                cursor.move_to(start);
            }
        }
        ParallelSignalCursor {
            cursors,
            time: start,
            end,
            completed,
        }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// End of the common domain.
    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    /// The value of every location at the current time.
    pub fn values(&self) -> Vec<&'a T> {
        self.cursors.iter().filter_map(SignalCursor::value).collect()
    }

    /// Earliest next change among all locations, capped at the common end.
    pub fn next_time(&self) -> f64 {
        self.cursors
            .iter()
            .map(SignalCursor::next_time)
            .fold(self.end, f64::min)
    }

    /// Advances every location to the earliest next change and returns it.
    /// Reaching the common end completes the cursor.
    pub fn forward_time(&mut self) -> f64 {
        if self.completed {
            return self.time;
        }
        let next = self.next_time();
        if next >= self.end {
            self.time = self.end;
            self.completed = true;
        } else {
            self.move_to(next);
        }
        self.time
    }

    /// Places every location at `time`, which must not precede the current one.
    pub fn move_to(&mut self, time: f64) {
        if time > self.end {
            self.completed = true;
            return;
        }
        for cursor in &mut self.cursors {
            cursor.move_to(time);
        }
        self.time = time;
    }
}
