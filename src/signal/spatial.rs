//! Signals distributed over the locations of a spatial model.

use super::Signal;
use super::cursor::ParallelSignalCursor;
use crate::error::{MonitorError, Result};

/// One [`Signal`] per location. The number of locations is fixed at
/// construction.
#[derive(Clone, Debug, PartialEq)]
pub struct SpatialTemporalSignal<T> {
    signals: Vec<Signal<T>>,
}

impl<T: Clone + PartialEq> SpatialTemporalSignal<T> {
    /// `size` empty signals.
    pub fn new(size: usize) -> Self {
        SpatialTemporalSignal {
            signals: (0..size).map(|_| Signal::new()).collect(),
        }
    }

    pub fn from_signals(signals: Vec<Signal<T>>) -> Self {
        SpatialTemporalSignal { signals }
    }

    /// Samples `f(location, time)` at each of `times`.
    pub fn from_fn<F>(size: usize, times: &[f64], f: F) -> Result<Self>
    where
        F: Fn(usize, f64) -> T,
    {
        let mut result = SpatialTemporalSignal::new(size);
        for &time in times {
            let values = (0..size).map(|l| f(l, time)).collect();
            result.add(time, values)?;
        }
        Ok(result)
    }

    /// Appends one value per location at `time`.
    pub fn add(&mut self, time: f64, values: Vec<T>) -> Result<()> {
        if values.len() != self.signals.len() {
            return Err(MonitorError::argument(format!(
                "expected {} location values, got {}",
                self.signals.len(),
                values.len()
            )));
        }
        for (signal, value) in self.signals.iter().zip(&values) {
            signal.check_add(time, value)?;
        }
        for (signal, value) in self.signals.iter_mut().zip(values) {
            signal.add(time, value)?;
        }
        Ok(())
    }

    pub fn end_at(&mut self, time: f64) -> Result<()> {
        for signal in &mut self.signals {
            signal.end_at(time)?;
        }
        Ok(())
    }

    /// Number of locations.
    pub fn size(&self) -> usize {
        self.signals.len()
    }

    pub fn signal(&self, location: usize) -> Option<&Signal<T>> {
        self.signals.get(location)
    }

    pub fn signals(&self) -> &[Signal<T>] {
        &self.signals
    }

    pub fn into_signals(self) -> Vec<Signal<T>> {
        self.signals
    }

    /// Snapshot of every location at `time`; `None` if any location is
    /// undefined there.
    pub fn values_at(&self, time: f64) -> Option<Vec<T>> {
        self.signals
            .iter()
            .map(|s| s.value_at(time).cloned())
            .collect()
    }

    /// Values of `location` at each of `times`.
    pub fn sample(&self, location: usize, times: &[f64]) -> Vec<Option<T>> {
        self.signals
            .get(location)
            .map_or_else(|| vec![None; times.len()], |s| s.sample(times))
    }

    pub fn apply<U, F>(&self, f: F) -> SpatialTemporalSignal<U>
    where
        U: Clone + PartialEq,
        F: Fn(&T) -> U,
    {
        SpatialTemporalSignal {
            signals: self.signals.iter().map(|s| s.apply(&f)).collect(),
        }
    }

    pub fn apply_binary<U, W, F>(
        &self,
        other: &SpatialTemporalSignal<U>,
        f: F,
    ) -> Result<SpatialTemporalSignal<W>>
    where
        U: Clone + PartialEq,
        W: Clone + PartialEq,
        F: Fn(&T, &U) -> W,
    {
        if self.size() != other.size() {
            return Err(MonitorError::argument(format!(
                "location counts differ: {} and {}",
                self.size(),
                other.size()
            )));
        }
        Ok(SpatialTemporalSignal {
            signals: self
                .signals
                .iter()
                .zip(&other.signals)
                .map(|(a, b)| a.apply_binary(b, &f))
                .collect(),
        })
    }

    pub fn cursor(&self) -> ParallelSignalCursor<'_, T> {
        ParallelSignalCursor::new(&self.signals)
    }
}
