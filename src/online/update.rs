//! Incremental claims about a signal.

use crate::error::{MonitorError, Result};

/// "`value` holds on `[start, end)`".
#[derive(Clone, Debug, PartialEq)]
pub struct Update<V> {
    pub(crate) start: f64,
    pub(crate) end: f64,
    pub(crate) value: V,
}

impl<V> Update<V> {
    /// Fails unless `start` is finite and `start < end`; `end` may be
    /// infinite.
    pub fn new(start: f64, end: f64, value: V) -> Result<Self> {
        if !start.is_finite() || end.is_nan() || start >= end {
            return Err(MonitorError::argument(format!(
                "update span [{start}, {end}) is empty or malformed"
            )));
        }
        Ok(Update { start, end, value })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn into_value(self) -> V {
        self.value
    }

    pub fn map<U>(&self, f: impl FnOnce(&V) -> U) -> Update<U> {
        Update {
            start: self.start,
            end: self.end,
            value: f(&self.value),
        }
    }
}
