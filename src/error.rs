//! Error types for the monitoring engine.
//!
//! Every failure is surfaced to the caller immediately: a silently
//! miscomputed verdict or robustness value is never returned.

use thiserror::Error;

/// Errors raised while configuring or running a monitor.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MonitorError {
    /// The formula cannot be compiled against the registered atoms,
    /// distance functions or spatial setup.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Illegal construction of a signal, interval, update or model.
    #[error("invalid argument: {0}")]
    Argument(String),

    /// The receiver does not implement the requested capability.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// An online update widened a previously asserted bound.
    #[error("refinement violation at time {time}: {proposed} does not narrow {previous}")]
    RefinementViolation {
        time: f64,
        previous: String,
        proposed: String,
    },
}

impl MonitorError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        MonitorError::Configuration(message.into())
    }

    pub(crate) fn argument(message: impl Into<String>) -> Self {
        MonitorError::Argument(message.into())
    }

    pub(crate) fn unsupported(message: impl Into<String>) -> Self {
        MonitorError::UnsupportedOperation(message.into())
    }
}

pub type Result<T> = std::result::Result<T, MonitorError>;
