//! Online monitoring over partially known signals.
//!
//! Inputs arrive as [`update::Update`]s in any order; verdicts are
//! [`crate::strel::core::AbstractInterval`]s that start unknown and narrow
//! monotonically as evidence accumulates.

pub mod monitor;
pub(crate) mod node;
pub mod signal;
pub mod time_chain;
pub mod update;
