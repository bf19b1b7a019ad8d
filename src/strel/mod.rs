//! Spatio-temporal reach/escape logic.
//!
//! - [`core`]: value domains and time intervals.
//! - [`formula_definition`]: the formula AST.
//! - [`operators`]: offline signal transforms for every operator.
//! - [`monitor`]: offline monitors and their builders.

pub mod core;
pub mod formula_definition;
pub mod monitor;
pub mod operators;
