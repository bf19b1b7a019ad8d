//! # ostrel - Offline and online Spatio-Temporal Reach and Escape Logic
//!
//! `ostrel` monitors temporal and spatio-temporal properties of
//! piecewise-constant signals.
//!
//! It includes:
//! - signals over generic value domains (boolean, robustness, intervals),
//! - offline monitors for temporal formulas and for spatial models whose
//!   topology changes over time,
//! - reach, escape, somewhere and everywhere over weighted graphs and grids,
//! - online monitors that refine interval verdicts as updates arrive, and
//! - statistical summaries of verdicts over many sampled trajectories.
//!
//! ## Simple usage
//!
//! ```
//! use ostrel::online::monitor::OnlineTimeMonitor;
//! use ostrel::online::update::Update;
//! use ostrel::strel::core::{AbstractInterval, TimeInterval};
//! use ostrel::strel::formula_definition::Formula;
//!
//! let formula = Formula::globally(TimeInterval::new(0.0, 2.0).unwrap(), Formula::atom("x>5"));
//! let mut monitor = OnlineTimeMonitor::builder()
//!     .formula(formula)
//!     .atom("x>5", |x: &f64| x - 5.0)
//!     .horizon(10.0)
//!     .build()
//!     .unwrap();
//!
//! // Updates may arrive in any order.
//! monitor.monitor(&Update::new(2.0, 4.0, 6.0).unwrap()).unwrap();
//! monitor.monitor(&Update::new(0.0, 2.0, 7.0).unwrap()).unwrap();
//!
//! assert_eq!(monitor.result().value_at(0.0), Some(&AbstractInterval::point(1.0)));
//! ```

pub mod error;
pub mod online;
pub mod signal;
pub mod space;
pub mod statistics;
pub mod strel;
