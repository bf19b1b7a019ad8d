//! Offline monitors.
//!
//! A monitor owns a [`Formula`] together with the functions that give it
//! meaning: atomic propositions map input values into the domain and, for
//! spatial formulas, named [`DistanceFunction`]s bound the spatial
//! operators. Both are checked against the formula when the monitor is
//! built, so evaluation cannot fail on a missing name.
//!
//! ```
//! use ostrel::signal::Signal;
//! use ostrel::strel::core::TimeInterval;
//! use ostrel::strel::formula_definition::Formula;
//! use ostrel::strel::monitor::TemporalMonitor;
//!
//! let formula = Formula::eventually(
//!     TimeInterval::new(0.0, 2.0).unwrap(),
//!     Formula::atom("high"),
//! );
//! let monitor = TemporalMonitor::builder()
//!     .formula(formula)
//!     .atom("high", |x: &f64| *x > 5.0)
//!     .build()
//!     .unwrap();
//!
//! let signal = Signal::from_samples([(0.0, 1.0), (3.0, 7.0), (4.0, 2.0), (10.0, 2.0)]).unwrap();
//! let verdict = monitor.monitor(&signal).unwrap();
//! assert_eq!(verdict.value_at(0.5), Some(&false));
//! assert_eq!(verdict.value_at(1.0), Some(&true));
//! ```

use crate::error::{MonitorError, Result};
use crate::signal::Signal;
use crate::signal::spatial::SpatialTemporalSignal;
use crate::space::LocationService;
use crate::space::distance::{DistanceDomain, DistanceFunction, DistanceSchedule};
use crate::strel::core::SignalDomain;
use crate::strel::formula_definition::Formula;
use crate::strel::operators::{boolean, spatial, temporal, until};

use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Maps an input value to the monitored domain.
pub type AtomFunction<V, R> = Arc<dyn Fn(&V) -> R + Send + Sync>;

/// Checks that every name used by `formula` is registered.
pub(crate) fn check_formula(
    formula: &Formula,
    has_atom: impl Fn(&str) -> bool,
    has_distance: Option<&dyn Fn(&str) -> bool>,
) -> Result<()> {
    if let Some(atom) = formula.atoms().into_iter().find(|a| !has_atom(a)) {
        return Err(MonitorError::configuration(format!(
            "formula references unknown atomic proposition '{atom}'"
        )));
    }
    match has_distance {
        None if formula.is_spatial() => Err(MonitorError::configuration(format!(
            "spatial operators are not available in a temporal monitor: {formula}"
        ))),
        None => Ok(()),
        Some(has_distance) => match formula.distances().into_iter().find(|d| !has_distance(d)) {
            Some(distance) => Err(MonitorError::configuration(format!(
                "formula references unknown distance function '{distance}'"
            ))),
            None => Ok(()),
        },
    }
}

/// Monitors a single signal over time.
pub struct TemporalMonitor<V, R> {
    formula: Formula,
    atoms: HashMap<String, AtomFunction<V, R>>,
}

impl<V: Clone + PartialEq + 'static, R: SignalDomain> TemporalMonitor<V, R> {
    pub fn builder() -> TemporalMonitorBuilder<V, R> {
        TemporalMonitorBuilder::new()
    }

    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    /// Evaluates the formula at every instant of `signal`.
    pub fn monitor(&self, signal: &Signal<V>) -> Result<Signal<R>> {
        let evaluator: Evaluator<'_, V, R, (), f64> = Evaluator {
            atoms: &self.atoms,
            spatial: None,
        };
        let mut result = evaluator.evaluate(&self.formula, std::slice::from_ref(signal))?;
        Ok(result.pop().unwrap_or_default())
    }
}

pub struct TemporalMonitorBuilder<V, R> {
    formula: Option<Formula>,
    atoms: HashMap<String, AtomFunction<V, R>>,
}

impl<V, R> Default for TemporalMonitorBuilder<V, R> {
    fn default() -> Self {
        TemporalMonitorBuilder {
            formula: None,
            atoms: HashMap::new(),
        }
    }
}

impl<V: Clone + PartialEq + 'static, R: SignalDomain> TemporalMonitorBuilder<V, R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn formula(mut self, formula: Formula) -> Self {
        self.formula = Some(formula);
        self
    }

    pub fn atom<F>(mut self, name: impl Into<String>, atom: F) -> Self
    where
        F: Fn(&V) -> R + Send + Sync + 'static,
    {
        self.atoms.insert(name.into(), Arc::new(atom));
        self
    }

    pub fn build(self) -> Result<TemporalMonitor<V, R>> {
        let formula = self
            .formula
            .ok_or_else(|| MonitorError::configuration("no formula given to the monitor"))?;
        check_formula(&formula, |a| self.atoms.contains_key(a), None)?;
        debug!(%formula, atoms = self.atoms.len(), "built temporal monitor");
        Ok(TemporalMonitor {
            formula,
            atoms: self.atoms,
        })
    }
}

/// Monitors a signal distributed over the locations of a spatial model.
pub struct SpatialTemporalMonitor<E, V, R, A = f64> {
    formula: Formula,
    atoms: HashMap<String, AtomFunction<V, R>>,
    distances: HashMap<String, DistanceFunction<E, A>>,
    parallel: bool,
}

impl<E, V, R, A> SpatialTemporalMonitor<E, V, R, A>
where
    E: 'static,
    V: Clone + PartialEq + 'static,
    R: SignalDomain,
    A: DistanceDomain,
{
    pub fn builder() -> SpatialTemporalMonitorBuilder<E, V, R, A> {
        SpatialTemporalMonitorBuilder::new()
    }

    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    /// Evaluates the formula at every location and instant of `signal`,
    /// following the spatial configurations of `service`.
    pub fn monitor(
        &self,
        service: &LocationService<E>,
        signal: &SpatialTemporalSignal<V>,
    ) -> Result<SpatialTemporalSignal<R>> {
        if signal.size() != service.size() {
            return Err(MonitorError::configuration(format!(
                "signal has {} locations but the spatial model has {}",
                signal.size(),
                service.size()
            )));
        }
        let distances = self
            .distances
            .iter()
            .map(|(name, function)| (name.clone(), function.schedule(service)))
            .collect();
        let evaluator = Evaluator {
            atoms: &self.atoms,
            spatial: Some(SpatialContext {
                distances,
                parallel: self.parallel,
            }),
        };
        let result = evaluator.evaluate(&self.formula, signal.signals())?;
        Ok(SpatialTemporalSignal::from_signals(result))
    }
}

pub struct SpatialTemporalMonitorBuilder<E, V, R, A = f64> {
    formula: Option<Formula>,
    atoms: HashMap<String, AtomFunction<V, R>>,
    distances: HashMap<String, DistanceFunction<E, A>>,
    parallel: bool,
}

impl<E, V, R, A> Default for SpatialTemporalMonitorBuilder<E, V, R, A> {
    fn default() -> Self {
        SpatialTemporalMonitorBuilder {
            formula: None,
            atoms: HashMap::new(),
            distances: HashMap::new(),
            parallel: false,
        }
    }
}

impl<E, V, R, A> SpatialTemporalMonitorBuilder<E, V, R, A>
where
    E: 'static,
    V: Clone + PartialEq + 'static,
    R: SignalDomain,
    A: DistanceDomain,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn formula(mut self, formula: Formula) -> Self {
        self.formula = Some(formula);
        self
    }

    pub fn atom<F>(mut self, name: impl Into<String>, atom: F) -> Self
    where
        F: Fn(&V) -> R + Send + Sync + 'static,
    {
        self.atoms.insert(name.into(), Arc::new(atom));
        self
    }

    pub fn distance(mut self, name: impl Into<String>, function: DistanceFunction<E, A>) -> Self {
        self.distances.insert(name.into(), function);
        self
    }

    /// Aggregates somewhere/everywhere across locations in parallel.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn build(self) -> Result<SpatialTemporalMonitor<E, V, R, A>> {
        let formula = self
            .formula
            .ok_or_else(|| MonitorError::configuration("no formula given to the monitor"))?;
        let has_distance = |d: &str| self.distances.contains_key(d);
        check_formula(&formula, |a| self.atoms.contains_key(a), Some(&has_distance))?;
        debug!(
            %formula,
            atoms = self.atoms.len(),
            distances = self.distances.len(),
            parallel = self.parallel,
            "built spatio-temporal monitor"
        );
        Ok(SpatialTemporalMonitor {
            formula,
            atoms: self.atoms,
            distances: self.distances,
            parallel: self.parallel,
        })
    }
}

/// Distance structures of one monitoring run, built once per snapshot and
/// shared by every spatial node naming the same distance.
struct SpatialContext<E, A> {
    distances: HashMap<String, DistanceSchedule<E, A>>,
    parallel: bool,
}

impl<E, A> SpatialContext<E, A> {
    fn distance(&self, name: &str) -> Result<&DistanceSchedule<E, A>> {
        self.distances.get(name).ok_or_else(|| {
            MonitorError::configuration(format!("unknown distance function '{name}'"))
        })
    }
}

/// Recursive evaluation, one signal per location at every node.
struct Evaluator<'a, V, R, E, A> {
    atoms: &'a HashMap<String, AtomFunction<V, R>>,
    spatial: Option<SpatialContext<E, A>>,
}

impl<V, R, E, A> Evaluator<'_, V, R, E, A>
where
    V: Clone + PartialEq + 'static,
    R: SignalDomain,
    E: 'static,
    A: DistanceDomain,
{
    fn evaluate(&self, formula: &Formula, input: &[Signal<V>]) -> Result<Vec<Signal<R>>> {
        match formula {
            Formula::Atomic(name) => {
                let atom = self.atoms.get(name).ok_or_else(|| {
                    MonitorError::configuration(format!("unknown atomic proposition '{name}'"))
                })?;
                Ok(input.iter().map(|s| s.apply(|v| atom(v))).collect())
            }
            Formula::Not(f) => self.unary(f, input, boolean::negation),
            Formula::And(l, r) => self.binary(l, r, input, boolean::conjunction),
            Formula::Or(l, r) => self.binary(l, r, input, boolean::disjunction),
            Formula::Implies(l, r) => self.binary(l, r, input, boolean::implication),
            Formula::Eventually(i, f) => self.unary(f, input, |s| temporal::eventually(s, i.as_ref())),
            Formula::Globally(i, f) => self.unary(f, input, |s| temporal::globally(s, i.as_ref())),
            Formula::Once(i, f) => self.unary(f, input, |s| temporal::once(s, i.as_ref())),
            Formula::Historically(i, f) => {
                self.unary(f, input, |s| temporal::historically(s, i.as_ref()))
            }
            Formula::Until(i, l, r) => {
                self.binary(l, r, input, |p, q| until::until(p, q, i.as_ref()))
            }
            Formula::Since(i, l, r) => {
                self.binary(l, r, input, |p, q| until::since(p, q, i.as_ref()))
            }
            Formula::Somewhere(d, f) => {
                let context = self.context()?;
                let values = self.evaluate(f, input)?;
                spatial::somewhere(context.distance(d)?, &values, context.parallel)
            }
            Formula::Everywhere(d, f) => {
                let context = self.context()?;
                let values = self.evaluate(f, input)?;
                spatial::everywhere(context.distance(d)?, &values, context.parallel)
            }
            Formula::Escape(d, f) => {
                let context = self.context()?;
                let values = self.evaluate(f, input)?;
                spatial::escape(context.distance(d)?, &values)
            }
            Formula::Reach(d, l, r) => {
                let context = self.context()?;
                let lhs = self.evaluate(l, input)?;
                let rhs = self.evaluate(r, input)?;
                spatial::reach(context.distance(d)?, &lhs, &rhs)
            }
        }
    }

    fn context(&self) -> Result<&SpatialContext<E, A>> {
        self.spatial.as_ref().ok_or_else(|| {
            MonitorError::configuration("spatial operators need a spatio-temporal monitor")
        })
    }

    fn unary<F>(&self, f: &Formula, input: &[Signal<V>], op: F) -> Result<Vec<Signal<R>>>
    where
        F: Fn(&Signal<R>) -> Signal<R>,
    {
        Ok(self.evaluate(f, input)?.iter().map(op).collect())
    }

    fn binary<F>(&self, l: &Formula, r: &Formula, input: &[Signal<V>], op: F) -> Result<Vec<Signal<R>>>
    where
        F: Fn(&Signal<R>, &Signal<R>) -> Signal<R>,
    {
        let lhs = self.evaluate(l, input)?;
        let rhs = self.evaluate(r, input)?;
        Ok(lhs.iter().zip(&rhs).map(|(p, q)| op(p, q)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::GraphModel;
    use crate::strel::core::TimeInterval;
    use pretty_assertions::assert_eq;

    #[test]
    fn unknown_atom_fails_at_build_time() {
        let result = TemporalMonitor::<f64, bool>::builder()
            .formula(Formula::and(Formula::atom("a"), Formula::atom("b")))
            .atom("a", |x: &f64| *x > 0.0)
            .build();
        assert!(matches!(result, Err(MonitorError::Configuration(m)) if m.contains("'b'")));
    }

    #[test]
    fn temporal_monitor_rejects_spatial_formulas() {
        let result = TemporalMonitor::<f64, bool>::builder()
            .formula(Formula::somewhere("d", Formula::atom("a")))
            .atom("a", |x: &f64| *x > 0.0)
            .build();
        assert!(matches!(result, Err(MonitorError::Configuration(_))));
    }

    #[test]
    fn missing_formula_is_reported() {
        assert!(TemporalMonitor::<f64, f64>::builder().build().is_err());
    }

    #[test]
    fn robustness_of_nested_formula() {
        let monitor = TemporalMonitor::builder()
            .formula(Formula::globally(
                TimeInterval::new(0.0, 1.0).unwrap(),
                Formula::implies(Formula::atom("x>1"), Formula::atom("x<4")),
            ))
            .atom("x>1", |x: &f64| x - 1.0)
            .atom("x<4", |x: &f64| 4.0 - x)
            .build()
            .unwrap();
        let signal =
            Signal::from_samples([(0.0, 0.0), (1.0, 3.0), (2.0, 5.0), (3.0, 2.0), (5.0, 2.0)])
                .unwrap();
        let out = monitor.monitor(&signal).unwrap();
        // the implication reduces to 4 - x: 4, 1, -1, 2 per segment
        assert_eq!(out.end(), Some(4.0));
        assert_eq!(out.sample(&[0.0, 0.5, 1.0, 2.0, 3.0]), vec![
            Some(1.0),
            Some(1.0),
            Some(-1.0),
            Some(-1.0),
            Some(2.0)
        ]);
    }

    #[test]
    fn spatial_monitor_needs_registered_distances() {
        let result = SpatialTemporalMonitor::<f64, f64, bool>::builder()
            .formula(Formula::somewhere("near", Formula::atom("a")))
            .atom("a", |x: &f64| *x > 0.0)
            .build();
        assert!(matches!(result, Err(MonitorError::Configuration(m)) if m.contains("near")));
    }

    #[test]
    fn somewhere_eventually() {
        let monitor = SpatialTemporalMonitor::builder()
            .formula(Formula::somewhere(
                "near",
                Formula::eventually(TimeInterval::new(0.0, 1.0).unwrap(), Formula::atom("hot")),
            ))
            .atom("hot", |t: &f64| *t > 30.0)
            .distance("near", DistanceFunction::up_to(|w: &f64| *w, 1.0).unwrap())
            .parallel(true)
            .build()
            .unwrap();
        let service =
            LocationService::constant(GraphModel::from_edges(2, [(0, 1, 1.0)]).unwrap());
        let mut signal = SpatialTemporalSignal::new(2);
        signal.add(0.0, vec![20.0, 20.0]).unwrap();
        signal.add(2.0, vec![20.0, 35.0]).unwrap();
        signal.add(3.0, vec![20.0, 20.0]).unwrap();
        signal.end_at(6.0).unwrap();
        let out = monitor.monitor(&service, &signal).unwrap();
        assert_eq!(out.sample(0, &[0.5, 1.0, 2.5, 3.5]), vec![
            Some(false),
            Some(true),
            Some(true),
            Some(false)
        ]);
        assert_eq!(out.sample(1, &[0.5, 1.0]), vec![Some(false), Some(true)]);
    }

    #[test]
    fn spatial_nodes_share_distance_matrices() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let evaluations = |formula: Formula| {
            let calls = Arc::new(AtomicUsize::new(0));
            let counter = Arc::clone(&calls);
            let near = DistanceFunction::up_to(
                move |w: &f64| {
                    counter.fetch_add(1, Ordering::Relaxed);
                    *w
                },
                1.0,
            )
            .unwrap();
            let monitor = SpatialTemporalMonitor::builder()
                .formula(formula)
                .atom("hot", |t: &f64| *t > 30.0)
                .distance("near", near)
                .build()
                .unwrap();
            let service = LocationService::constant(
                GraphModel::from_edges(3, [(0, 1, 1.0), (1, 2, 1.0)]).unwrap(),
            );
            let times: Vec<f64> = (0..10).map(f64::from).collect();
            let signal =
                SpatialTemporalSignal::from_fn(3, &times, |l, t| 25.0 + (l as f64 + t) % 10.0).unwrap();
            monitor.monitor(&service, &signal).unwrap();
            calls.load(Ordering::Relaxed)
        };
        let single = evaluations(Formula::somewhere("near", Formula::atom("hot")));
        let shared = evaluations(Formula::and(
            Formula::somewhere("near", Formula::atom("hot")),
            Formula::everywhere("near", Formula::not(Formula::atom("hot"))),
        ));
        assert!(single > 0);
        assert_eq!(shared, single);
    }
}
