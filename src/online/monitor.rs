//! Online monitors.
//!
//! The formula is compiled into a node graph ([`super::node`]); every node
//! keeps one [`OnlineSignal`] per location, initially unknown on the node's
//! domain. An input update narrows the atomic nodes and is then pushed
//! through the graph: each node recomputes only the span its children's
//! changes can influence, reusing the offline operators over the interval
//! domain, and refines its own signal with the result. Verdicts therefore
//! only ever narrow, and once every input is known they coincide with the
//! offline verdicts.

use super::node::{Node, NodeId, Operator, compile, merge};
use super::signal::OnlineSignal;
use super::time_chain::TimeChain;
use super::update::Update;
use crate::error::{MonitorError, Result};
use crate::signal::{Signal, TimeSignal};
use crate::space::LocationService;
use crate::space::distance::{DistanceDomain, DistanceFunction, DistanceSchedule};
use crate::strel::core::{AbstractInterval, SignalDomain};
use crate::strel::formula_definition::Formula;
use crate::strel::monitor::check_formula;
use crate::strel::operators::sliding_window::{Direction, slide};
use crate::strel::operators::{boolean, spatial, temporal, until};

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// Maps an input value to an interval of the monitored domain.
pub type IntervalAtom<V, R> = Arc<dyn Fn(&V) -> AbstractInterval<R> + Send + Sync>;

type Verdict<R> = AbstractInterval<R>;

/// Distance structures per snapshot, built once and kept across updates.
struct SpatialSetup<E, A> {
    distances: HashMap<String, DistanceSchedule<E, A>>,
}

struct Engine<E, V, R, A> {
    formula: Formula,
    nodes: Vec<Node>,
    root: NodeId,
    /// `signals[node][location]`
    signals: Vec<Vec<OnlineSignal<R>>>,
    atoms: HashMap<String, IntervalAtom<V, R>>,
    spatial: Option<SpatialSetup<E, A>>,
    locations: usize,
}

impl<E, V, R, A> Engine<E, V, R, A>
where
    E: 'static,
    R: SignalDomain,
    A: DistanceDomain,
{
    fn new(
        formula: Formula,
        atoms: HashMap<String, IntervalAtom<V, R>>,
        spatial: Option<SpatialSetup<E, A>>,
        locations: usize,
        horizon: f64,
    ) -> Self {
        let compiled = compile(&formula, horizon);
        let signals = compiled
            .nodes
            .iter()
            .map(|n| vec![OnlineSignal::new(n.from, n.to); locations])
            .collect();
        Engine {
            formula,
            nodes: compiled.nodes,
            root: compiled.root,
            signals,
            atoms,
            spatial,
            locations,
        }
    }

    fn root(&self) -> &[OnlineSignal<R>] {
        &self.signals[self.root]
    }

    /// Feeds `values` (one per location) on `[start, end)` and returns the
    /// root updates per location.
    fn process(&mut self, start: f64, end: f64, values: &[V]) -> Result<Vec<Vec<Update<Verdict<R>>>>> {
        trace!(start, end, nodes = self.nodes.len(), "processing update");
        let mut changes: Vec<Vec<Vec<(f64, f64)>>> = Vec::with_capacity(self.nodes.len());
        let mut emitted = vec![Vec::new(); self.locations];
        for id in 0..self.nodes.len() {
            let outputs = self.recompute(id, start, end, values, &changes)?;
            let mut changed = vec![Vec::new(); self.locations];
            for (location, signal) in outputs {
                for (s, e, value) in signal.segments() {
                    if s >= e {
                        continue;
                    }
                    let update = Update {
                        start: s,
                        end: e,
                        value: value.clone(),
                    };
                    if self.signals[id][location].refine(&update)? {
                        changed[location].push((s, e));
                        if id == self.root {
                            emitted[location].push(update);
                        }
                    }
                }
            }
            changes.push(changed);
        }
        Ok(emitted)
    }

    /// New values of node `id`, per location, over the spans affected by
    /// the changes recorded so far.
    fn recompute(
        &self,
        id: NodeId,
        start: f64,
        end: f64,
        values: &[V],
        changes: &[Vec<Vec<(f64, f64)>>],
    ) -> Result<Vec<(usize, Signal<Verdict<R>>)>> {
        let node = &self.nodes[id];
        if node.is_empty() {
            return Ok(Vec::new());
        }
        if let Operator::Atomic(name) = &node.operator {
            let (p, q) = (start.max(node.from), end.min(node.to));
            if p >= q {
                return Ok(Vec::new());
            }
            let atom = self.atoms.get(name).ok_or_else(|| {
                MonitorError::configuration(format!("unknown atomic proposition '{name}'"))
            })?;
            return Ok(values
                .iter()
                .enumerate()
                .map(|(location, value)| {
                    let mut signal = Signal::new();
                    signal.push(p, atom(value));
                    signal.close(q);
                    (location, signal)
                })
                .collect());
        }

        let children = node.operator.children();
        let spans_at = |location: usize| {
            children
                .iter()
                .flat_map(|c| changes[*c][location].iter())
                .filter_map(|&(s, e)| node.affected(s, e))
                .collect::<Vec<_>>()
        };
        let mut outputs = Vec::new();
        if node.operator.is_spatial() {
            let spans = merge((0..self.locations).flat_map(spans_at).collect());
            for (p, q) in spans {
                trace!(node = id, from = p, to = q, "recomputing spatial node");
                outputs.extend(self.spatial_span(node, p, q)?.into_iter().enumerate());
            }
        } else {
            for location in 0..self.locations {
                for (p, q) in merge(spans_at(location)) {
                    trace!(node = id, location, from = p, to = q, "recomputing node");
                    outputs.push((location, self.temporal_span(node, location, p, q)));
                }
            }
        }
        Ok(outputs)
    }

    fn temporal_span(&self, node: &Node, location: usize, p: f64, q: f64) -> Signal<Verdict<R>> {
        let slice = |c: &NodeId, from: f64, to: f64| self.signals[*c][location].slice(from, to);
        let from = |c: &NodeId| self.nodes[*c].from;
        let to = |c: &NodeId| self.nodes[*c].to;
        let disjunction = <Verdict<R> as SignalDomain>::disjunction;
        let conjunction = <Verdict<R> as SignalDomain>::conjunction;
        let result = match &node.operator {
            Operator::Not(c) => boolean::negation(&slice(c, p, q)),
            Operator::And(l, r) => boolean::conjunction(&slice(l, p, q), &slice(r, p, q)),
            Operator::Or(l, r) => boolean::disjunction(&slice(l, p, q), &slice(r, p, q)),
            Operator::Implies(l, r) => boolean::implication(&slice(l, p, q), &slice(r, p, q)),
            Operator::Eventually(Some(i), c) => {
                let input = slice(c, p + i.start(), q + i.end());
                slide(&input, i, Direction::Future, disjunction, p, q)
            }
            Operator::Globally(Some(i), c) => {
                let input = slice(c, p + i.start(), q + i.end());
                slide(&input, i, Direction::Future, conjunction, p, q)
            }
            Operator::Once(Some(i), c) => {
                let input = slice(c, p - i.end(), q - i.start());
                slide(&input, i, Direction::Past, disjunction, p, q)
            }
            Operator::Historically(Some(i), c) => {
                let input = slice(c, p - i.end(), q - i.start());
                slide(&input, i, Direction::Past, conjunction, p, q)
            }
            Operator::Eventually(None, c) => temporal::eventually(&slice(c, p, to(c)), None),
            Operator::Globally(None, c) => temporal::globally(&slice(c, p, to(c)), None),
            Operator::Once(None, c) => temporal::once(&slice(c, from(c), q), None),
            Operator::Historically(None, c) => temporal::historically(&slice(c, from(c), q), None),
            Operator::Until(i, l, r) => {
                until::until(&slice(l, p, to(l)), &slice(r, p, to(r)), i.as_ref())
            }
            Operator::Since(i, l, r) => {
                until::since(&slice(l, from(l), q), &slice(r, from(r), q), i.as_ref())
            }
            Operator::Atomic(_)
            | Operator::Somewhere(..)
            | Operator::Everywhere(..)
            | Operator::Escape(..)
            | Operator::Reach(..) => Signal::new(),
        };
        result.restrict(p, q)
    }

    fn spatial_span(&self, node: &Node, p: f64, q: f64) -> Result<Vec<Signal<Verdict<R>>>> {
        let setup = self.spatial.as_ref().ok_or_else(|| {
            MonitorError::configuration("spatial operators need a spatio-temporal monitor")
        })?;
        let layer = |c: &NodeId| -> Vec<_> {
            self.signals[*c].iter().map(|s| s.slice(p, q)).collect()
        };
        let distance = |name: &str| {
            setup.distances.get(name).ok_or_else(|| {
                MonitorError::configuration(format!("unknown distance function '{name}'"))
            })
        };
        let result = match &node.operator {
            Operator::Somewhere(d, c) => spatial::somewhere(distance(d)?, &layer(c), false)?,
            Operator::Everywhere(d, c) => spatial::everywhere(distance(d)?, &layer(c), false)?,
            Operator::Escape(d, c) => spatial::escape(distance(d)?, &layer(c))?,
            Operator::Reach(d, l, r) => spatial::reach(distance(d)?, &layer(l), &layer(r))?,
            _ => Vec::new(),
        };
        Ok(result.iter().map(|s| s.restrict(p, q)).collect())
    }
}

fn check_horizon(horizon: f64) -> Result<f64> {
    if horizon.is_nan() || horizon <= 0.0 {
        return Err(MonitorError::configuration(format!(
            "monitoring horizon must be positive, got {horizon}"
        )));
    }
    Ok(horizon)
}

/// Monitors a single signal received as a stream of updates.
///
/// ```
/// use ostrel::online::monitor::OnlineTimeMonitor;
/// use ostrel::online::update::Update;
/// use ostrel::strel::core::{AbstractInterval, TimeInterval};
/// use ostrel::strel::formula_definition::Formula;
///
/// let mut monitor = OnlineTimeMonitor::builder()
///     .formula(Formula::globally(TimeInterval::new(0.0, 2.0).unwrap(), Formula::atom("ok")))
///     .atom("ok", |x: &f64| *x > 0.0)
///     .horizon(10.0)
///     .build()
///     .unwrap();
///
/// monitor.monitor(&Update::new(0.0, 3.0, 1.0).unwrap()).unwrap();
/// assert_eq!(monitor.result().value_at(0.5), Some(&AbstractInterval::point(true)));
/// assert_eq!(monitor.result().value_at(2.0), Some(&AbstractInterval::unknown()));
/// ```
pub struct OnlineTimeMonitor<V, R> {
    engine: Engine<(), V, R, f64>,
}

impl<V: 'static, R: SignalDomain> OnlineTimeMonitor<V, R> {
    pub fn builder() -> OnlineMonitorBuilder<V, R> {
        OnlineMonitorBuilder::new()
    }

    pub fn formula(&self) -> &Formula {
        &self.engine.formula
    }

    /// Narrows the input on the update's span and returns the verdict
    /// updates it caused.
    pub fn monitor(&mut self, update: &Update<V>) -> Result<Vec<Update<Verdict<R>>>> {
        let mut emitted =
            self.engine
                .process(update.start, update.end, std::slice::from_ref(&update.value))?;
        Ok(emitted.pop().unwrap_or_default())
    }

    /// Feeds every update of `chain` in order.
    pub fn monitor_chain(&mut self, chain: &TimeChain<V>) -> Result<Vec<Update<Verdict<R>>>>
    where
        V: Clone + PartialEq,
    {
        let mut emitted = Vec::new();
        for update in chain.to_updates() {
            emitted.extend(self.monitor(&update)?);
        }
        Ok(emitted)
    }

    /// Current verdict on the formula's domain.
    pub fn result(&self) -> &TimeChain<Verdict<R>> {
        self.signal().chain()
    }

    pub fn signal(&self) -> &OnlineSignal<R> {
        &self.engine.root()[0]
    }
}

/// Builder shared by the online monitors.
pub struct OnlineMonitorBuilder<V, R> {
    formula: Option<Formula>,
    atoms: HashMap<String, IntervalAtom<V, R>>,
    horizon: f64,
}

impl<V, R> Default for OnlineMonitorBuilder<V, R> {
    fn default() -> Self {
        OnlineMonitorBuilder {
            formula: None,
            atoms: HashMap::new(),
            horizon: f64::INFINITY,
        }
    }
}

impl<V: 'static, R: SignalDomain> OnlineMonitorBuilder<V, R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn formula(mut self, formula: Formula) -> Self {
        self.formula = Some(formula);
        self
    }

    /// Atomic proposition with an exactly known value.
    pub fn atom<F>(mut self, name: impl Into<String>, atom: F) -> Self
    where
        F: Fn(&V) -> R + Send + Sync + 'static,
    {
        self.atoms
            .insert(name.into(), Arc::new(move |v: &V| AbstractInterval::point(atom(v))));
        self
    }

    /// Atomic proposition whose value is only known up to an interval.
    pub fn interval_atom<F>(mut self, name: impl Into<String>, atom: F) -> Self
    where
        F: Fn(&V) -> AbstractInterval<R> + Send + Sync + 'static,
    {
        self.atoms.insert(name.into(), Arc::new(atom));
        self
    }

    /// End of the monitored time domain `[0, horizon)`; unbounded by
    /// default.
    pub fn horizon(mut self, horizon: f64) -> Self {
        self.horizon = horizon;
        self
    }

    fn formula_checked(&self, has_distance: Option<&dyn Fn(&str) -> bool>) -> Result<Formula> {
        let formula = self
            .formula
            .clone()
            .ok_or_else(|| MonitorError::configuration("no formula given to the monitor"))?;
        check_formula(&formula, |a| self.atoms.contains_key(a), has_distance)?;
        check_horizon(self.horizon)?;
        Ok(formula)
    }

    pub fn build(self) -> Result<OnlineTimeMonitor<V, R>> {
        let formula = self.formula_checked(None)?;
        let engine = Engine::new(formula, self.atoms, None, 1, self.horizon);
        debug!(
            formula = %engine.formula,
            nodes = engine.nodes.len(),
            horizon = self.horizon,
            "built online temporal monitor"
        );
        Ok(OnlineTimeMonitor { engine })
    }

    /// Turns this into a builder for a spatio-temporal monitor over
    /// `service`.
    pub fn spatial<E, A>(self, service: LocationService<E>) -> OnlineSpatialMonitorBuilder<E, V, R, A> {
        OnlineSpatialMonitorBuilder {
            inner: self,
            service,
            distances: HashMap::new(),
        }
    }
}

/// Monitors a spatio-temporal signal received as a stream of updates, one
/// value per location.
pub struct OnlineSpatialTemporalMonitor<E, V, R, A = f64> {
    engine: Engine<E, V, R, A>,
}

impl<E, V, R, A> OnlineSpatialTemporalMonitor<E, V, R, A>
where
    E: 'static,
    V: 'static,
    R: SignalDomain,
    A: DistanceDomain,
{
    pub fn builder(service: LocationService<E>) -> OnlineSpatialMonitorBuilder<E, V, R, A> {
        OnlineMonitorBuilder::new().spatial(service)
    }

    pub fn formula(&self) -> &Formula {
        &self.engine.formula
    }

    pub fn size(&self) -> usize {
        self.engine.locations
    }

    /// Narrows every location's input on the update's span and returns the
    /// verdict updates per location.
    pub fn monitor(&mut self, update: &Update<Vec<V>>) -> Result<Vec<Vec<Update<Verdict<R>>>>> {
        if update.value.len() != self.engine.locations {
            return Err(MonitorError::argument(format!(
                "update carries {} values for {} locations",
                update.value.len(),
                self.engine.locations
            )));
        }
        self.engine.process(update.start, update.end, &update.value)
    }

    pub fn result(&self, location: usize) -> Option<&TimeChain<Verdict<R>>> {
        self.engine.root().get(location).map(OnlineSignal::chain)
    }

    pub fn signals(&self) -> &[OnlineSignal<R>] {
        self.engine.root()
    }
}

pub struct OnlineSpatialMonitorBuilder<E, V, R, A = f64> {
    inner: OnlineMonitorBuilder<V, R>,
    service: LocationService<E>,
    distances: HashMap<String, DistanceFunction<E, A>>,
}

impl<E, V, R, A> OnlineSpatialMonitorBuilder<E, V, R, A>
where
    E: 'static,
    V: 'static,
    R: SignalDomain,
    A: DistanceDomain,
{
    pub fn formula(mut self, formula: Formula) -> Self {
        self.inner = self.inner.formula(formula);
        self
    }

    pub fn atom<F>(mut self, name: impl Into<String>, atom: F) -> Self
    where
        F: Fn(&V) -> R + Send + Sync + 'static,
    {
        self.inner = self.inner.atom(name, atom);
        self
    }

    pub fn interval_atom<F>(mut self, name: impl Into<String>, atom: F) -> Self
    where
        F: Fn(&V) -> AbstractInterval<R> + Send + Sync + 'static,
    {
        self.inner = self.inner.interval_atom(name, atom);
        self
    }

    pub fn distance(mut self, name: impl Into<String>, function: DistanceFunction<E, A>) -> Self {
        self.distances.insert(name.into(), function);
        self
    }

    pub fn horizon(mut self, horizon: f64) -> Self {
        self.inner = self.inner.horizon(horizon);
        self
    }

    pub fn build(self) -> Result<OnlineSpatialTemporalMonitor<E, V, R, A>> {
        let has_distance = |d: &str| self.distances.contains_key(d);
        let formula = self.inner.formula_checked(Some(&has_distance))?;
        let locations = self.service.size();
        let horizon = self.inner.horizon;
        let engine = Engine::new(
            formula,
            self.inner.atoms,
            Some(SpatialSetup {
                distances: self
                    .distances
                    .iter()
                    .map(|(name, function)| (name.clone(), function.schedule(&self.service)))
                    .collect(),
            }),
            locations,
            horizon,
        );
        debug!(
            formula = %engine.formula,
            nodes = engine.nodes.len(),
            locations,
            horizon,
            "built online spatio-temporal monitor"
        );
        Ok(OnlineSpatialTemporalMonitor { engine })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::GraphModel;
    use crate::strel::core::TimeInterval;
    use pretty_assertions::assert_eq;

    fn point<R: SignalDomain>(v: R) -> AbstractInterval<R> {
        AbstractInterval::point(v)
    }

    fn interval(a: f64, b: f64) -> TimeInterval {
        TimeInterval::new(a, b).unwrap()
    }

    #[test]
    fn verdicts_narrow_as_input_arrives() {
        let mut monitor = OnlineTimeMonitor::builder()
            .formula(Formula::eventually(interval(0.0, 2.0), Formula::atom("x")))
            .atom("x", |x: &f64| *x)
            .horizon(10.0)
            .build()
            .unwrap();
        assert_eq!(monitor.result().value_at(0.0), Some(&AbstractInterval::unknown()));
        assert_eq!(monitor.result().end(), Some(8.0));

        let out = monitor.monitor(&Update::new(4.0, 6.0, 3.0).unwrap()).unwrap();
        assert!(!out.is_empty());
        // F[0,2] x >= 3 wherever [t, t+2] meets [4, 6)
        let v = monitor.result().value_at(3.0).unwrap();
        assert_eq!((*v.lower(), *v.upper()), (3.0, f64::INFINITY));
        assert_eq!(monitor.result().value_at(1.0), Some(&AbstractInterval::unknown()));

        monitor
            .monitor_chain(
                &TimeChain::from_updates([
                    Update::new(0.0, 2.0, 1.0).unwrap(),
                    Update::new(2.0, 4.0, 1.0).unwrap(),
                ])
                .unwrap(),
            )
            .unwrap();
        monitor.monitor(&Update::new(6.0, 10.0, 0.0).unwrap()).unwrap();
        assert_eq!(monitor.result().value_at(1.0), Some(&point(1.0)));
        assert_eq!(monitor.result().value_at(3.0), Some(&point(3.0)));
        assert_eq!(monitor.result().value_at(7.0), Some(&point(0.0)));
    }

    #[test]
    fn repeated_updates_emit_nothing() {
        let mut monitor = OnlineTimeMonitor::builder()
            .formula(Formula::not(Formula::atom("x")))
            .atom("x", |x: &bool| *x)
            .horizon(5.0)
            .build()
            .unwrap();
        let update = Update::new(1.0, 2.0, true).unwrap();
        assert_eq!(monitor.monitor(&update).unwrap(), vec![
            Update::new(1.0, 2.0, point(false)).unwrap()
        ]);
        assert!(monitor.monitor(&update).unwrap().is_empty());
    }

    #[test]
    fn contradicting_updates_are_refinement_violations() {
        let mut monitor = OnlineTimeMonitor::builder()
            .formula(Formula::atom("x"))
            .atom("x", |x: &f64| *x)
            .build()
            .unwrap();
        monitor.monitor(&Update::new(0.0, 2.0, 1.0).unwrap()).unwrap();
        let err = monitor.monitor(&Update::new(1.0, 3.0, 2.0).unwrap()).unwrap_err();
        assert!(matches!(err, MonitorError::RefinementViolation { time, .. } if time == 1.0));
    }

    #[test]
    fn interval_atoms_narrow_gradually() {
        let mut monitor = OnlineTimeMonitor::builder()
            .formula(Formula::historically(None, Formula::atom("x")))
            .interval_atom("x", |x: &(f64, f64)| AbstractInterval::new(x.0, x.1).unwrap())
            .horizon(4.0)
            .build()
            .unwrap();
        monitor.monitor(&Update::new(0.0, 4.0, (0.0, 5.0)).unwrap()).unwrap();
        monitor.monitor(&Update::new(0.0, 1.0, (2.0, 3.0)).unwrap()).unwrap();
        let v = monitor.result().value_at(2.0).unwrap();
        assert_eq!((*v.lower(), *v.upper()), (0.0, 3.0));
    }

    #[test]
    fn builders_validate_configuration() {
        let spatial = OnlineTimeMonitor::<f64, bool>::builder()
            .formula(Formula::somewhere("d", Formula::atom("a")))
            .atom("a", |x: &f64| *x > 0.0)
            .build();
        assert!(matches!(spatial, Err(MonitorError::Configuration(_))));
        let horizon = OnlineTimeMonitor::<f64, bool>::builder()
            .formula(Formula::atom("a"))
            .atom("a", |x: &f64| *x > 0.0)
            .horizon(0.0)
            .build();
        assert!(matches!(horizon, Err(MonitorError::Configuration(_))));
    }

    #[test]
    fn spatial_verdicts_follow_neighbours() {
        let service = LocationService::constant(GraphModel::from_edges(3, [(0, 1, 1.0), (1, 2, 1.0)]).unwrap());
        let mut monitor = OnlineSpatialTemporalMonitor::builder(service)
            .formula(Formula::somewhere("near", Formula::atom("hot")))
            .atom("hot", |t: &f64| *t > 30.0)
            .distance("near", DistanceFunction::up_to(|w: &f64| *w, 1.0).unwrap())
            .horizon(10.0)
            .build()
            .unwrap();
        assert!(monitor.monitor(&Update::new(0.0, 1.0, vec![1.0]).unwrap()).is_err());

        let out = monitor.monitor(&Update::new(0.0, 5.0, vec![20.0, 20.0, 40.0]).unwrap()).unwrap();
        assert_eq!(out.len(), 3);
        let at = |l: usize, t: f64| monitor.result(l).and_then(|c| c.value_at(t)).cloned();
        assert_eq!(at(0, 1.0), Some(point(false)));
        assert_eq!(at(1, 1.0), Some(point(true)));
        assert_eq!(at(2, 1.0), Some(point(true)));
        assert_eq!(at(0, 6.0), Some(AbstractInterval::unknown()));
        assert!(monitor.result(3).is_none());
    }

    #[test]
    fn distance_matrices_survive_updates() {
        use std::sync::atomic::{AtomicUsize, Ordering};

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
        let service = LocationService::constant(GraphModel::from_edges(3, [(0, 1, 1.0), (1, 2, 1.0)]).unwrap());
        let mut monitor = OnlineSpatialTemporalMonitor::builder(service)
            .formula(Formula::somewhere("near", Formula::atom("hot")))
            .atom("hot", |t: &f64| *t > 30.0)
            .distance("near", near)
            .horizon(10.0)
            .build()
            .unwrap();
        monitor.monitor(&Update::new(0.0, 1.0, vec![20.0, 35.0, 20.0]).unwrap()).unwrap();
        let first = calls.load(Ordering::Relaxed);
        assert!(first > 0);
        for k in 1..10 {
            let t = f64::from(k);
            let hot = if k % 2 == 0 { 35.0 } else { 20.0 };
            monitor.monitor(&Update::new(t, t + 1.0, vec![hot, 20.0, 40.0]).unwrap()).unwrap();
        }
        assert_eq!(calls.load(Ordering::Relaxed), first);
        assert_eq!(monitor.result(1).and_then(|c| c.value_at(9.5)).cloned(), Some(point(true)));
    }
}
