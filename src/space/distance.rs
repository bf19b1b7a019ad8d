//! Bounded distance views over a spatial model and the spatial operators
//! computed on them.
//!
//! All fixpoints are FIFO worklist relaxations. The distance domain is only
//! required to be an ordered monoid, so no priority-queue shortcut is taken.

use super::grid::GridModel;
use super::{LocationService, SharedModel, SpatialModel};
use crate::error::{MonitorError, Result};
use crate::strel::core::SignalDomain;

use std::collections::VecDeque;
use std::fmt::Debug;
use std::sync::{Arc, OnceLock};

/// Ordered monoid of path lengths.
pub trait DistanceDomain: Clone + PartialEq + Debug + Send + Sync + 'static {
    fn zero() -> Self;
    fn infinity() -> Self;
    fn sum(l: &Self, r: &Self) -> Self;
    fn less(l: &Self, r: &Self) -> bool;

    fn less_or_equal(l: &Self, r: &Self) -> bool {
        Self::less(l, r) || l == r
    }
}

impl DistanceDomain for f64 {
    fn zero() -> f64 {
        0.0
    }
    fn infinity() -> f64 {
        f64::INFINITY
    }
    fn sum(l: &f64, r: &f64) -> f64 {
        l + r
    }
    fn less(l: &f64, r: &f64) -> bool {
        l < r
    }
}

/// Hop counts; sums saturate at `u32::MAX`, which doubles as infinity.
impl DistanceDomain for u32 {
    fn zero() -> u32 {
        0
    }
    fn infinity() -> u32 {
        u32::MAX
    }
    fn sum(l: &u32, r: &u32) -> u32 {
        l.saturating_add(*r)
    }
    fn less(l: &u32, r: &u32) -> bool {
        l < r
    }
}

/// Maps edge labels to distances and admits distances in `[lower, upper]`.
pub struct DistanceFunction<E, A> {
    distance: Arc<dyn Fn(&E) -> A + Send + Sync>,
    lower: A,
    upper: A,
}

impl<E, A: Clone> Clone for DistanceFunction<E, A> {
    fn clone(&self) -> Self {
        DistanceFunction {
            distance: Arc::clone(&self.distance),
            lower: self.lower.clone(),
            upper: self.upper.clone(),
        }
    }
}

impl<E, A: Debug> Debug for DistanceFunction<E, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DistanceFunction")
            .field("lower", &self.lower)
            .field("upper", &self.upper)
            .finish_non_exhaustive()
    }
}

impl<E: 'static, A: DistanceDomain> DistanceFunction<E, A> {
    pub fn new<F>(distance: F, lower: A, upper: A) -> Result<Self>
    where
        F: Fn(&E) -> A + Send + Sync + 'static,
    {
        if !A::less_or_equal(&A::zero(), &lower) || !A::less_or_equal(&lower, &upper) {
            return Err(MonitorError::argument(format!(
                "distance bounds [{lower:?}, {upper:?}] must satisfy 0 <= lower <= upper"
            )));
        }
        Ok(DistanceFunction {
            distance: Arc::new(distance),
            lower,
            upper,
        })
    }

    /// Bounds `[0, upper]`.
    pub fn up_to<F>(distance: F, upper: A) -> Result<Self>
    where
        F: Fn(&E) -> A + Send + Sync + 'static,
    {
        Self::new(distance, A::zero(), upper)
    }

    pub fn lower(&self) -> &A {
        &self.lower
    }

    pub fn upper(&self) -> &A {
        &self.upper
    }

    pub fn distance(&self, label: &E) -> A {
        (self.distance)(label)
    }

    pub fn structure(&self, model: SharedModel<E>) -> DistanceStructure<E, A> {
        DistanceStructure::new(model, self.clone())
    }

    /// Structures for every snapshot of `service`.
    pub fn schedule(&self, service: &LocationService<E>) -> DistanceSchedule<E, A> {
        DistanceSchedule::new(service, self)
    }
}

/// A spatial snapshot seen through a [`DistanceFunction`].
///
/// The all-pairs distance matrix is computed on first use and cached for
/// the lifetime of the structure; the snapshot it views never changes.
pub struct DistanceStructure<E, A> {
    model: SharedModel<E>,
    function: DistanceFunction<E, A>,
    matrix: OnceLock<Vec<Vec<A>>>,
}

impl<E: 'static, A: DistanceDomain> DistanceStructure<E, A> {
    pub fn new(model: SharedModel<E>, function: DistanceFunction<E, A>) -> Self {
        DistanceStructure {
            model,
            function,
            matrix: OnceLock::new(),
        }
    }

    pub fn model(&self) -> &SharedModel<E> {
        &self.model
    }

    pub fn size(&self) -> usize {
        self.model.size()
    }

    /// Length of the shortest route from `from` to `to`, or infinity.
    pub fn distance(&self, from: usize, to: usize) -> A {
        self.matrix()[from][to].clone()
    }

    /// `lower <= d <= upper`.
    pub fn check_distance(&self, d: &A) -> bool {
        A::less_or_equal(&self.function.lower, d) && A::less_or_equal(d, &self.function.upper)
    }

    pub fn are_within_bounds(&self, from: usize, to: usize) -> bool {
        self.check_distance(&self.matrix()[from][to])
    }

    fn matrix(&self) -> &Vec<Vec<A>> {
        self.matrix.get_or_init(|| self.compute_distance_matrix())
    }

    /// Relaxes every target backwards along incoming edges until no entry
    /// improves. `matrix[i][j]` is the distance of the best route `i -> j`.
    fn compute_distance_matrix(&self) -> Vec<Vec<A>> {
        let size = self.model.size();
        let mut matrix = vec![vec![A::infinity(); size]; size];
        let mut queue = VecDeque::with_capacity(size);
        for (i, row) in matrix.iter_mut().enumerate() {
            row[i] = A::zero();
            queue.push_back((i, i, A::zero()));
        }
        while let Some((l1, target, d)) = queue.pop_front() {
            for (l, label) in self.model.previous(l1) {
                let candidate = A::sum(&self.function.distance(label), &d);
                if A::less(&candidate, &matrix[*l][target]) {
                    matrix[*l][target] = candidate.clone();
                    queue.push_back((*l, target, candidate));
                }
            }
        }
        matrix
    }

    fn check_locations(&self, len: usize) -> Result<()> {
        if len != self.size() {
            return Err(MonitorError::argument(format!(
                "{len} location values for a spatial model of {} locations",
                self.size()
            )));
        }
        Ok(())
    }

    /// Locations within bounds of `location`, in increasing order.
    pub fn neighbourhood(&self, location: usize) -> Vec<usize> {
        self.matrix()
            .get(location)
            .map(|row| (0..row.len()).filter(|j| self.check_distance(&row[*j])).collect())
            .unwrap_or_default()
    }

    /// Applies `aggregator` to the values of every location's neighbourhood.
    pub fn reduce<V, U, F>(&self, values: &[V], aggregator: F) -> Result<Vec<U>>
    where
        F: Fn(&[&V]) -> U,
    {
        self.check_locations(values.len())?;
        Ok((0..self.size())
            .map(|i| {
                let within: Vec<&V> = self.neighbourhood(i).into_iter().map(|j| &values[j]).collect();
                aggregator(&within)
            })
            .collect())
    }

    /// Disjunction of `s` over the locations within bounds of each location.
    pub fn somewhere<R: SignalDomain>(&self, s: &[R]) -> Result<Vec<R>> {
        self.check_locations(s.len())?;
        Ok((0..self.size())
            .map(|i| self.aggregate(i, s, R::min(), R::disjunction))
            .collect())
    }

    /// Conjunction of `s` over the locations within bounds of each location.
    pub fn everywhere<R: SignalDomain>(&self, s: &[R]) -> Result<Vec<R>> {
        self.check_locations(s.len())?;
        Ok((0..self.size())
            .map(|i| self.aggregate(i, s, R::max(), R::conjunction))
            .collect())
    }

    /// [`Self::somewhere`] with one rayon task per location.
    #[cfg(feature = "parallel")]
    pub fn somewhere_parallel<R: SignalDomain>(&self, s: &[R]) -> Result<Vec<R>> {
        use rayon::prelude::*;
        self.check_locations(s.len())?;
        self.matrix();
        Ok((0..self.size())
            .into_par_iter()
            .map(|i| self.aggregate(i, s, R::min(), R::disjunction))
            .collect())
    }

    /// [`Self::everywhere`] with one rayon task per location.
    #[cfg(feature = "parallel")]
    pub fn everywhere_parallel<R: SignalDomain>(&self, s: &[R]) -> Result<Vec<R>> {
        use rayon::prelude::*;
        self.check_locations(s.len())?;
        self.matrix();
        Ok((0..self.size())
            .into_par_iter()
            .map(|i| self.aggregate(i, s, R::max(), R::conjunction))
            .collect())
    }

    #[cfg(not(feature = "parallel"))]
    pub fn somewhere_parallel<R: SignalDomain>(&self, s: &[R]) -> Result<Vec<R>> {
        self.somewhere(s)
    }

    #[cfg(not(feature = "parallel"))]
    pub fn everywhere_parallel<R: SignalDomain>(&self, s: &[R]) -> Result<Vec<R>> {
        self.everywhere(s)
    }

    fn aggregate<R: SignalDomain>(&self, i: usize, s: &[R], init: R, op: fn(&R, &R) -> R) -> R {
        let row = &self.matrix()[i];
        row.iter()
            .zip(s)
            .filter(|(d, _)| self.check_distance(d))
            .fold(init, |acc, (_, v)| op(&acc, v))
    }

    /// For every location `i`: the disjunction, over the locations `j` within
    /// bounds of `i`, of the best conjunction of `s` along a route `i -> j`.
    pub fn escape<R: SignalDomain>(&self, s: &[R]) -> Result<Vec<R>> {
        self.check_locations(s.len())?;
        let size = self.size();
        let mut values = vec![vec![R::min(); size]; size];
        let mut queue = VecDeque::with_capacity(size);
        for (i, row) in values.iter_mut().enumerate() {
            row[i] = s[i].clone();
            queue.push_back((i, i));
        }
        while let Some((l1, target)) = queue.pop_front() {
            let inherited = values[l1][target].clone();
            for (l, _) in self.model.previous(l1) {
                let old = &values[*l][target];
                let candidate = R::disjunction(old, &R::conjunction(&s[*l], &inherited));
                if !R::equal_to(&candidate, old) {
                    values[*l][target] = candidate;
                    queue.push_back((*l, target));
                }
            }
        }
        Ok(values
            .iter()
            .enumerate()
            .map(|(i, row)| {
                row.iter()
                    .enumerate()
                    .filter(|(j, _)| self.are_within_bounds(i, *j))
                    .fold(R::min(), |acc, (_, v)| R::disjunction(&acc, v))
            })
            .collect())
    }

    /// For every location `i`: the disjunction, over routes `i -> j` whose
    /// length lies within bounds, of `s2(j)` conjoined with `s1` on every
    /// location of the route before `j`.
    ///
    /// Values are tracked per location and per route length; lengths beyond
    /// the upper bound are never explored. Without an upper bound all
    /// lengths from the lower bound on share one entry, so cycles cannot
    /// generate new lengths forever.
    pub fn reach<R: SignalDomain>(&self, s1: &[R], s2: &[R]) -> Result<Vec<R>> {
        self.check_locations(s1.len())?;
        self.check_locations(s2.len())?;
        let size = self.size();
        let lower = &self.function.lower;
        let unbounded = self.function.upper == A::infinity();
        let bucket = |d: A| {
            if unbounded && A::less_or_equal(lower, &d) {
                lower.clone()
            } else {
                d
            }
        };
        let mut reachable: Vec<Vec<(A, R)>> = vec![Vec::new(); size];
        let mut queue = VecDeque::with_capacity(size);
        for (i, entries) in reachable.iter_mut().enumerate() {
            let d = bucket(A::zero());
            entries.push((d.clone(), s2[i].clone()));
            queue.push_back((i, d, s2[i].clone()));
        }
        while let Some((l1, d1, v1)) = queue.pop_front() {
            for (l2, label) in self.model.previous(l1) {
                let d2 = A::sum(&self.function.distance(label), &d1);
                if !A::less_or_equal(&d2, &self.function.upper) {
                    continue;
                }
                let d2 = bucket(d2);
                let value = R::conjunction(&v1, &s1[*l2]);
                if let Some(improved) = combine(&mut reachable[*l2], &d2, value) {
                    queue.push_back((*l2, d2, improved));
                }
            }
        }
        Ok(reachable
            .iter()
            .map(|entries| {
                entries
                    .iter()
                    .filter(|(d, _)| self.check_distance(d))
                    .fold(R::min(), |acc, (_, v)| R::disjunction(&acc, v))
            })
            .collect())
    }
}

impl<E: Send + Sync + 'static> DistanceStructure<E, u32> {
    /// Hop distances on a grid, filled in closed form from the Manhattan
    /// distance instead of by relaxation.
    pub fn manhattan(grid: Arc<GridModel<E>>, lower: u32, upper: u32) -> Result<Self> {
        let function = DistanceFunction::new(|_: &E| 1u32, lower, upper)?;
        let size = grid.size();
        let matrix: Vec<Vec<u32>> = (0..size)
            .map(|i| (0..size).map(|j| grid.manhattan(i, j).unwrap_or(u32::MAX)).collect())
            .collect();
        Ok(DistanceStructure {
            model: grid,
            function,
            matrix: OnceLock::from(matrix),
        })
    }
}

/// One [`DistanceStructure`] per snapshot of a [`LocationService`], so that
/// each snapshot's distance matrix is computed at most once.
pub struct DistanceSchedule<E, A> {
    service: LocationService<E>,
    structures: Vec<DistanceStructure<E, A>>,
}

impl<E: 'static, A: DistanceDomain> DistanceSchedule<E, A> {
    pub fn new(service: &LocationService<E>, function: &DistanceFunction<E, A>) -> Self {
        let structures = (0..service.len())
            .map(|i| function.structure(service.model(i).clone()))
            .collect();
        DistanceSchedule {
            service: service.clone(),
            structures,
        }
    }

    pub fn service(&self) -> &LocationService<E> {
        &self.service
    }

    pub fn size(&self) -> usize {
        self.service.size()
    }

    /// Structure of snapshot `index` of the service.
    pub fn structure(&self, index: usize) -> &DistanceStructure<E, A> {
        &self.structures[index]
    }

    pub fn structure_at(&self, time: f64) -> &DistanceStructure<E, A> {
        self.structure(self.service.index_at(time))
    }
}

/// Merges `value` into the entry for `distance`; returns the new value when
/// it changed.
fn combine<A: DistanceDomain, R: SignalDomain>(
    entries: &mut Vec<(A, R)>,
    distance: &A,
    value: R,
) -> Option<R> {
    match entries.iter_mut().find(|(d, _)| d == distance) {
        Some((_, old)) => {
            let merged = R::disjunction(old, &value);
            if R::equal_to(&merged, old) {
                None
            } else {
                *old = merged.clone();
                Some(merged)
            }
        }
        None => {
            entries.push((distance.clone(), value.clone()));
            Some(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::GraphModel;
    use crate::space::grid::GridModel;
    use pretty_assertions::assert_eq;

    fn line(size: usize) -> SharedModel<f64> {
        let edges = (0..size - 1).map(|i| (i, i + 1, 1.0));
        Arc::new(GraphModel::from_edges(size, edges).unwrap())
    }

    fn weight(lower: f64, upper: f64) -> DistanceFunction<f64, f64> {
        DistanceFunction::new(|w: &f64| *w, lower, upper).unwrap()
    }

    #[test]
    fn distance_matrix_follows_routes() {
        let model: SharedModel<f64> = Arc::new(
            GraphModel::from_edges(4, [(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0), (0, 3, 5.0)])
                .unwrap(),
        );
        let ds = weight(0.0, 10.0).structure(model);
        assert_eq!(ds.distance(0, 3), 3.0);
        assert_eq!(ds.distance(1, 3), 2.0);
        assert_eq!(ds.distance(3, 0), f64::INFINITY);
        assert_eq!(ds.distance(2, 2), 0.0);
        assert!(ds.are_within_bounds(0, 3));
        assert!(!ds.are_within_bounds(3, 0));
    }

    #[test]
    fn hop_count_distances() {
        let model: SharedModel<f64> =
            Arc::new(GraphModel::from_edges(3, [(0, 1, 7.5), (1, 2, 0.5)]).unwrap());
        let hops = DistanceFunction::up_to(|_: &f64| 1u32, 1).unwrap().structure(model);
        assert_eq!(hops.distance(0, 2), 2);
        assert_eq!(hops.distance(2, 0), u32::MAX);
        assert_eq!(hops.somewhere(&[false, false, true]).unwrap(), vec![false, true, true]);
    }

    #[test]
    fn invalid_bounds_are_rejected() {
        assert!(DistanceFunction::new(|w: &f64| *w, 2.0, 1.0).is_err());
        assert!(DistanceFunction::new(|w: &f64| *w, -1.0, 1.0).is_err());
    }

    #[test]
    fn somewhere_and_everywhere() {
        let ds = weight(1.0, 2.0).structure(line(4));
        let s = [0.0, 3.0, -1.0, 5.0];
        assert_eq!(ds.somewhere(&s).unwrap(), vec![3.0, 5.0, 5.0, f64::NEG_INFINITY]);
        assert_eq!(ds.everywhere(&s).unwrap(), vec![-1.0, -1.0, 5.0, f64::INFINITY]);
        assert_eq!(ds.somewhere_parallel(&s).unwrap(), ds.somewhere(&s).unwrap());
        assert_eq!(ds.everywhere_parallel(&s).unwrap(), ds.everywhere(&s).unwrap());
    }

    #[test]
    fn reach_respects_route_length() {
        let s1 = [true, true, false];
        let s2 = [false, false, true];
        let ds = weight(0.0, 2.0).structure(line(3));
        assert_eq!(ds.reach(&s1, &s2).unwrap(), vec![true, true, true]);
        let ds = weight(0.0, 1.0).structure(line(3));
        assert_eq!(ds.reach(&s1, &s2).unwrap(), vec![false, true, true]);
        let ds = weight(1.0, 2.0).structure(line(3));
        assert_eq!(ds.reach(&s1, &s2).unwrap(), vec![true, true, false]);
    }

    #[test]
    fn reach_takes_the_best_route() {
        // 0 -> 1 -> 3 and 0 -> 2 -> 3; only the route through 2 satisfies s1
        let model: SharedModel<f64> = Arc::new(
            GraphModel::from_edges(4, [(0, 1, 1.0), (1, 3, 1.0), (0, 2, 1.0), (2, 3, 1.0)])
                .unwrap(),
        );
        let ds = weight(0.0, 2.0).structure(model);
        let s1 = [4.0, -3.0, 2.0, 0.0];
        let s2 = [-9.0, -9.0, -9.0, 6.0];
        assert_eq!(ds.reach(&s1, &s2).unwrap()[0], 2.0);
    }

    #[test]
    fn escape_needs_a_route_out_of_bounds() {
        let ds = weight(2.0, f64::INFINITY).structure(line(4));
        let s = [true, true, true, false];
        assert_eq!(ds.escape(&s).unwrap(), vec![true, false, false, false]);
        let s = [3.0, 1.0, 2.0, -4.0];
        assert_eq!(ds.escape(&s).unwrap(), vec![1.0, -4.0, f64::NEG_INFINITY, f64::NEG_INFINITY]);
    }

    #[test]
    fn unbounded_reach_terminates_on_cycles() {
        let cycle = || -> SharedModel<f64> {
            Arc::new(GraphModel::from_edges(3, [(0, 1, 1.0), (1, 0, 1.0), (1, 2, 2.0)]).unwrap())
        };
        let ds = weight(0.0, f64::INFINITY).structure(cycle());
        assert_eq!(ds.reach(&[true, true, false], &[false, true, false]).unwrap(), vec![
            true, true, false
        ]);
        // only routes of length >= 4 count: 0 -> 1 -> 0 -> 1 -> 2 has length 5
        let ds = weight(4.0, f64::INFINITY).structure(cycle());
        assert_eq!(ds.reach(&[true, true, false], &[false, false, true]).unwrap(), vec![
            true, true, false
        ]);
        assert_eq!(ds.reach(&[true, false, false], &[false, false, true]).unwrap(), vec![
            false, false, false
        ]);
        let hops = DistanceFunction::new(|_: &f64| 1u32, 0, u32::MAX).unwrap().structure(cycle());
        assert_eq!(hops.reach(&[true, true, false], &[false, true, false]).unwrap(), vec![
            true, true, false
        ]);
    }

    #[test]
    fn location_count_is_checked() {
        let ds = weight(0.0, 2.0).structure(line(3));
        for result in [
            ds.somewhere(&[1.0, 2.0]),
            ds.everywhere(&[1.0, 2.0, 3.0, 4.0]),
            ds.somewhere_parallel(&[1.0]),
            ds.escape(&[1.0, 2.0]),
            ds.reach(&[1.0, 2.0, 3.0], &[1.0]),
        ] {
            assert!(matches!(result, Err(MonitorError::Argument(_))));
        }
        assert!(ds.reduce(&[1, 2], |v: &[&i32]| v.len()).is_err());
    }

    #[test]
    fn neighbourhoods_and_reductions() {
        let ds = weight(1.0, 2.0).structure(line(4));
        assert_eq!(ds.neighbourhood(0), vec![1, 2]);
        assert_eq!(ds.neighbourhood(3), Vec::<usize>::new());
        let counts = ds.reduce(&[10, 20, 30, 40], |v: &[&i32]| v.iter().copied().sum::<i32>());
        assert_eq!(counts.unwrap(), vec![50, 70, 40, 0]);
    }

    #[test]
    fn manhattan_structure_matches_relaxation() {
        let grid = Arc::new(GridModel::new(3, 4, 1.0).unwrap());
        let closed = DistanceStructure::manhattan(grid.clone(), 1, 3).unwrap();
        let relaxed = DistanceFunction::new(|_: &f64| 1u32, 1, 3).unwrap().structure(grid);
        for i in 0..12 {
            for j in 0..12 {
                assert_eq!(closed.distance(i, j), relaxed.distance(i, j), "{i} -> {j}");
            }
        }
        assert_eq!(closed.distance(0, 11), 5);
        let s: Vec<f64> = (0..12).map(|l| l as f64).collect();
        assert_eq!(closed.somewhere(&s).unwrap(), relaxed.somewhere(&s).unwrap());
        assert_eq!(closed.everywhere(&s).unwrap(), relaxed.everywhere(&s).unwrap());
    }

    #[test]
    fn schedules_compute_each_matrix_once() {
        use crate::space::LocationService;
        use std::sync::atomic::{AtomicUsize, Ordering};

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let function = DistanceFunction::up_to(
            move |w: &f64| {
                counter.fetch_add(1, Ordering::Relaxed);
                *w
            },
            2.0,
        )
        .unwrap();
        let service = LocationService::new(vec![(0.0, line(3)), (5.0, line(3))]).unwrap();
        let schedule = function.schedule(&service);
        schedule.structure_at(1.0).somewhere(&[1.0, 2.0, 3.0]).unwrap();
        let once = calls.load(Ordering::Relaxed);
        assert!(once > 0);
        for _ in 0..5 {
            schedule.structure_at(2.0).everywhere(&[1.0, 2.0, 3.0]).unwrap();
        }
        assert_eq!(calls.load(Ordering::Relaxed), once);
        schedule.structure_at(6.0).somewhere(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(calls.load(Ordering::Relaxed), 2 * once);
    }
}
