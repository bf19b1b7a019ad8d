//! Somewhere, everywhere, reach and escape over spatio-temporal signals.
//!
//! Every spatial operator is pointwise in time. [`spatial_map`] walks the
//! union of the value changes of all locations and the configuration
//! changes of the location service, and re-evaluates the spatial operator on
//! each resulting slice.

use crate::error::{MonitorError, Result};
use crate::signal::Signal;
use crate::signal::cursor::ParallelSignalCursor;
use crate::space::distance::{DistanceDomain, DistanceSchedule, DistanceStructure};
use crate::strel::core::SignalDomain;

use tracing::debug;

/// Applies `op` to every spatial snapshot of `signals`, using the distance
/// structure of the configuration in force.
///
/// When a configuration change and a value change coincide, the new
/// configuration is installed before the value is evaluated.
pub fn spatial_map<E, A, T, R, F>(
    schedule: &DistanceSchedule<E, A>,
    signals: &[Signal<T>],
    op: F,
) -> Result<Vec<Signal<R>>>
where
    E: 'static,
    A: DistanceDomain,
    T: Clone + PartialEq,
    R: Clone + PartialEq,
    F: Fn(&DistanceStructure<E, A>, &[T]) -> Result<Vec<R>>,
{
    let service = schedule.service();
    if signals.len() != service.size() {
        return Err(MonitorError::configuration(format!(
            "signal has {} locations but the spatial model has {}",
            signals.len(),
            service.size()
        )));
    }
    let mut result = vec![Signal::new(); signals.len()];
    let mut cursor = ParallelSignalCursor::new(signals);
    if cursor.completed() {
        return Ok(result);
    }
    let mut index = service.index_at(cursor.time());
    loop {
        let time = cursor.time();
        let values: Vec<T> = cursor.values().into_iter().cloned().collect();
        for (signal, value) in result.iter_mut().zip(op(schedule.structure(index), &values)?) {
            signal.push(time, value);
        }
        let next_model = service.time(index + 1).unwrap_or(f64::INFINITY);
        let next = next_model.min(cursor.next_time());
        if next >= cursor.end() {
            break;
        }
        if next_model <= next {
            index += 1;
            debug!(time = next, snapshot = index, "switching spatial configuration");
        }
        cursor.move_to(next);
    }
    for signal in &mut result {
        signal.close(cursor.end());
    }
    Ok(result)
}

pub fn somewhere<E, A, R>(
    schedule: &DistanceSchedule<E, A>,
    signals: &[Signal<R>],
    parallel: bool,
) -> Result<Vec<Signal<R>>>
where
    E: 'static,
    A: DistanceDomain,
    R: SignalDomain,
{
    spatial_map(schedule, signals, |ds, values| {
        if parallel {
            ds.somewhere_parallel(values)
        } else {
            ds.somewhere(values)
        }
    })
}

pub fn everywhere<E, A, R>(
    schedule: &DistanceSchedule<E, A>,
    signals: &[Signal<R>],
    parallel: bool,
) -> Result<Vec<Signal<R>>>
where
    E: 'static,
    A: DistanceDomain,
    R: SignalDomain,
{
    spatial_map(schedule, signals, |ds, values| {
        if parallel {
            ds.everywhere_parallel(values)
        } else {
            ds.everywhere(values)
        }
    })
}

pub fn escape<E, A, R>(
    schedule: &DistanceSchedule<E, A>,
    signals: &[Signal<R>],
) -> Result<Vec<Signal<R>>>
where
    E: 'static,
    A: DistanceDomain,
    R: SignalDomain,
{
    spatial_map(schedule, signals, |ds, values| ds.escape(values))
}

pub fn reach<E, A, R>(
    schedule: &DistanceSchedule<E, A>,
    lhs: &[Signal<R>],
    rhs: &[Signal<R>],
) -> Result<Vec<Signal<R>>>
where
    E: 'static,
    A: DistanceDomain,
    R: SignalDomain,
{
    if lhs.len() != rhs.len() {
        return Err(MonitorError::configuration(format!(
            "reach operands have {} and {} locations",
            lhs.len(),
            rhs.len()
        )));
    }
    let pairs: Vec<Signal<(R, R)>> = lhs
        .iter()
        .zip(rhs)
        .map(|(p, q)| p.apply_binary(q, |a, b| (a.clone(), b.clone())))
        .collect();
    spatial_map(schedule, &pairs, |ds, values| {
        let (s1, s2): (Vec<R>, Vec<R>) = values.iter().cloned().unzip();
        ds.reach(&s1, &s2)
    })
}

/// Aggregates, at every instant, the values of each location's
/// neighbourhood with `aggregator` (a count, an average, ...).
pub fn reduce<E, A, T, U, F>(
    schedule: &DistanceSchedule<E, A>,
    signals: &[Signal<T>],
    aggregator: F,
) -> Result<Vec<Signal<U>>>
where
    E: 'static,
    A: DistanceDomain,
    T: Clone + PartialEq,
    U: Clone + PartialEq,
    F: Fn(&[&T]) -> U,
{
    spatial_map(schedule, signals, |ds, values| ds.reduce(values, &aggregator))
}
