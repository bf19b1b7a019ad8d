//! Statistical model checking.
//!
//! A spatio-temporal monitor is run over many sampled trajectories of the
//! same system and the verdicts are summarised, per location and time
//! point, by their mean and variance. With boolean verdicts the mean is the
//! estimated probability of satisfaction.

use crate::error::Result;
use crate::signal::spatial::SpatialTemporalSignal;
use crate::space::LocationService;
use crate::space::distance::DistanceDomain;
use crate::strel::core::SignalDomain;
use crate::strel::monitor::SpatialTemporalMonitor;

use tracing::debug;

/// Numeric reading of a verdict.
pub trait Score {
    fn score(&self) -> f64;
}

impl Score for bool {
    fn score(&self) -> f64 {
        if *self { 1.0 } else { 0.0 }
    }
}

impl Score for f64 {
    fn score(&self) -> f64 {
        *self
    }
}

/// Summary of the verdicts of one location at one time point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Statistics {
    pub average: f64,
    /// Population variance.
    pub variance: f64,
    pub std_dev: f64,
    /// Trajectories defined at the time point.
    pub count: usize,
}

impl Statistics {
    fn of(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let count = values.len();
        let average = values.iter().sum::<f64>() / count as f64;
        let variance = values.iter().map(|v| (v - average).powi(2)).sum::<f64>() / count as f64;
        Some(Statistics {
            average,
            variance,
            std_dev: variance.sqrt(),
            count,
        })
    }
}

pub struct StatisticalModelChecker<'a, E, V, R, A = f64> {
    monitor: &'a SpatialTemporalMonitor<E, V, R, A>,
    service: &'a LocationService<E>,
}

impl<'a, E, V, R, A> StatisticalModelChecker<'a, E, V, R, A>
where
    E: 'static,
    V: Clone + PartialEq + Send + Sync + 'static,
    R: SignalDomain + Score,
    A: DistanceDomain,
{
    pub fn new(monitor: &'a SpatialTemporalMonitor<E, V, R, A>, service: &'a LocationService<E>) -> Self {
        StatisticalModelChecker { monitor, service }
    }

    /// Monitors every trajectory, one rayon task each when the `parallel`
    /// feature is on. Fails on the first trajectory the monitor rejects.
    pub fn check(&self, samples: &[SpatialTemporalSignal<V>]) -> Result<Vec<SpatialTemporalSignal<R>>> {
        debug!(trajectories = samples.len(), "statistical model checking");
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            samples
                .par_iter()
                .map(|s| self.monitor.monitor(self.service, s))
                .collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            samples
                .iter()
                .map(|s| self.monitor.monitor(self.service, s))
                .collect()
        }
    }
}

/// `[location][time]` statistics of `results` at each of `times`; `None`
/// where no trajectory is defined.
pub fn analyze<R>(results: &[SpatialTemporalSignal<R>], times: &[f64]) -> Vec<Vec<Option<Statistics>>>
where
    R: SignalDomain + Score,
{
    let locations = results.iter().map(SpatialTemporalSignal::size).max().unwrap_or(0);
    (0..locations)
        .map(|l| {
            times
                .iter()
                .map(|&t| {
                    let values: Vec<f64> = results
                        .iter()
                        .filter_map(|r| r.signal(l)?.value_at(t).map(R::score))
                        .collect();
                    Statistics::of(&values)
                })
                .collect()
        })
        .collect()
}
