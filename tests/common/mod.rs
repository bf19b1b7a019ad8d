#![allow(dead_code)]

use ostrel::online::time_chain::TimeChain;
use ostrel::online::update::Update;
use ostrel::signal::Signal;
use ostrel::signal::spatial::SpatialTemporalSignal;
use ostrel::space::GraphModel;
use ostrel::strel::core::{AbstractInterval, SignalDomain};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Sampling period of the generated signals.
pub const STEP: f64 = 0.5;

pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// One random value every `STEP` on `[0, end)`.
pub fn random_samples<T>(rng: &mut StdRng, end: f64, mut value: impl FnMut(&mut StdRng) -> T) -> Vec<(f64, T)> {
    let count = (end / STEP).round() as usize;
    (0..count).map(|k| (k as f64 * STEP, value(rng))).collect()
}

pub fn random_bool(rng: &mut StdRng) -> bool {
    rng.random_bool(0.5)
}

/// Small integers, so that runs of equal values appear.
pub fn random_real(rng: &mut StdRng) -> f64 {
    rng.random_range(-3..=3) as f64
}

pub fn signal_of<T: Clone + PartialEq>(samples: &[(f64, T)], end: f64) -> Signal<T> {
    let mut signal = Signal::from_samples(samples.iter().cloned()).unwrap();
    signal.end_at(end).unwrap();
    signal
}

pub fn spatial_signal_of<T: Clone + PartialEq>(samples: &[(f64, Vec<T>)], end: f64) -> SpatialTemporalSignal<T> {
    let mut signal = SpatialTemporalSignal::new(samples[0].1.len());
    for (time, values) in samples {
        signal.add(*time, values.clone()).unwrap();
    }
    signal.end_at(end).unwrap();
    signal
}

/// Each sample as an update lasting until the next one (or `end`).
pub fn updates_of<T: Clone>(samples: &[(f64, T)], end: f64) -> Vec<Update<T>> {
    samples
        .iter()
        .enumerate()
        .map(|(k, (start, value))| {
            let until = samples.get(k + 1).map_or(end, |next| next.0);
            Update::new(*start, until, value.clone()).unwrap()
        })
        .collect()
}

/// The offline verdict as the chain of exact intervals an online monitor
/// converges to: `[start, end)` instead of `[start, end]`.
pub fn exact_chain<R: SignalDomain>(signal: &Signal<R>) -> TimeChain<AbstractInterval<R>> {
    TimeChain::from_updates(
        signal
            .segments()
            .filter(|(s, e, _)| s < e)
            .map(|(s, e, v)| Update::new(s, e, AbstractInterval::point(v.clone())).unwrap()),
    )
    .unwrap()
}

/// Random directed graph with integer weights in `1..=3`.
pub fn random_graph(rng: &mut StdRng, size: usize, density: f64) -> GraphModel<f64> {
    let mut graph = GraphModel::new(size);
    for from in 0..size {
        for to in 0..size {
            if from != to && rng.random_bool(density) {
                graph.add_edge(from, to, rng.random_range(1..=3) as f64).unwrap();
            }
        }
    }
    graph
}

/// All-pairs shortest distances by Floyd-Warshall.
pub fn shortest_distances(graph: &GraphModel<f64>, size: usize) -> Vec<Vec<f64>> {
    use ostrel::space::SpatialModel;
    let mut d = vec![vec![f64::INFINITY; size]; size];
    for (i, row) in d.iter_mut().enumerate() {
        row[i] = 0.0;
        for (j, w) in graph.next(i) {
            row[*j] = row[*j].min(*w);
        }
    }
    for k in 0..size {
        for i in 0..size {
            for j in 0..size {
                if d[i][k] + d[k][j] < d[i][j] {
                    d[i][j] = d[i][k] + d[k][j];
                }
            }
        }
    }
    d
}
