//! Spatial models over discrete locations.
//!
//! - [`GraphModel`]: a directed graph with labelled edges.
//! - [`grid::GridModel`]: a regular grid with four-neighbourhoods.
//! - [`LocationService`]: a step function of spatial configurations over time.
//! - [`distance`]: bounded distance views and the spatial operators.

pub mod distance;
pub mod grid;

use crate::error::{MonitorError, Result};

use std::sync::Arc;

/// Locations `0..size()` connected by directed, labelled edges.
pub trait SpatialModel<E>: Send + Sync {
    fn size(&self) -> usize;

    /// Outgoing edges of `location` as `(target, label)`.
    fn next(&self, location: usize) -> &[(usize, E)];

    /// Incoming edges of `location` as `(source, label)`.
    fn previous(&self, location: usize) -> &[(usize, E)];

    /// Label of the edge `from -> to`, if present.
    fn get(&self, from: usize, to: usize) -> Option<&E> {
        self.next(from)
            .iter()
            .find(|(target, _)| *target == to)
            .map(|(_, label)| label)
    }
}

/// Adjacency-list graph; both directions are indexed so that `next` and
/// `previous` are O(degree).
#[derive(Clone, Debug, PartialEq)]
pub struct GraphModel<E> {
    outgoing: Vec<Vec<(usize, E)>>,
    incoming: Vec<Vec<(usize, E)>>,
}

impl<E: Clone> GraphModel<E> {
    pub fn new(size: usize) -> Self {
        GraphModel {
            outgoing: vec![Vec::new(); size],
            incoming: vec![Vec::new(); size],
        }
    }

    pub fn from_edges<I>(size: usize, edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, usize, E)>,
    {
        let mut model = GraphModel::new(size);
        for (from, to, label) in edges {
            model.add_edge(from, to, label)?;
        }
        Ok(model)
    }

    /// Adds (or relabels) the edge `from -> to`.
    pub fn add_edge(&mut self, from: usize, to: usize, label: E) -> Result<()> {
        let size = self.outgoing.len();
        if from >= size || to >= size {
            return Err(MonitorError::argument(format!(
                "edge {from} -> {to} leaves the model of {size} locations"
            )));
        }
        match self.outgoing[from].iter_mut().find(|(t, _)| *t == to) {
            Some(edge) => edge.1 = label.clone(),
            None => self.outgoing[from].push((to, label.clone())),
        }
        match self.incoming[to].iter_mut().find(|(s, _)| *s == from) {
            Some(edge) => edge.1 = label,
            None => self.incoming[to].push((from, label)),
        }
        Ok(())
    }
}

impl<E: Send + Sync> SpatialModel<E> for GraphModel<E> {
    fn size(&self) -> usize {
        self.outgoing.len()
    }

    fn next(&self, location: usize) -> &[(usize, E)] {
        self.outgoing.get(location).map(Vec::as_slice).unwrap_or(&[])
    }

    fn previous(&self, location: usize) -> &[(usize, E)] {
        self.incoming.get(location).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Shared handle to an immutable spatial snapshot.
pub type SharedModel<E> = Arc<dyn SpatialModel<E>>;

/// Spatial configurations indexed by strictly increasing time. The model
/// installed at `t` holds until the next one; before the first time point
/// the first model applies.
pub struct LocationService<E> {
    models: Vec<(f64, SharedModel<E>)>,
}

impl<E> Clone for LocationService<E> {
    fn clone(&self) -> Self {
        LocationService {
            models: self.models.clone(),
        }
    }
}

impl<E: 'static> LocationService<E> {
    pub fn new(models: Vec<(f64, SharedModel<E>)>) -> Result<Self> {
        if models.is_empty() {
            return Err(MonitorError::argument("a location service needs at least one model"));
        }
        if let Some(pair) = models.windows(2).find(|w| w[0].0 >= w[1].0) {
            return Err(MonitorError::argument(format!(
                "location service times must increase strictly: {} then {}",
                pair[0].0, pair[1].0
            )));
        }
        let size = models[0].1.size();
        if models.iter().any(|(_, m)| m.size() != size) {
            return Err(MonitorError::argument(
                "all spatial models of a location service must share the location count",
            ));
        }
        Ok(LocationService { models })
    }

    /// A service whose configuration never changes.
    pub fn constant<M: SpatialModel<E> + 'static>(model: M) -> Self {
        let model: SharedModel<E> = Arc::new(model);
        LocationService {
            models: vec![(f64::NEG_INFINITY, model)],
        }
    }

    /// Number of locations shared by every snapshot.
    pub fn size(&self) -> usize {
        self.models[0].1.size()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Index of the snapshot in force at `time`.
    pub fn index_at(&self, time: f64) -> usize {
        self.models
            .partition_point(|(t, _)| *t <= time)
            .saturating_sub(1)
    }

    pub fn model_at(&self, time: f64) -> &SharedModel<E> {
        &self.models[self.index_at(time)].1
    }

    pub fn model(&self, index: usize) -> &SharedModel<E> {
        &self.models[index].1
    }

    /// Time at which snapshot `index` takes over, if it exists.
    pub fn time(&self, index: usize) -> Option<f64> {
        self.models.get(index).map(|(t, _)| *t)
    }
}

impl<E> std::fmt::Debug for LocationService<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationService")
            .field("times", &self.models.iter().map(|(t, _)| *t).collect::<Vec<_>>())
            .finish()
    }
}
