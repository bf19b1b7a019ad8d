//! Regular grids: locations laid out row by row, each connected to its four
//! orthogonal neighbours by edges carrying the same label.

use super::SpatialModel;
use crate::error::{MonitorError, Result};

/// A `rows x columns` grid. Location `l` sits at column `l % columns` and
/// row `l / columns`; border cells have fewer neighbours.
#[derive(Clone, Debug, PartialEq)]
pub struct GridModel<E> {
    rows: usize,
    columns: usize,
    label: E,
    neighbours: Vec<Vec<(usize, E)>>,
}

impl<E: Clone> GridModel<E> {
    pub fn new(rows: usize, columns: usize, label: E) -> Result<Self> {
        if rows == 0 || columns == 0 {
            return Err(MonitorError::argument(format!(
                "a grid needs at least one row and one column, got {rows}x{columns}"
            )));
        }
        let neighbours = (0..rows * columns)
            .map(|l| {
                let (x, y) = (l % columns, l / columns);
                let mut out = Vec::with_capacity(4);
                if y + 1 < rows {
                    out.push((l + columns, label.clone()));
                }
                if y > 0 {
                    out.push((l - columns, label.clone()));
                }
                if x > 0 {
                    out.push((l - 1, label.clone()));
                }
                if x + 1 < columns {
                    out.push((l + 1, label.clone()));
                }
                out
            })
            .collect();
        Ok(GridModel {
            rows,
            columns,
            label,
            neighbours,
        })
    }
}

impl<E> GridModel<E> {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// The label shared by every edge.
    pub fn label(&self) -> &E {
        &self.label
    }

    /// `(column, row)` of `location`.
    pub fn to_coordinates(&self, location: usize) -> Option<(usize, usize)> {
        (location < self.rows * self.columns)
            .then_some((location % self.columns, location / self.columns))
    }

    pub fn from_coordinates(&self, column: usize, row: usize) -> Option<usize> {
        (column < self.columns && row < self.rows).then_some(row * self.columns + column)
    }

    /// Number of hops between two locations.
    pub fn manhattan(&self, from: usize, to: usize) -> Option<u32> {
        let (fx, fy) = self.to_coordinates(from)?;
        let (tx, ty) = self.to_coordinates(to)?;
        u32::try_from(fx.abs_diff(tx) + fy.abs_diff(ty)).ok()
    }
}

impl<E: Send + Sync> SpatialModel<E> for GridModel<E> {
    fn size(&self) -> usize {
        self.rows * self.columns
    }

    fn next(&self, location: usize) -> &[(usize, E)] {
        self.neighbours.get(location).map(Vec::as_slice).unwrap_or(&[])
    }

    fn previous(&self, location: usize) -> &[(usize, E)] {
        self.next(location)
    }

    fn get(&self, from: usize, to: usize) -> Option<&E> {
        (self.manhattan(from, to)? == 1).then_some(&self.label)
    }
}
