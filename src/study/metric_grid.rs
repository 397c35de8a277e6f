//! Two-dimensional numeric grids indexed (row = y, column = x)

use serde::{Deserialize, Serialize};

/// Rectangular grid of metric values
///
/// Serializes as a list of rows. NaN marks an undefined cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricGrid {
    rows: Vec<Vec<f64>>,
}

impl MetricGrid {
    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            rows: vec![vec![value; cols]; rows],
        }
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, 0.0)
    }

    /// Build from row vectors; `None` unless every row has the same length
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Option<Self> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        if rows.iter().all(|row| row.len() == cols) {
            Some(Self { rows })
        } else {
            None
        }
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.rows.first().map(Vec::len).unwrap_or(0))
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.rows.get(row).and_then(|r| r.get(col)).copied()
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().flat_map(|row| row.iter().copied())
    }

    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            rows: self
                .rows
                .iter()
                .map(|row| row.iter().map(|&v| f(v)).collect())
                .collect(),
        }
    }

    /// Element-wise combination; callers ensure equal shapes
    pub fn zip_with(&self, other: &MetricGrid, f: impl Fn(f64, f64) -> f64) -> Self {
        debug_assert_eq!(self.shape(), other.shape());
        Self {
            rows: self
                .rows
                .iter()
                .zip(&other.rows)
                .map(|(a, b)| a.iter().zip(b).map(|(&x, &y)| f(x, y)).collect())
                .collect(),
        }
    }

    /// Number of cells holding a defined (non-NaN) value
    pub fn count_defined(&self) -> usize {
        self.values().filter(|v| !v.is_nan()).count()
    }

    /// Smallest and largest defined values
    pub fn range(&self) -> Option<(f64, f64)> {
        self.values().filter(|v| !v.is_nan()).fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}
