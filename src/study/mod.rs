//! Two-parameter sensitivity studies

mod axis;
mod grid;
mod metric_grid;

pub use axis::{Axis, Sweep};
pub use grid::{GridCell, SensitivityGrid};
pub use metric_grid::MetricGrid;
