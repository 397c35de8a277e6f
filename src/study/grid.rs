//! Two-parameter sensitivity grid for one region, sector and year

use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;

use super::axis::Sweep;
use super::metric_grid::MetricGrid;
use crate::error::Result;
use crate::inputs::ValuationInputs;
use crate::regional::{RegionYearData, StudyLocation};
use crate::valuation::{CashFlowEngine, Metric, ValuationOutputs};

/// One evaluated scenario of the grid
#[derive(Debug, Clone, Serialize)]
pub struct GridCell {
    pub inputs: ValuationInputs,
    pub outputs: ValuationOutputs,
}

/// Sensitivity study result
///
/// DG inputs are varied over the x and y axes while the remaining inputs stay
/// at their nominal values. Cells are indexed `[y_index][x_index]`.
#[derive(Debug, Clone, Serialize)]
pub struct SensitivityGrid {
    location: StudyLocation,
    net_generation_twh: f64,
    sweep: Sweep,
    cells: Vec<Vec<GridCell>>,
}

impl SensitivityGrid {
    /// Build the grid with the default engine
    pub fn build(
        base_inputs: &ValuationInputs,
        sweep: &Sweep,
        location: &StudyLocation,
        region_data: &RegionYearData,
    ) -> Result<Self> {
        Self::build_with_engine(&CashFlowEngine::default(), base_inputs, sweep, location, region_data)
    }

    /// Build the grid from parameter names, e.g. `"installed_price_per_watt"`
    #[allow(clippy::too_many_arguments)]
    pub fn build_by_name(
        base_inputs: &ValuationInputs,
        x_parameter: &str,
        x_values: Vec<f64>,
        y_parameter: &str,
        y_values: Vec<f64>,
        location: &StudyLocation,
        region_data: &RegionYearData,
    ) -> Result<Self> {
        let sweep = Sweep::by_name(x_parameter, x_values, y_parameter, y_values)?;
        Self::build(base_inputs, &sweep, location, region_data)
    }

    /// Build the grid, evaluating cells in parallel
    ///
    /// The sweep is validated before any cell is evaluated. Each cell starts
    /// from the base inputs, takes the region's rates, then the x and y
    /// overrides (so a swept rate wins over the regional one).
    pub fn build_with_engine(
        engine: &CashFlowEngine,
        base_inputs: &ValuationInputs,
        sweep: &Sweep,
        location: &StudyLocation,
        region_data: &RegionYearData,
    ) -> Result<Self> {
        sweep.validate()?;

        let start = Instant::now();
        let (n_rows, n_cols) = sweep.shape();
        let bound = base_inputs.with_rates(region_data);

        if !region_data.is_complete() {
            log::warn!("Regional data for {} is incomplete, some metrics will be undefined", location);
        }

        let flat: Vec<GridCell> = (0..n_rows * n_cols)
            .into_par_iter()
            .map(|index| {
                let (row, col) = (index / n_cols, index % n_cols);
                let inputs = bound
                    .with_parameter(sweep.x.parameter, sweep.x.values[col])?
                    .with_parameter(sweep.y.parameter, sweep.y.values[row])?;
                let outputs = engine.evaluate(&inputs);
                Ok(GridCell { inputs, outputs })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut cells = Vec::with_capacity(n_rows);
        let mut iter = flat.into_iter();
        for _ in 0..n_rows {
            cells.push(iter.by_ref().take(n_cols).collect());
        }

        log::debug!(
            "Built {}x{} sensitivity grid for {} ({} vs {}) in {:?}",
            n_rows,
            n_cols,
            location,
            sweep.y.parameter,
            sweep.x.parameter,
            start.elapsed()
        );

        Ok(Self {
            location: location.clone(),
            net_generation_twh: region_data.net_generation_twh(),
            sweep: sweep.clone(),
            cells,
        })
    }

    pub fn location(&self) -> &StudyLocation {
        &self.location
    }

    /// Total net generation of the region (TWh)
    pub fn net_generation_twh(&self) -> f64 {
        self.net_generation_twh
    }

    pub fn sweep(&self) -> &Sweep {
        &self.sweep
    }

    pub fn x_values(&self) -> &[f64] {
        &self.sweep.x.values
    }

    pub fn y_values(&self) -> &[f64] {
        &self.sweep.y.values
    }

    /// (rows, columns) = (y values, x values)
    pub fn shape(&self) -> (usize, usize) {
        self.sweep.shape()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&GridCell> {
        self.cells.get(row).and_then(|r| r.get(col))
    }

    pub fn cells(&self) -> &[Vec<GridCell>] {
        &self.cells
    }

    /// One metric across the grid, shape (y values, x values)
    pub fn metric(&self, metric: Metric) -> MetricGrid {
        let rows = self
            .cells
            .iter()
            .map(|row| row.iter().map(|cell| cell.outputs.get(metric)).collect())
            .collect();
        MetricGrid::from_rows(rows).unwrap_or_else(|| {
            let (n_rows, n_cols) = self.shape();
            MetricGrid::filled(n_rows, n_cols, f64::NAN)
        })
    }

    /// One metric across the grid by name, e.g. `"payback_years"` or `"npv"`
    pub fn metric_by_name(&self, name: &str) -> Result<MetricGrid> {
        Ok(self.metric(name.parse()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValuationError;
    use crate::inputs::InputParameter;
    use crate::regional::Sector;
    use crate::study::Axis;

    fn region_data() -> RegionYearData {
        RegionYearData {
            electricity_rate_per_kwh: 0.10,
            natural_gas_rate_per_kwh: 0.04,
            net_generation_kwh: 2.5e10,
        }
    }

    fn location() -> StudyLocation {
        StudyLocation::new("CT", Sector::Commercial, 2015)
    }

    fn price_efficiency_sweep() -> Sweep {
        Sweep::new(
            Axis::linspace(InputParameter::InstalledPricePerWatt, 0.5, 3.0, 6),
            Axis::linspace(InputParameter::ElectricEfficiency, 0.3, 0.7, 4),
        )
    }

    #[test]
    fn test_grid_shape_for_every_metric() {
        let grid = SensitivityGrid::build(&ValuationInputs::default(), &price_efficiency_sweep(), &location(), &region_data()).unwrap();
        assert_eq!(grid.shape(), (4, 6));
        for metric in Metric::ALL {
            assert_eq!(grid.metric(metric).shape(), (4, 6), "{}", metric);
        }
        assert_eq!(grid.net_generation_twh(), 25.0);
    }

    #[test]
    fn test_cells_follow_row_y_column_x() {
        let grid = SensitivityGrid::build(&ValuationInputs::default(), &price_efficiency_sweep(), &location(), &region_data()).unwrap();
        for (row, y) in grid.y_values().iter().enumerate() {
            for (col, x) in grid.x_values().iter().enumerate() {
                let cell = grid.cell(row, col).unwrap();
                assert_eq!(cell.inputs.installed_price_per_watt(), *x);
                assert_eq!(cell.inputs.electric_efficiency(), *y);
                assert_eq!(cell.inputs.electricity_rate_per_kwh(), 0.10);
                assert_eq!(cell.outputs, cell.inputs.outputs());
            }
        }

        // Payback grows along x (price), falls along y (efficiency)
        let payback = grid.metric(Metric::PaybackYears);
        assert!(payback.get(3, 1).unwrap() < payback.get(3, 2).unwrap());
        assert!(payback.get(3, 1).unwrap() < payback.get(2, 1).unwrap());
    }

    #[test]
    fn test_swept_rate_overrides_regional_rate() {
        let sweep = Sweep::new(
            Axis::new(InputParameter::ElectricityRatePerKwh, vec![0.08, 0.12]),
            Axis::new(InputParameter::DiscountRate, vec![0.1]),
        );
        let grid = SensitivityGrid::build(&ValuationInputs::default(), &sweep, &location(), &region_data()).unwrap();
        assert_eq!(grid.cell(0, 1).unwrap().inputs.electricity_rate_per_kwh(), 0.12);
        assert_eq!(grid.cell(0, 1).unwrap().inputs.natural_gas_rate_per_kwh(), 0.04);
    }

    #[test]
    fn test_unknown_parameter_fails_at_build() {
        let err = SensitivityGrid::build_by_name(
            &ValuationInputs::default(),
            "installed_price_dol_W",
            vec![1.0],
            "electric_efficiency",
            vec![0.5],
            &location(),
            &region_data(),
        );
        assert!(matches!(err, Err(ValuationError::UnknownParameter(_))));
    }

    #[test]
    fn test_metric_by_name() {
        let grid = SensitivityGrid::build(&ValuationInputs::default(), &price_efficiency_sweep(), &location(), &region_data()).unwrap();
        assert_eq!(grid.metric_by_name("mmp").unwrap(), grid.metric(Metric::MaxMarketPenetration));
        assert!(matches!(grid.metric_by_name("roi"), Err(ValuationError::UnknownMetric(_))));
    }

    #[test]
    fn test_missing_data_completes_with_undefined_cells() {
        let grid = SensitivityGrid::build(
            &ValuationInputs::default(),
            &price_efficiency_sweep(),
            &location(),
            &RegionYearData::missing(),
        )
        .unwrap();
        let npv = grid.metric(Metric::NetPresentValue);
        assert_eq!(npv.shape(), (4, 6));
        assert_eq!(npv.count_defined(), 0);
        assert!(grid.net_generation_twh().is_nan());
        // Rate independent metric stays defined
        assert_eq!(grid.metric(Metric::EffectiveElectricEfficiency).count_defined(), 24);
    }

    #[test]
    fn test_rebuild_is_deterministic() {
        let build = || {
            SensitivityGrid::build(&ValuationInputs::default(), &price_efficiency_sweep(), &location(), &region_data()).unwrap()
        };
        let (first, second) = (build(), build());
        for metric in Metric::ALL {
            let (a, b) = (first.metric(metric), second.metric(metric));
            for (x, y) in a.values().zip(b.values()) {
                assert!(x == y || (x.is_nan() && y.is_nan()));
            }
        }
    }

    #[test]
    fn test_life_sweep() {
        let sweep = Sweep::new(
            Axis::new(InputParameter::LifeYears, vec![5.0, 10.0, 20.0]),
            Axis::new(InputParameter::DiscountRate, vec![0.05]),
        );
        let grid = SensitivityGrid::build(&ValuationInputs::default(), &sweep, &location(), &region_data()).unwrap();
        assert_eq!(grid.cell(0, 0).unwrap().inputs.life_years(), 5);
        let npv = grid.metric(Metric::NetPresentValue);
        assert!(npv.get(0, 0).unwrap() < npv.get(0, 2).unwrap());
    }
}
