//! Study runner for batch sensitivity and market studies
//!
//! Holds the regional data, nominal inputs and sweep once, then builds grids
//! for any number of regions, sectors and years.

use std::time::Instant;

use rayon::prelude::*;

use crate::error::{Result, ValuationError};
use crate::inputs::ValuationInputs;
use crate::market::{MarketAggregator, MarketPortfolio};
use crate::regional::{RegionalDataSource, Sector, StudyLocation};
use crate::study::{SensitivityGrid, Sweep};
use crate::valuation::CashFlowEngine;

/// Pre-loaded study runner
///
/// # Example
/// ```ignore
/// let runner = StudyRunner::new(data, ValuationInputs::default(), sweep);
///
/// let grid = runner.run_sensitivity(&StudyLocation::new("CT", Sector::Commercial, 2015))?;
/// let study = runner.run_market(&["CT", "NY"], &[2015], &[Sector::Commercial], &MarketAggregator::default())?;
/// ```
#[derive(Debug, Clone)]
pub struct StudyRunner<D> {
    data: D,
    base_inputs: ValuationInputs,
    sweep: Sweep,
    engine: CashFlowEngine,
}

/// Every regional grid of a market study plus their aggregation
#[derive(Debug, Clone)]
pub struct MarketStudyResult {
    /// Grids in sector, year, region order
    pub grids: Vec<SensitivityGrid>,
    pub portfolio: MarketPortfolio,
}

impl MarketStudyResult {
    pub fn grid(&self, sector: Sector, year: i32, region: &str) -> Option<&SensitivityGrid> {
        let wanted = StudyLocation::new(region, sector, year);
        self.grids.iter().find(|grid| grid.location() == &wanted)
    }
}

impl<D: RegionalDataSource> StudyRunner<D> {
    pub fn new(data: D, base_inputs: ValuationInputs, sweep: Sweep) -> Self {
        Self {
            data,
            base_inputs,
            sweep,
            engine: CashFlowEngine::default(),
        }
    }

    /// Use a different cash flow engine (e.g. another penetration model)
    pub fn with_engine(mut self, engine: CashFlowEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn base_inputs(&self) -> &ValuationInputs {
        &self.base_inputs
    }

    pub fn sweep(&self) -> &Sweep {
        &self.sweep
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    /// Build the sensitivity grid for one region, sector and year
    pub fn run_sensitivity(&self, location: &StudyLocation) -> Result<SensitivityGrid> {
        let region_data = self.data.lookup(location);
        SensitivityGrid::build_with_engine(&self.engine, &self.base_inputs, &self.sweep, location, &region_data)
    }
}

impl<D: RegionalDataSource + Sync> StudyRunner<D> {
    /// Build every (sector, year, region) grid in parallel and aggregate them
    pub fn run_market<S: AsRef<str>>(
        &self,
        regions: &[S],
        years: &[i32],
        sectors: &[Sector],
        aggregator: &MarketAggregator,
    ) -> Result<MarketStudyResult> {
        if regions.is_empty() || years.is_empty() || sectors.is_empty() {
            return Err(ValuationError::InvalidSweep(
                "market study needs at least one region, year and sector".to_string(),
            ));
        }
        self.sweep.validate()?;

        let start = Instant::now();
        let locations: Vec<StudyLocation> = sectors
            .iter()
            .flat_map(|&sector| {
                years.iter().flat_map(move |&year| {
                    regions
                        .iter()
                        .map(move |region| StudyLocation::new(region.as_ref(), sector, year))
                })
            })
            .collect();

        log::info!(
            "Running market study: {} regions x {} years x {} sectors",
            regions.len(),
            years.len(),
            sectors.len()
        );

        let grids = locations
            .par_iter()
            .map(|location| self.run_sensitivity(location))
            .collect::<Result<Vec<_>>>()?;

        let portfolio = aggregator.aggregate(&grids)?;

        log::info!(
            "Market study complete: {} grids, {} segments in {:?}",
            grids.len(),
            portfolio.len(),
            start.elapsed()
        );

        Ok(MarketStudyResult { grids, portfolio })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs::InputParameter;
    use crate::regional::{RegionYearData, RegionalDataSet};
    use crate::study::Axis;
    use crate::valuation::{MarketPenetrationModel, Metric};
    use approx::assert_relative_eq;

    fn data_set() -> RegionalDataSet {
        let mut data = RegionalDataSet::new();
        let rows = [
            ("CT", Sector::Commercial, 0.16, 0.035, 1.2e10),
            ("NY", Sector::Commercial, 0.15, 0.030, 4.5e10),
            ("CT", Sector::Industrial, 0.13, 0.025, 3.0e9),
            ("NY", Sector::Industrial, 0.07, 0.020, 9.0e9),
        ];
        for (region, sector, elec, gas, generation) in rows {
            data.insert(
                StudyLocation::new(region, sector, 2015),
                RegionYearData {
                    electricity_rate_per_kwh: elec,
                    natural_gas_rate_per_kwh: gas,
                    net_generation_kwh: generation,
                },
            );
        }
        data
    }

    fn runner() -> StudyRunner<RegionalDataSet> {
        let sweep = Sweep::new(
            Axis::linspace(InputParameter::InstalledPricePerWatt, 1.0, 3.0, 3),
            Axis::new(InputParameter::ElectricEfficiency, vec![0.3, 0.5]),
        );
        StudyRunner::new(data_set(), ValuationInputs::default(), sweep)
    }

    #[test]
    fn test_run_sensitivity_binds_regional_rates() {
        let grid = runner()
            .run_sensitivity(&StudyLocation::new("ny", Sector::Commercial, 2015))
            .unwrap();
        assert_eq!(grid.shape(), (2, 3));
        assert_eq!(grid.cell(0, 0).unwrap().inputs.electricity_rate_per_kwh(), 0.15);
        assert_relative_eq!(grid.net_generation_twh(), 45.0);
    }

    #[test]
    fn test_run_market_order_and_lookup() {
        let study = runner()
            .run_market(&["CT", "NY"], &[2015], &[Sector::Commercial, Sector::Industrial], &MarketAggregator::default())
            .unwrap();

        let order: Vec<String> = study.grids.iter().map(|g| g.location().to_string()).collect();
        assert_eq!(order, vec!["CT COM 2015", "NY COM 2015", "CT IND 2015", "NY IND 2015"]);
        assert_eq!(study.portfolio.len(), 2);

        let ny_ind = study.grid(Sector::Industrial, 2015, "NY").unwrap();
        assert_eq!(ny_ind.cell(0, 0).unwrap().inputs.electricity_rate_per_kwh(), 0.07);
        assert!(study.grid(Sector::Residential, 2015, "NY").is_none());

        let segment = study.portfolio.get(Sector::Commercial, 2015).unwrap();
        assert_relative_eq!(segment.total_market_twh, 57.0);
        let ct = study.grid(Sector::Commercial, 2015, "CT").unwrap().metric(Metric::MaxMarketPenetration);
        let ny = study.grid(Sector::Commercial, 2015, "NY").unwrap().metric(Metric::MaxMarketPenetration);
        let expected = (12.0 * ct.get(1, 0).unwrap() + 45.0 * ny.get(1, 0).unwrap()) / 57.0;
        assert_relative_eq!(segment.total_market_penetration.get(1, 0).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_custom_engine_drives_penetration() {
        let half = MarketPenetrationModel {
            amplitude: MarketPenetrationModel::AMPLITUDE / 2.0,
            sigma: MarketPenetrationModel::SIGMA,
        };
        let location = StudyLocation::new("NY", Sector::Commercial, 2015);
        let default = runner().run_sensitivity(&location).unwrap();
        let halved = runner()
            .with_engine(CashFlowEngine::new(half))
            .run_sensitivity(&location)
            .unwrap();

        assert_eq!(halved.metric(Metric::NetPresentValue), default.metric(Metric::NetPresentValue));
        let expected = default.metric(Metric::MaxMarketPenetration).map(|v| v / 2.0);
        let actual = halved.metric(Metric::MaxMarketPenetration);
        for (a, e) in actual.values().zip(expected.values()) {
            assert_relative_eq!(a, e, epsilon = 1e-12);
        }

        let nobody = runner().with_engine(CashFlowEngine::new(MarketPenetrationModel {
            amplitude: 0.0,
            sigma: MarketPenetrationModel::SIGMA,
        }));
        let study = nobody
            .run_market(&["CT", "NY"], &[2015], &[Sector::Commercial], &MarketAggregator::default())
            .unwrap();
        let segment = study.portfolio.get(Sector::Commercial, 2015).unwrap();
        assert!(segment.total_market_penetration.values().all(|v| v == 0.0));
        assert!(segment.primary_energy_savings_twh.values().all(|v| v == 0.0));
    }

    #[test]
    fn test_unknown_region_gives_undefined_cells() {
        let study = runner()
            .run_market(&["ZZ"], &[2015], &[Sector::Commercial], &MarketAggregator::default())
            .unwrap();
        let grid = study.grid(Sector::Commercial, 2015, "ZZ").unwrap();
        assert_eq!(grid.metric(Metric::NetPresentValue).count_defined(), 0);
        let segment = study.portfolio.get(Sector::Commercial, 2015).unwrap();
        assert_eq!(segment.total_market_penetration.count_defined(), 0);
    }

    #[test]
    fn test_empty_market_study_rejected() {
        let empty: [&str; 0] = [];
        assert!(runner()
            .run_market(&empty, &[2015], &[Sector::Commercial], &MarketAggregator::default())
            .is_err());
    }
}
