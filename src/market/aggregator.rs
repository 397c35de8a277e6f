//! Aggregation of regional sensitivity grids into market segments

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::error::{Result, ValuationError};
use crate::regional::Sector;
use crate::study::{MetricGrid, SensitivityGrid, Sweep};
use crate::valuation::Metric;

/// TWh in one quad (10^15 Btu)
pub const TWH_PER_QUAD: f64 = 293.1;

/// Average electric efficiency of central grid generation
pub const DEFAULT_GRID_BASELINE_EFFICIENCY: f64 = 0.34;

/// Aggregate results for one sector and year
#[derive(Debug, Clone, Serialize)]
pub struct MarketSegment {
    pub sector: Sector,
    pub year: i32,
    /// Contributing regions, in aggregation order
    pub regions: Vec<String>,
    pub sweep: Sweep,
    /// Total generation across regions (TWh)
    pub total_market_twh: f64,
    /// Generation-weighted sum of regional max market penetration (TWh)
    pub addressed_market_twh: MetricGrid,
    /// Addressed market as a fraction of the total market
    pub total_market_penetration: MetricGrid,
    pub primary_energy_savings_twh: MetricGrid,
    pub primary_energy_savings_quads: MetricGrid,
}

impl MarketSegment {
    /// Aggregate grid by metric name
    pub fn grid(&self, name: &str) -> Option<&MetricGrid> {
        match name {
            "addressed_market_twh" => Some(&self.addressed_market_twh),
            "total_market_penetration" => Some(&self.total_market_penetration),
            "primary_energy_savings_twh" => Some(&self.primary_energy_savings_twh),
            "primary_energy_savings_quads" => Some(&self.primary_energy_savings_quads),
            _ => None,
        }
    }

    /// Names accepted by [`MarketSegment::grid`]
    pub const GRID_NAMES: [&'static str; 4] = [
        "addressed_market_twh",
        "total_market_penetration",
        "primary_energy_savings_twh",
        "primary_energy_savings_quads",
    ];
}

/// Market segments keyed by sector, then year
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct MarketPortfolio {
    segments: BTreeMap<Sector, BTreeMap<i32, MarketSegment>>,
}

impl MarketPortfolio {
    pub fn get(&self, sector: Sector, year: i32) -> Option<&MarketSegment> {
        self.segments.get(&sector).and_then(|years| years.get(&year))
    }

    pub fn segments(&self) -> impl Iterator<Item = &MarketSegment> {
        self.segments.values().flat_map(|years| years.values())
    }

    pub fn len(&self) -> usize {
        self.segments.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Combines regional grids per (sector, year)
#[derive(Debug, Clone)]
pub struct MarketAggregator {
    grid_baseline_efficiency: f64,
}

impl MarketAggregator {
    pub fn new(grid_baseline_efficiency: f64) -> Result<Self> {
        if !(grid_baseline_efficiency > 0.0 && grid_baseline_efficiency <= 1.0) {
            return Err(ValuationError::InvalidValue {
                parameter: "grid_baseline_efficiency".to_string(),
                value: grid_baseline_efficiency,
                reason: "fraction out of range".to_string(),
            });
        }
        Ok(Self { grid_baseline_efficiency })
    }

    pub fn grid_baseline_efficiency(&self) -> f64 {
        self.grid_baseline_efficiency
    }

    /// Aggregate grids into a portfolio
    ///
    /// Grids are grouped by (sector, year) keeping their input order. All
    /// grids of a group must share the same sweep, and a region may appear
    /// only once per group.
    pub fn aggregate<'a, I>(&self, grids: I) -> Result<MarketPortfolio>
    where
        I: IntoIterator<Item = &'a SensitivityGrid>,
    {
        let mut groups: BTreeMap<(Sector, i32), Vec<&SensitivityGrid>> = BTreeMap::new();
        for grid in grids {
            let location = grid.location();
            groups
                .entry((location.sector, location.year))
                .or_default()
                .push(grid);
        }

        let mut portfolio = MarketPortfolio::default();
        for ((sector, year), members) in groups {
            let segment = self.aggregate_segment(sector, year, &members)?;
            log::debug!(
                "Aggregated {} {}: {} regions, total market {:.3} TWh",
                sector,
                year,
                segment.regions.len(),
                segment.total_market_twh
            );
            portfolio
                .segments
                .entry(sector)
                .or_default()
                .insert(year, segment);
        }

        Ok(portfolio)
    }

    fn aggregate_segment(&self, sector: Sector, year: i32, members: &[&SensitivityGrid]) -> Result<MarketSegment> {
        let inconsistent = |reason: String| ValuationError::InconsistentGrids {
            sector: sector.to_string(),
            year,
            reason,
        };

        let (first, last) = match (members.first(), members.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Err(inconsistent("no regions".to_string())),
        };
        let sweep = first.sweep().clone();
        let (n_rows, n_cols) = sweep.shape();

        let mut seen = HashSet::new();
        let mut regions = Vec::with_capacity(members.len());
        let mut total_market_twh = 0.0;
        let mut addressed_market_twh = MetricGrid::zeros(n_rows, n_cols);

        for grid in members {
            let region = &grid.location().region;
            if !seen.insert(region.clone()) {
                return Err(inconsistent(format!("region {} appears more than once", region)));
            }
            if grid.sweep() != &sweep {
                return Err(inconsistent(format!(
                    "region {} was swept over different axes than {}",
                    region,
                    first.location().region
                )));
            }

            let generation = grid.net_generation_twh();
            let penetration = grid.metric(Metric::MaxMarketPenetration);
            total_market_twh += generation;
            addressed_market_twh = addressed_market_twh.zip_with(&penetration, |sum, mmp| sum + generation * mmp);
            regions.push(region.clone());
        }

        let total_market_penetration = if total_market_twh == 0.0 {
            MetricGrid::filled(n_rows, n_cols, f64::NAN)
        } else {
            addressed_market_twh.map(|addressed| addressed / total_market_twh)
        };
        if total_market_penetration.count_defined() == 0 {
            log::warn!("Total market penetration for {} {} is undefined everywhere", sector, year);
        }

        // The last region's effective efficiency stands in for the whole group
        let g = self.grid_baseline_efficiency;
        let effective_efficiency = last.metric(Metric::EffectiveElectricEfficiency);
        let primary_energy_savings_twh = addressed_market_twh
            .zip_with(&effective_efficiency, |addressed, efficiency| addressed / g * (1.0 - g / efficiency));
        let primary_energy_savings_quads = primary_energy_savings_twh.map(|twh| twh / TWH_PER_QUAD);

        Ok(MarketSegment {
            sector,
            year,
            regions,
            sweep,
            total_market_twh,
            addressed_market_twh,
            total_market_penetration,
            primary_energy_savings_twh,
            primary_energy_savings_quads,
        })
    }
}

impl Default for MarketAggregator {
    fn default() -> Self {
        Self {
            grid_baseline_efficiency: DEFAULT_GRID_BASELINE_EFFICIENCY,
        }
    }
}
