//! Study configuration loaded from JSON
//!
//! Every field has a default, so `{}` plus the two axes is a complete
//! configuration:
//!
//! ```json
//! {
//!   "inputs": { "installed_price_per_watt": 3.0, "thermal_efficiency": "(1-electric_efficiency)/2" },
//!   "x_axis": { "parameter": "installed_price_per_watt", "start": 0.5, "stop": 3.0, "steps": 6 },
//!   "y_axis": { "technology": "Microturbine", "series": "electric_efficiency" },
//!   "regions": ["CT", "NY"],
//!   "years": [2015],
//!   "sectors": ["COM", "IND"]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogParameter, Technology};
use crate::error::{Result, ValuationError};
use crate::inputs::{ThermalEfficiency, ValuationInputs};
use crate::market::{MarketAggregator, DEFAULT_GRID_BASELINE_EFFICIENCY};
use crate::regional::Sector;
use crate::study::{Axis, Sweep};

/// Thermal efficiency as a plain number or a formula string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThermalEfficiencyConfig {
    Value(f64),
    Formula(String),
}

impl ThermalEfficiencyConfig {
    fn resolve(&self) -> Result<ThermalEfficiency> {
        match self {
            ThermalEfficiencyConfig::Value(value) => Ok(ThermalEfficiency::Fixed(*value)),
            ThermalEfficiencyConfig::Formula(formula) => ThermalEfficiency::parse_formula(formula),
        }
    }
}

impl Default for ThermalEfficiencyConfig {
    fn default() -> Self {
        ThermalEfficiencyConfig::Value(0.0)
    }
}

/// Nominal inputs; rates are bound per region at study time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputsConfig {
    pub electric_efficiency: f64,
    pub thermal_efficiency: ThermalEfficiencyConfig,
    pub baseline_thermal_efficiency: f64,
    pub installed_price_per_watt: f64,
    pub maintenance_cost_per_kwh: f64,
    pub life_years: u32,
    pub electric_capacity_utilization: f64,
    pub thermal_capacity_utilization: f64,
    pub inflation_rate: f64,
    pub discount_rate: f64,
}

impl Default for InputsConfig {
    fn default() -> Self {
        let nominal = ValuationInputs::default();
        Self {
            electric_efficiency: nominal.electric_efficiency(),
            thermal_efficiency: ThermalEfficiencyConfig::Value(nominal.thermal_efficiency()),
            baseline_thermal_efficiency: nominal.baseline_thermal_efficiency(),
            installed_price_per_watt: nominal.installed_price_per_watt(),
            maintenance_cost_per_kwh: nominal.maintenance_cost_per_kwh(),
            life_years: nominal.life_years(),
            electric_capacity_utilization: nominal.electric_capacity_utilization(),
            thermal_capacity_utilization: nominal.thermal_capacity_utilization(),
            inflation_rate: nominal.inflation_rate(),
            discount_rate: nominal.discount_rate(),
        }
    }
}

impl InputsConfig {
    pub fn to_inputs(&self) -> Result<ValuationInputs> {
        ValuationInputs::builder()
            .electric_efficiency(self.electric_efficiency)
            .thermal_efficiency(self.thermal_efficiency.resolve()?)
            .baseline_thermal_efficiency(self.baseline_thermal_efficiency)
            .installed_price_per_watt(self.installed_price_per_watt)
            .maintenance_cost_per_kwh(self.maintenance_cost_per_kwh)
            .life_years(self.life_years)
            .electric_capacity_utilization(self.electric_capacity_utilization)
            .thermal_capacity_utilization(self.thermal_capacity_utilization)
            .inflation_rate(self.inflation_rate)
            .discount_rate(self.discount_rate)
            .build()
    }
}

/// One sweep axis
///
/// Variants are tried in order: explicit values, an inclusive range, then a
/// catalog series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisConfig {
    Values {
        parameter: String,
        values: Vec<f64>,
    },
    Range {
        parameter: String,
        start: f64,
        stop: f64,
        steps: usize,
    },
    Catalog {
        technology: String,
        series: String,
    },
}

impl AxisConfig {
    pub fn to_axis(&self) -> Result<Axis> {
        match self {
            AxisConfig::Values { parameter, values } => Ok(Axis::new(parameter.parse()?, values.clone())),
            AxisConfig::Range {
                parameter,
                start,
                stop,
                steps,
            } => Ok(Axis::linspace(parameter.parse()?, *start, *stop, *steps)),
            AxisConfig::Catalog { technology, series } => {
                let technology: Technology = technology.parse()?;
                let series: CatalogParameter = series.parse()?;
                Axis::from_catalog(technology, series)
            }
        }
    }
}

/// A complete sensitivity or market study
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyConfig {
    #[serde(default)]
    pub inputs: InputsConfig,

    pub x_axis: AxisConfig,

    pub y_axis: AxisConfig,

    /// Region codes (default: ["US"])
    #[serde(default = "default_regions")]
    pub regions: Vec<String>,

    /// Data years (default: [2015])
    #[serde(default = "default_years")]
    pub years: Vec<i32>,

    /// Sector names, only the first letter counts (default: ["COM"])
    #[serde(default = "default_sectors")]
    pub sectors: Vec<String>,

    /// Grid electric efficiency used for primary energy savings (default: 0.34)
    #[serde(default = "default_grid_baseline_efficiency")]
    pub grid_baseline_efficiency: f64,
}

fn default_regions() -> Vec<String> { vec!["US".to_string()] }
fn default_years() -> Vec<i32> { vec![2015] }
fn default_sectors() -> Vec<String> { vec!["COM".to_string()] }
fn default_grid_baseline_efficiency() -> f64 { DEFAULT_GRID_BASELINE_EFFICIENCY }

impl StudyConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&text)?;
        log::info!("Loaded study config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn base_inputs(&self) -> Result<ValuationInputs> {
        self.inputs.to_inputs()
    }

    /// Resolved and validated sweep
    pub fn sweep(&self) -> Result<Sweep> {
        let sweep = Sweep::new(self.x_axis.to_axis()?, self.y_axis.to_axis()?);
        sweep.validate()?;
        Ok(sweep)
    }

    /// Parsed sectors with duplicates removed, order kept
    pub fn sectors(&self) -> Result<Vec<Sector>> {
        let mut sectors = Vec::with_capacity(self.sectors.len());
        for name in &self.sectors {
            let sector: Sector = name.parse()?;
            if !sectors.contains(&sector) {
                sectors.push(sector);
            }
        }
        if sectors.is_empty() {
            return Err(ValuationError::InvalidSweep("no sectors configured".to_string()));
        }
        Ok(sectors)
    }

    pub fn aggregator(&self) -> Result<MarketAggregator> {
        MarketAggregator::new(self.grid_baseline_efficiency)
    }
}
