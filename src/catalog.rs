//! EPA CHP technology catalog
//!
//! Representative system specifications from the EPA "Catalog of CHP
//! Technologies" (2015). Electric efficiencies are on an LHV basis.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValuationError};
use crate::inputs::InputParameter;

/// CHP prime mover technology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Technology {
    SiEngine,
    GasTurbine,
    Microturbine,
    FuelCell,
}

/// Catalog series available for every technology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogParameter {
    PowerKw,
    ElectricEfficiency,
    InstalledPricePerWatt,
    MaintenanceCostPerKwh,
}

struct TechnologySpecs {
    power_kw: &'static [f64],
    electric_efficiency: &'static [f64],
    installed_price_per_watt: &'static [f64],
    maintenance_cost_per_kwh: &'static [f64],
}

const SI_ENGINE: TechnologySpecs = TechnologySpecs {
    power_kw: &[100.0, 633.0, 1121.0, 3326.0, 9341.0],
    electric_efficiency: &[0.30, 0.38, 0.41, 0.45, 0.46],
    installed_price_per_watt: &[2.900, 2.837, 2.366, 1.801, 1.433],
    maintenance_cost_per_kwh: &[0.024, 0.021, 0.019, 0.016, 0.009],
};

const GAS_TURBINE: TechnologySpecs = TechnologySpecs {
    power_kw: &[3304.0, 7038.0, 9950.0, 20336.0, 44488.0],
    electric_efficiency: &[0.27, 0.32, 0.30, 0.37, 0.40],
    installed_price_per_watt: &[3.281, 2.080, 1.976, 1.518, 1.248],
    maintenance_cost_per_kwh: &[0.013, 0.012, 0.012, 0.009, 0.009],
};

const MICROTURBINE: TechnologySpecs = TechnologySpecs {
    power_kw: &[28.0, 61.0, 90.0, 240.0, 320.0, 950.0],
    electric_efficiency: &[0.24, 0.26, 0.30, 0.29, 0.31, 0.30],
    installed_price_per_watt: &[4.300, 3.220, 3.150, 2.720, 2.580, 2.500],
    maintenance_cost_per_kwh: &[0.013, 0.013, 0.016, 0.011, 0.009, 0.012],
};

const FUEL_CELL: TechnologySpecs = TechnologySpecs {
    power_kw: &[1.0, 2.0, 300.0, 400.0, 1400.0],
    electric_efficiency: &[0.39, 0.60, 0.52, 0.38, 0.47],
    installed_price_per_watt: &[22.0, 23.0, 10.0, 7.0, 4.6],
    maintenance_cost_per_kwh: &[0.060, 0.055, 0.045, 0.036, 0.040],
};

impl Technology {
    pub const ALL: [Technology; 4] = [
        Technology::SiEngine,
        Technology::GasTurbine,
        Technology::Microturbine,
        Technology::FuelCell,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Technology::SiEngine => "SI Engine",
            Technology::GasTurbine => "Gas Turbine",
            Technology::Microturbine => "Microturbine",
            Technology::FuelCell => "Fuel Cell",
        }
    }

    fn specs(&self) -> &'static TechnologySpecs {
        match self {
            Technology::SiEngine => &SI_ENGINE,
            Technology::GasTurbine => &GAS_TURBINE,
            Technology::Microturbine => &MICROTURBINE,
            Technology::FuelCell => &FUEL_CELL,
        }
    }

    /// Catalog series, one entry per representative system size
    pub fn series(&self, parameter: CatalogParameter) -> &'static [f64] {
        let specs = self.specs();
        match parameter {
            CatalogParameter::PowerKw => specs.power_kw,
            CatalogParameter::ElectricEfficiency => specs.electric_efficiency,
            CatalogParameter::InstalledPricePerWatt => specs.installed_price_per_watt,
            CatalogParameter::MaintenanceCostPerKwh => specs.maintenance_cost_per_kwh,
        }
    }

    pub fn system_count(&self) -> usize {
        self.specs().power_kw.len()
    }
}

impl FromStr for Technology {
    type Err = ValuationError;

    /// Matches the catalog name ignoring case, spaces and underscores
    fn from_str(s: &str) -> Result<Self> {
        let key = |name: &str| -> String {
            name.chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .map(|c| c.to_ascii_lowercase())
                .collect()
        };
        let wanted = key(s);
        Technology::ALL
            .iter()
            .copied()
            .find(|tech| key(tech.name()) == wanted)
            .ok_or_else(|| ValuationError::UnknownTechnology(s.to_string()))
    }
}

impl fmt::Display for Technology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl CatalogParameter {
    pub const ALL: [CatalogParameter; 4] = [
        CatalogParameter::PowerKw,
        CatalogParameter::ElectricEfficiency,
        CatalogParameter::InstalledPricePerWatt,
        CatalogParameter::MaintenanceCostPerKwh,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogParameter::PowerKw => "power_kw",
            CatalogParameter::ElectricEfficiency => "electric_efficiency",
            CatalogParameter::InstalledPricePerWatt => "installed_price_per_watt",
            CatalogParameter::MaintenanceCostPerKwh => "maintenance_cost_per_kwh",
        }
    }

    /// Input parameter a series can be swept as
    pub fn input_parameter(&self) -> Option<InputParameter> {
        match self {
            CatalogParameter::PowerKw => None,
            CatalogParameter::ElectricEfficiency => Some(InputParameter::ElectricEfficiency),
            CatalogParameter::InstalledPricePerWatt => Some(InputParameter::InstalledPricePerWatt),
            CatalogParameter::MaintenanceCostPerKwh => Some(InputParameter::MaintenanceCostPerKwh),
        }
    }
}

impl FromStr for CatalogParameter {
    type Err = ValuationError;

    fn from_str(s: &str) -> Result<Self> {
        CatalogParameter::ALL
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValuationError::UnknownParameter(s.to_string()))
    }
}

/// Look up a catalog series by technology and parameter
pub fn catalog_values(technology: Technology, parameter: CatalogParameter) -> &'static [f64] {
    technology.series(parameter)
}
