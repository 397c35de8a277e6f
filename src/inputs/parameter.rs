//! Sweepable input parameters
//!
//! A closed table of the fields of [`ValuationInputs`] with typed get/set
//! access, used by sensitivity sweeps to override fields by identifier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ValuationInputs;
use crate::error::{Result, ValuationError};

/// Longest analysis horizon accepted, in years
pub const MAX_LIFE_YEARS: u32 = 1000;

/// Identifier of a [`ValuationInputs`] field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputParameter {
    ElectricEfficiency,
    ThermalEfficiency,
    BaselineThermalEfficiency,
    InstalledPricePerWatt,
    MaintenanceCostPerKwh,
    LifeYears,
    ElectricCapacityUtilization,
    ThermalCapacityUtilization,
    InflationRate,
    DiscountRate,
    ElectricityRatePerKwh,
    NaturalGasRatePerKwh,
}

impl InputParameter {
    pub const ALL: [InputParameter; 12] = [
        InputParameter::ElectricEfficiency,
        InputParameter::ThermalEfficiency,
        InputParameter::BaselineThermalEfficiency,
        InputParameter::InstalledPricePerWatt,
        InputParameter::MaintenanceCostPerKwh,
        InputParameter::LifeYears,
        InputParameter::ElectricCapacityUtilization,
        InputParameter::ThermalCapacityUtilization,
        InputParameter::InflationRate,
        InputParameter::DiscountRate,
        InputParameter::ElectricityRatePerKwh,
        InputParameter::NaturalGasRatePerKwh,
    ];

    /// Field name as used in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            InputParameter::ElectricEfficiency => "electric_efficiency",
            InputParameter::ThermalEfficiency => "thermal_efficiency",
            InputParameter::BaselineThermalEfficiency => "baseline_thermal_efficiency",
            InputParameter::InstalledPricePerWatt => "installed_price_per_watt",
            InputParameter::MaintenanceCostPerKwh => "maintenance_cost_per_kwh",
            InputParameter::LifeYears => "life_years",
            InputParameter::ElectricCapacityUtilization => "electric_capacity_utilization",
            InputParameter::ThermalCapacityUtilization => "thermal_capacity_utilization",
            InputParameter::InflationRate => "inflation_rate",
            InputParameter::DiscountRate => "discount_rate",
            InputParameter::ElectricityRatePerKwh => "electricity_rate_per_kwh",
            InputParameter::NaturalGasRatePerKwh => "natural_gas_rate_per_kwh",
        }
    }

    /// Axis label for reports
    pub fn label(&self) -> &'static str {
        match self {
            InputParameter::ElectricEfficiency => "Electric Efficiency",
            InputParameter::ThermalEfficiency => "Thermal Efficiency",
            InputParameter::BaselineThermalEfficiency => "Baseline Thermal Efficiency",
            InputParameter::InstalledPricePerWatt => "Installed Cost ($/W)",
            InputParameter::MaintenanceCostPerKwh => "Maintenance Cost ($/kWh)",
            InputParameter::LifeYears => "Life (years)",
            InputParameter::ElectricCapacityUtilization => "Electric Capacity Utilization",
            InputParameter::ThermalCapacityUtilization => "Thermal Capacity Utilization",
            InputParameter::InflationRate => "Inflation Rate",
            InputParameter::DiscountRate => "Discount Rate",
            InputParameter::ElectricityRatePerKwh => "Electricity Rate ($/kWh)",
            InputParameter::NaturalGasRatePerKwh => "Natural Gas Rate ($/kWh)",
        }
    }

    /// Read the field from a set of inputs
    pub fn get(&self, inputs: &ValuationInputs) -> f64 {
        match self {
            InputParameter::ElectricEfficiency => inputs.electric_efficiency,
            InputParameter::ThermalEfficiency => inputs.thermal_efficiency,
            InputParameter::BaselineThermalEfficiency => inputs.baseline_thermal_efficiency,
            InputParameter::InstalledPricePerWatt => inputs.installed_price_per_watt,
            InputParameter::MaintenanceCostPerKwh => inputs.maintenance_cost_per_kwh,
            InputParameter::LifeYears => inputs.life_years as f64,
            InputParameter::ElectricCapacityUtilization => inputs.electric_capacity_utilization,
            InputParameter::ThermalCapacityUtilization => inputs.thermal_capacity_utilization,
            InputParameter::InflationRate => inputs.inflation_rate,
            InputParameter::DiscountRate => inputs.discount_rate,
            InputParameter::ElectricityRatePerKwh => inputs.electricity_rate_per_kwh,
            InputParameter::NaturalGasRatePerKwh => inputs.natural_gas_rate_per_kwh,
        }
    }

    /// Overwrite the field. Values must have passed [`InputParameter::check_value`].
    pub(crate) fn set(&self, inputs: &mut ValuationInputs, value: f64) {
        match self {
            InputParameter::ElectricEfficiency => inputs.electric_efficiency = value,
            InputParameter::ThermalEfficiency => inputs.thermal_efficiency = value,
            InputParameter::BaselineThermalEfficiency => inputs.baseline_thermal_efficiency = value,
            InputParameter::InstalledPricePerWatt => inputs.installed_price_per_watt = value,
            InputParameter::MaintenanceCostPerKwh => inputs.maintenance_cost_per_kwh = value,
            InputParameter::LifeYears => inputs.life_years = value as u32,
            InputParameter::ElectricCapacityUtilization => inputs.electric_capacity_utilization = value,
            InputParameter::ThermalCapacityUtilization => inputs.thermal_capacity_utilization = value,
            InputParameter::InflationRate => inputs.inflation_rate = value,
            InputParameter::DiscountRate => inputs.discount_rate = value,
            InputParameter::ElectricityRatePerKwh => inputs.electricity_rate_per_kwh = value,
            InputParameter::NaturalGasRatePerKwh => inputs.natural_gas_rate_per_kwh = value,
        }
    }

    /// Structural check for an override value
    ///
    /// Only the analysis horizon is structural: it sizes the cash-flow series
    /// and must be a whole number of years in 1..=[`MAX_LIFE_YEARS`]. Every
    /// other value is accepted and degenerate results show up as NaN metrics.
    pub fn check_value(&self, value: f64) -> Result<()> {
        if *self == InputParameter::LifeYears
            && !(value.is_finite() && value >= 1.0 && value.fract() == 0.0 && value <= MAX_LIFE_YEARS as f64)
        {
            return Err(ValuationError::InvalidValue {
                parameter: self.as_str().to_string(),
                value,
                reason: format!("life must be a whole number of years between 1 and {}", MAX_LIFE_YEARS),
            });
        }
        Ok(())
    }
}

impl FromStr for InputParameter {
    type Err = ValuationError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        InputParameter::ALL
            .iter()
            .copied()
            .find(|param| param.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| ValuationError::UnknownParameter(s.to_string()))
    }
}

impl fmt::Display for InputParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for param in InputParameter::ALL {
            assert_eq!(param.as_str().parse::<InputParameter>().unwrap(), param);
        }
        assert_eq!(
            "Installed_Price_Per_Watt".parse::<InputParameter>().unwrap(),
            InputParameter::InstalledPricePerWatt
        );
    }

    #[test]
    fn test_unknown_name_rejected() {
        let err = "installed_price_dollars".parse::<InputParameter>();
        assert!(matches!(err, Err(ValuationError::UnknownParameter(_))));
    }

    #[test]
    fn test_get_set_table() {
        let mut inputs = ValuationInputs::default();
        for (i, param) in InputParameter::ALL.iter().enumerate() {
            let value = (i + 1) as f64;
            param.set(&mut inputs, value);
            assert_eq!(param.get(&inputs), value, "{}", param);
        }
    }

    #[test]
    fn test_life_years_must_be_whole() {
        assert!(InputParameter::LifeYears.check_value(20.0).is_ok());
        assert!(InputParameter::LifeYears.check_value(0.0).is_err());
        assert!(InputParameter::LifeYears.check_value(12.5).is_err());
        assert!(InputParameter::LifeYears.check_value(f64::NAN).is_err());
        assert!(InputParameter::DiscountRate.check_value(-2.0).is_ok());
    }

    #[test]
    fn test_life_years_capped() {
        assert!(InputParameter::LifeYears.check_value(MAX_LIFE_YEARS as f64).is_ok());
        assert!(InputParameter::LifeYears.check_value(MAX_LIFE_YEARS as f64 + 1.0).is_err());
        assert!(InputParameter::LifeYears.check_value(3.0e9).is_err());

        let inputs = ValuationInputs::default();
        assert!(matches!(
            inputs.with_parameter(InputParameter::LifeYears, 3.0e9),
            Err(ValuationError::InvalidValue { .. })
        ));
    }
}
