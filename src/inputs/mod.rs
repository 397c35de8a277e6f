//! Valuation inputs for a single distributed generation scenario

mod parameter;
mod thermal;

pub use parameter::{InputParameter, MAX_LIFE_YEARS};
pub use thermal::ThermalEfficiency;

use serde::Serialize;

use crate::error::{Result, ValuationError};
use crate::regional::RegionYearData;
use crate::valuation::{CashFlowEngine, ValuationOutputs};

/// Immutable parameter set describing one DG scenario
///
/// Rates are in $/kWh, prices in $/W. The energy rates stay NaN until the
/// inputs are bound to a region and year with [`ValuationInputs::with_rates`].
/// Modifications always produce a new value, so outputs computed from an
/// instance always reflect its current inputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValuationInputs {
    pub(crate) electric_efficiency: f64,
    pub(crate) thermal_efficiency: f64,
    pub(crate) baseline_thermal_efficiency: f64,
    pub(crate) installed_price_per_watt: f64,
    pub(crate) maintenance_cost_per_kwh: f64,
    pub(crate) life_years: u32,
    pub(crate) electric_capacity_utilization: f64,
    pub(crate) thermal_capacity_utilization: f64,
    pub(crate) inflation_rate: f64,
    pub(crate) discount_rate: f64,
    pub(crate) electricity_rate_per_kwh: f64,
    pub(crate) natural_gas_rate_per_kwh: f64,
}

impl ValuationInputs {
    pub fn builder() -> ValuationInputsBuilder {
        ValuationInputsBuilder::default()
    }

    pub fn electric_efficiency(&self) -> f64 {
        self.electric_efficiency
    }

    pub fn thermal_efficiency(&self) -> f64 {
        self.thermal_efficiency
    }

    pub fn baseline_thermal_efficiency(&self) -> f64 {
        self.baseline_thermal_efficiency
    }

    pub fn installed_price_per_watt(&self) -> f64 {
        self.installed_price_per_watt
    }

    pub fn maintenance_cost_per_kwh(&self) -> f64 {
        self.maintenance_cost_per_kwh
    }

    pub fn life_years(&self) -> u32 {
        self.life_years
    }

    pub fn electric_capacity_utilization(&self) -> f64 {
        self.electric_capacity_utilization
    }

    pub fn thermal_capacity_utilization(&self) -> f64 {
        self.thermal_capacity_utilization
    }

    pub fn inflation_rate(&self) -> f64 {
        self.inflation_rate
    }

    pub fn discount_rate(&self) -> f64 {
        self.discount_rate
    }

    pub fn electricity_rate_per_kwh(&self) -> f64 {
        self.electricity_rate_per_kwh
    }

    pub fn natural_gas_rate_per_kwh(&self) -> f64 {
        self.natural_gas_rate_per_kwh
    }

    /// Copy with the energy rates of a region and year (the "spark spread")
    pub fn with_rates(&self, data: &RegionYearData) -> Self {
        Self {
            electricity_rate_per_kwh: data.electricity_rate_per_kwh,
            natural_gas_rate_per_kwh: data.natural_gas_rate_per_kwh,
            ..self.clone()
        }
    }

    /// Copy with one parameter overridden
    pub fn with_parameter(&self, parameter: InputParameter, value: f64) -> Result<Self> {
        parameter.check_value(value)?;
        let mut inputs = self.clone();
        parameter.set(&mut inputs, value);
        Ok(inputs)
    }

    /// Evaluate the value proposition. Never cached.
    pub fn outputs(&self) -> ValuationOutputs {
        CashFlowEngine::default().evaluate(self)
    }
}

impl Default for ValuationInputs {
    fn default() -> Self {
        let builder = ValuationInputsBuilder::default();
        Self {
            electric_efficiency: builder.electric_efficiency,
            thermal_efficiency: builder.thermal_efficiency.resolve(builder.electric_efficiency),
            baseline_thermal_efficiency: builder.baseline_thermal_efficiency,
            installed_price_per_watt: builder.installed_price_per_watt,
            maintenance_cost_per_kwh: builder.maintenance_cost_per_kwh,
            life_years: builder.life_years,
            electric_capacity_utilization: builder.electric_capacity_utilization,
            thermal_capacity_utilization: builder.thermal_capacity_utilization,
            inflation_rate: builder.inflation_rate,
            discount_rate: builder.discount_rate,
            electricity_rate_per_kwh: builder.electricity_rate_per_kwh,
            natural_gas_rate_per_kwh: builder.natural_gas_rate_per_kwh,
        }
    }
}

/// Builder for [`ValuationInputs`]
///
/// Defaults are the nominal sensitivity study scenario.
#[derive(Debug, Clone)]
pub struct ValuationInputsBuilder {
    electric_efficiency: f64,
    thermal_efficiency: ThermalEfficiency,
    baseline_thermal_efficiency: f64,
    installed_price_per_watt: f64,
    maintenance_cost_per_kwh: f64,
    life_years: u32,
    electric_capacity_utilization: f64,
    thermal_capacity_utilization: f64,
    inflation_rate: f64,
    discount_rate: f64,
    electricity_rate_per_kwh: f64,
    natural_gas_rate_per_kwh: f64,
}

impl Default for ValuationInputsBuilder {
    fn default() -> Self {
        Self {
            electric_efficiency: 0.7,
            thermal_efficiency: ThermalEfficiency::Fixed(0.0),
            baseline_thermal_efficiency: 0.9,
            installed_price_per_watt: 1.8,
            maintenance_cost_per_kwh: 0.02,
            life_years: 20,
            electric_capacity_utilization: 0.85,
            thermal_capacity_utilization: 0.25,
            inflation_rate: 0.02,
            discount_rate: 0.15,
            electricity_rate_per_kwh: f64::NAN,
            natural_gas_rate_per_kwh: f64::NAN,
        }
    }
}

impl ValuationInputsBuilder {
    pub fn electric_efficiency(mut self, value: f64) -> Self {
        self.electric_efficiency = value;
        self
    }

    pub fn thermal_efficiency(mut self, value: ThermalEfficiency) -> Self {
        self.thermal_efficiency = value;
        self
    }

    /// Thermal efficiency from a formula string, e.g. `"(1-electric_efficiency)/2"`
    pub fn thermal_efficiency_formula(mut self, formula: &str) -> Result<Self> {
        self.thermal_efficiency = ThermalEfficiency::parse_formula(formula)?;
        Ok(self)
    }

    pub fn baseline_thermal_efficiency(mut self, value: f64) -> Self {
        self.baseline_thermal_efficiency = value;
        self
    }

    pub fn installed_price_per_watt(mut self, value: f64) -> Self {
        self.installed_price_per_watt = value;
        self
    }

    pub fn maintenance_cost_per_kwh(mut self, value: f64) -> Self {
        self.maintenance_cost_per_kwh = value;
        self
    }

    pub fn life_years(mut self, value: u32) -> Self {
        self.life_years = value;
        self
    }

    pub fn electric_capacity_utilization(mut self, value: f64) -> Self {
        self.electric_capacity_utilization = value;
        self
    }

    pub fn thermal_capacity_utilization(mut self, value: f64) -> Self {
        self.thermal_capacity_utilization = value;
        self
    }

    pub fn inflation_rate(mut self, value: f64) -> Self {
        self.inflation_rate = value;
        self
    }

    pub fn discount_rate(mut self, value: f64) -> Self {
        self.discount_rate = value;
        self
    }

    pub fn electricity_rate_per_kwh(mut self, value: f64) -> Self {
        self.electricity_rate_per_kwh = value;
        self
    }

    pub fn natural_gas_rate_per_kwh(mut self, value: f64) -> Self {
        self.natural_gas_rate_per_kwh = value;
        self
    }

    /// Resolve the thermal efficiency and validate the parameter ranges
    pub fn build(self) -> Result<ValuationInputs> {
        let thermal_efficiency = self.thermal_efficiency.resolve(self.electric_efficiency);

        check_range(InputParameter::ElectricEfficiency, self.electric_efficiency, false)?;
        check_range(InputParameter::ThermalEfficiency, thermal_efficiency, true)?;
        check_range(InputParameter::BaselineThermalEfficiency, self.baseline_thermal_efficiency, false)?;
        check_range(InputParameter::ElectricCapacityUtilization, self.electric_capacity_utilization, false)?;
        check_range(InputParameter::ThermalCapacityUtilization, self.thermal_capacity_utilization, false)?;
        check_non_negative(InputParameter::InstalledPricePerWatt, self.installed_price_per_watt)?;
        check_non_negative(InputParameter::MaintenanceCostPerKwh, self.maintenance_cost_per_kwh)?;
        InputParameter::LifeYears.check_value(self.life_years as f64)?;

        if !self.inflation_rate.is_finite() {
            return Err(invalid(InputParameter::InflationRate, self.inflation_rate, "must be finite"));
        }
        if !(self.discount_rate.is_finite() && self.discount_rate > -1.0) {
            return Err(invalid(InputParameter::DiscountRate, self.discount_rate, "must be greater than -1"));
        }

        Ok(ValuationInputs {
            electric_efficiency: self.electric_efficiency,
            thermal_efficiency,
            baseline_thermal_efficiency: self.baseline_thermal_efficiency,
            installed_price_per_watt: self.installed_price_per_watt,
            maintenance_cost_per_kwh: self.maintenance_cost_per_kwh,
            life_years: self.life_years,
            electric_capacity_utilization: self.electric_capacity_utilization,
            thermal_capacity_utilization: self.thermal_capacity_utilization,
            inflation_rate: self.inflation_rate,
            discount_rate: self.discount_rate,
            electricity_rate_per_kwh: self.electricity_rate_per_kwh,
            natural_gas_rate_per_kwh: self.natural_gas_rate_per_kwh,
        })
    }
}

fn invalid(parameter: InputParameter, value: f64, reason: &str) -> ValuationError {
    ValuationError::InvalidValue {
        parameter: parameter.as_str().to_string(),
        value,
        reason: reason.to_string(),
    }
}

/// Fractions live in (0, 1], or [0, 1] when zero is allowed
fn check_range(parameter: InputParameter, value: f64, allow_zero: bool) -> Result<()> {
    let lower_ok = if allow_zero { value >= 0.0 } else { value > 0.0 };
    if lower_ok && value <= 1.0 {
        Ok(())
    } else {
        Err(invalid(parameter, value, "fraction out of range"))
    }
}

fn check_non_negative(parameter: InputParameter, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(parameter, value, "must be non-negative"))
    }
}
