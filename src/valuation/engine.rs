//! Cash-flow engine: projection and value proposition metrics for one scenario

use crate::inputs::ValuationInputs;
use super::cashflows::CashFlowSeries;
use super::discount::DiscountCurve;
use super::outputs::ValuationOutputs;
use super::penetration::MarketPenetrationModel;

/// Hours in a (non-leap) year
pub const HOURS_PER_YEAR: f64 = 8760.0;

/// Watts per kilowatt
const WATTS_PER_KW: f64 = 1000.0;

/// Value proposition engine
///
/// Stateless apart from the penetration model; every call recomputes from the
/// inputs it is given. Numeric degeneracies propagate as NaN (or `None` for
/// the IRR) instead of failing, so a sweep can always complete.
#[derive(Debug, Clone, Default)]
pub struct CashFlowEngine {
    penetration: MarketPenetrationModel,
}

impl CashFlowEngine {
    pub fn new(penetration: MarketPenetrationModel) -> Self {
        Self { penetration }
    }

    /// Evaluate every metric for a scenario
    pub fn evaluate(&self, inputs: &ValuationInputs) -> ValuationOutputs {
        let cash_flows = Self::cash_flows(inputs);
        let discount = DiscountCurve::single_rate(inputs.discount_rate);
        let payback_years = cash_flows.simple_payback_years();

        ValuationOutputs {
            net_present_value_per_kwh: cash_flows.net_present_value(&discount),
            internal_rate_of_return: cash_flows.internal_rate_of_return(),
            payback_years,
            levelized_cost_per_kwh: Self::levelized_cost(inputs, &discount),
            max_market_penetration: self
                .penetration
                .max_market_penetration(payback_years, inputs.life_years),
            effective_electric_efficiency: Self::effective_electric_efficiency(inputs),
        }
    }

    /// Project the cash-flow series, years 0..=life_years
    pub fn cash_flows(inputs: &ValuationInputs) -> CashFlowSeries {
        let mut flows = Vec::with_capacity(inputs.life_years as usize + 1);

        // Capital outlay per kWh generated in a year of operation
        flows.push(-Self::capital_cost_per_kwh(inputs) / inputs.electric_capacity_utilization);

        let margin = Self::operating_margin_per_kwh(inputs);
        for year in 1..=inputs.life_years {
            flows.push(margin * (1.0 + inputs.inflation_rate).powi(year as i32));
        }

        CashFlowSeries::new(flows)
    }

    /// Installed price spread over one year of full-capacity output ($/kWh)
    pub fn capital_cost_per_kwh(inputs: &ValuationInputs) -> f64 {
        inputs.installed_price_per_watt * WATTS_PER_KW / HOURS_PER_YEAR
    }

    /// Fuel displaced as heat, credited against the fuel bill ($/kWh electric)
    pub fn thermal_credit_per_kwh(inputs: &ValuationInputs) -> f64 {
        inputs.natural_gas_rate_per_kwh * inputs.thermal_efficiency
            / inputs.electric_efficiency
            / inputs.baseline_thermal_efficiency
            * inputs.thermal_capacity_utilization
    }

    /// Fuel cost per kWh electric
    pub fn fuel_cost_per_kwh(inputs: &ValuationInputs) -> f64 {
        inputs.natural_gas_rate_per_kwh / inputs.electric_efficiency
    }

    /// First-year operating margin before inflation ($/kWh)
    pub fn operating_margin_per_kwh(inputs: &ValuationInputs) -> f64 {
        inputs.electricity_rate_per_kwh - Self::fuel_cost_per_kwh(inputs)
            - inputs.maintenance_cost_per_kwh
            + Self::thermal_credit_per_kwh(inputs)
    }

    /// Levelized cost of electricity ($/kWh), closed form
    pub fn levelized_cost(inputs: &ValuationInputs, discount: &DiscountCurve) -> f64 {
        let annuity = discount.annuity_factor(inputs.life_years);
        Self::capital_cost_per_kwh(inputs) / (inputs.electric_capacity_utilization * annuity)
            + Self::fuel_cost_per_kwh(inputs)
            + inputs.maintenance_cost_per_kwh
            - Self::thermal_credit_per_kwh(inputs)
    }

    /// Electric efficiency with the recovered heat credited against fuel input
    ///
    /// Can exceed 1, or be infinite/negative when the heat credit reaches the
    /// fuel input. The raw value is kept.
    pub fn effective_electric_efficiency(inputs: &ValuationInputs) -> f64 {
        inputs.electric_efficiency
            / (1.0
                - inputs.thermal_efficiency / inputs.baseline_thermal_efficiency
                    * inputs.thermal_capacity_utilization
                    / inputs.electric_capacity_utilization)
    }
}
