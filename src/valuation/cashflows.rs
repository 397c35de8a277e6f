//! Year-indexed cash-flow series per kWh of generation

use serde::{Deserialize, Serialize};

use super::discount::DiscountCurve;
use super::irr::calculate_irr;

/// A single year of the cash-flow projection
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CashFlowRow {
    pub year: u32,
    pub cash_flow_per_kwh: f64,
}

/// Cash flows for years 0..=life_years
///
/// Year 0 holds the capital outlay, later years the inflated operating flows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowSeries {
    flows: Vec<f64>,
}

impl CashFlowSeries {
    pub fn new(flows: Vec<f64>) -> Self {
        Self { flows }
    }

    pub fn flows(&self) -> &[f64] {
        &self.flows
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    /// Up-front capital outlay (negative)
    pub fn year_zero(&self) -> f64 {
        self.flows.first().copied().unwrap_or(f64::NAN)
    }

    /// First operating year cash flow
    pub fn first_operating_year(&self) -> f64 {
        self.flows.get(1).copied().unwrap_or(f64::NAN)
    }

    pub fn rows(&self) -> impl Iterator<Item = CashFlowRow> + '_ {
        self.flows.iter().enumerate().map(|(year, &cash_flow_per_kwh)| CashFlowRow {
            year: year as u32,
            cash_flow_per_kwh,
        })
    }

    pub fn net_present_value(&self, discount: &DiscountCurve) -> f64 {
        discount.present_value(&self.flows)
    }

    pub fn internal_rate_of_return(&self) -> Option<f64> {
        calculate_irr(&self.flows)
    }

    /// First-year simple payback, -CF[0] / CF[1]
    ///
    /// Not clamped: a loss in year one gives a negative payback, a zero
    /// margin an infinite one.
    pub fn simple_payback_years(&self) -> f64 {
        -self.year_zero() / self.first_operating_year()
    }
}
