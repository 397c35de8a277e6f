//! Annual discounting for present value calculations

use serde::{Deserialize, Serialize};

/// Single annual discount rate applied to year-indexed cash flows
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DiscountCurve {
    /// Annual discount rate as a decimal, must exceed -1
    pub annual_rate: f64,
}

impl DiscountCurve {
    pub fn single_rate(annual_rate: f64) -> Self {
        Self { annual_rate }
    }

    /// Discount factor to a year, `1 / (1 + r)^year`
    pub fn discount_to_year(&self, year: u32) -> f64 {
        1.0 / (1.0 + self.annual_rate).powi(year as i32)
    }

    /// Sum of discount factors over years 1..=years
    ///
    /// For a level operating cash flow C after an outlay C0,
    /// NPV = C0 + C * annuity_factor.
    pub fn annuity_factor(&self, years: u32) -> f64 {
        (1..=years).map(|year| self.discount_to_year(year)).sum()
    }

    /// Present value of flows indexed by year, year 0 undiscounted
    pub fn present_value(&self, flows: &[f64]) -> f64 {
        flows
            .iter()
            .enumerate()
            .map(|(year, amount)| amount * self.discount_to_year(year as u32))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_discount_factors() {
        let curve = DiscountCurve::single_rate(0.10);
        assert_relative_eq!(curve.discount_to_year(0), 1.0);
        assert_relative_eq!(curve.discount_to_year(2), 1.0 / 1.21, epsilon = 1e-12);
    }

    #[test]
    fn test_annuity_factor_closed_form() {
        let rate: f64 = 0.15;
        let curve = DiscountCurve::single_rate(rate);
        let closed_form = (1.0 - (1.0 + rate).powi(-20)) / rate;
        assert_relative_eq!(curve.annuity_factor(20), closed_form, epsilon = 1e-12);
    }

    #[test]
    fn test_present_value_year_zero_undiscounted() {
        let curve = DiscountCurve::single_rate(0.05);
        let pv = curve.present_value(&[-100.0, 105.0]);
        assert_relative_eq!(pv, 0.0, epsilon = 1e-10);
    }
}
