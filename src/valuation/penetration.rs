//! Maximum market penetration as a function of payback period

use serde::{Deserialize, Serialize};

/// Saturation curve mapping payback period to the adoptable market share
///
/// MMP(PB) = A / (sigma * sqrt(2 pi)) * exp(-(PB / life / sigma)^2 / 2) for PB >= 0.
/// Any other payback, negative (a loss-making unit) or undefined, is never adopted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MarketPenetrationModel {
    pub amplitude: f64,
    pub sigma: f64,
}

impl MarketPenetrationModel {
    pub const AMPLITUDE: f64 = 0.3193;
    pub const SIGMA: f64 = 0.1274;

    /// Fraction of the market that adopts at the given payback period
    pub fn max_market_penetration(&self, payback_years: f64, life_years: u32) -> f64 {
        if !(payback_years >= 0.0) {
            return 0.0;
        }
        let z = payback_years / life_years as f64 / self.sigma;
        self.amplitude / (self.sigma * (2.0 * std::f64::consts::PI).sqrt()) * (-z * z / 2.0).exp()
    }
}

impl Default for MarketPenetrationModel {
    fn default() -> Self {
        Self {
            amplitude: Self::AMPLITUDE,
            sigma: Self::SIGMA,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_negative_payback_never_adopted() {
        let model = MarketPenetrationModel::default();
        for life in [1, 5, 20, 40] {
            assert_eq!(model.max_market_penetration(-0.5, life), 0.0);
            assert_eq!(model.max_market_penetration(-1.0e6, life), 0.0);
        }
    }

    #[test]
    fn test_peak_at_zero_payback() {
        let model = MarketPenetrationModel::default();
        let peak = model.max_market_penetration(0.0, 20);
        assert_relative_eq!(peak, 0.3193 / (0.1274 * (2.0 * std::f64::consts::PI).sqrt()), epsilon = 1e-12);
        assert!(peak <= 1.0);
    }

    #[test]
    fn test_decreasing_in_payback() {
        let model = MarketPenetrationModel::default();
        let mut last = model.max_market_penetration(0.0, 20);
        for pb in 1..30 {
            let mmp = model.max_market_penetration(pb as f64, 20);
            assert!(mmp < last && mmp >= 0.0);
            last = mmp;
        }
        assert_eq!(model.max_market_penetration(f64::INFINITY, 20), 0.0);
    }

    #[test]
    fn test_nan_payback_never_adopted() {
        let model = MarketPenetrationModel::default();
        assert_eq!(model.max_market_penetration(f64::NAN, 20), 0.0);
    }

    #[test]
    fn test_custom_curve() {
        let model = MarketPenetrationModel { amplitude: 0.2, sigma: 0.25 };
        let peak = 0.2 / (0.25 * (2.0 * std::f64::consts::PI).sqrt());
        assert_relative_eq!(model.max_market_penetration(0.0, 10), peak, epsilon = 1e-12);
        // One sigma out: PB / life = sigma
        assert_relative_eq!(
            model.max_market_penetration(2.5, 10),
            peak * (-0.5_f64).exp(),
            epsilon = 1e-12
        );
    }
}
