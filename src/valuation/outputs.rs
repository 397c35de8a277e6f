//! Value proposition metrics

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValuationError};

/// Value proposition metrics for one scenario
///
/// Undefined results are NaN, except the IRR which is explicitly optional.
/// Use [`ValuationOutputs::value`] for an `Option` view of any metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuationOutputs {
    pub net_present_value_per_kwh: f64,
    pub internal_rate_of_return: Option<f64>,
    pub payback_years: f64,
    pub levelized_cost_per_kwh: f64,
    pub max_market_penetration: f64,
    pub effective_electric_efficiency: f64,
}

impl ValuationOutputs {
    /// Raw metric value, NaN when undefined
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::NetPresentValue => self.net_present_value_per_kwh,
            Metric::InternalRateOfReturn => self.internal_rate_of_return.unwrap_or(f64::NAN),
            Metric::PaybackYears => self.payback_years,
            Metric::LevelizedCost => self.levelized_cost_per_kwh,
            Metric::MaxMarketPenetration => self.max_market_penetration,
            Metric::EffectiveElectricEfficiency => self.effective_electric_efficiency,
        }
    }

    /// Metric value, `None` when undefined
    pub fn value(&self, metric: Metric) -> Option<f64> {
        let value = self.get(metric);
        if value.is_nan() {
            None
        } else {
            Some(value)
        }
    }
}

/// Identifier of a [`ValuationOutputs`] metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    NetPresentValue,
    InternalRateOfReturn,
    PaybackYears,
    LevelizedCost,
    MaxMarketPenetration,
    EffectiveElectricEfficiency,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::NetPresentValue,
        Metric::InternalRateOfReturn,
        Metric::PaybackYears,
        Metric::LevelizedCost,
        Metric::MaxMarketPenetration,
        Metric::EffectiveElectricEfficiency,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::NetPresentValue => "net_present_value",
            Metric::InternalRateOfReturn => "internal_rate_of_return",
            Metric::PaybackYears => "payback_years",
            Metric::LevelizedCost => "levelized_cost",
            Metric::MaxMarketPenetration => "max_market_penetration",
            Metric::EffectiveElectricEfficiency => "effective_electric_efficiency",
        }
    }

    /// Short alias accepted on the command line
    pub fn short_name(&self) -> &'static str {
        match self {
            Metric::NetPresentValue => "npv",
            Metric::InternalRateOfReturn => "irr",
            Metric::PaybackYears => "payback",
            Metric::LevelizedCost => "lcoe",
            Metric::MaxMarketPenetration => "mmp",
            Metric::EffectiveElectricEfficiency => "efficiency",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::NetPresentValue => "NPV ($/kWh)",
            Metric::InternalRateOfReturn => "IRR",
            Metric::PaybackYears => "Payback Period (years)",
            Metric::LevelizedCost => "LCOE ($/kWh)",
            Metric::MaxMarketPenetration => "Maximum Market Penetration",
            Metric::EffectiveElectricEfficiency => "Effective Electric Efficiency",
        }
    }
}

impl FromStr for Metric {
    type Err = ValuationError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        Metric::ALL
            .iter()
            .copied()
            .find(|m| m.as_str().eq_ignore_ascii_case(name) || m.short_name().eq_ignore_ascii_case(name))
            .ok_or_else(|| ValuationError::UnknownMetric(s.to_string()))
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ValuationOutputs {
        ValuationOutputs {
            net_present_value_per_kwh: -0.08,
            internal_rate_of_return: None,
            payback_years: 10.4,
            levelized_cost_per_kwh: f64::NAN,
            max_market_penetration: 0.0003,
            effective_electric_efficiency: 0.7,
        }
    }

    #[test]
    fn test_metric_names() {
        assert_eq!("npv".parse::<Metric>().unwrap(), Metric::NetPresentValue);
        assert_eq!("Payback_Years".parse::<Metric>().unwrap(), Metric::PaybackYears);
        assert!(matches!("roi".parse::<Metric>(), Err(ValuationError::UnknownMetric(_))));
    }

    #[test]
    fn test_undefined_metrics_are_none() {
        let outputs = sample();
        assert!(outputs.get(Metric::InternalRateOfReturn).is_nan());
        assert_eq!(outputs.value(Metric::InternalRateOfReturn), None);
        assert_eq!(outputs.value(Metric::LevelizedCost), None);
        assert_eq!(outputs.value(Metric::PaybackYears), Some(10.4));
    }

    #[test]
    fn test_nan_serializes_as_null() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json["levelized_cost_per_kwh"].is_null());
        assert!(json["internal_rate_of_return"].is_null());
    }
}
