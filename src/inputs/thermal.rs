//! Thermal efficiency derivations
//!
//! Thermal efficiency is either a fixed fraction or derived from the electric
//! efficiency as a recovered share of the waste heat. The derivation is
//! resolved once, when the inputs are built.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValuationError};

/// Waste heat term accepted in formula strings
const WASTE_HEAT: &str = "(1-electric_efficiency)";

/// How the thermal efficiency of a unit is obtained
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ThermalEfficiency {
    /// A plain fraction
    Fixed(f64),
    /// `fraction * (1 - electric_efficiency)`
    WasteHeatRecovery { fraction: f64 },
}

impl ThermalEfficiency {
    /// Half of the waste heat is recovered, the usual CHP market study assumption
    pub fn half_waste_heat() -> Self {
        ThermalEfficiency::WasteHeatRecovery { fraction: 0.5 }
    }

    /// Resolve to a numeric thermal efficiency for the given electric efficiency
    pub fn resolve(&self, electric_efficiency: f64) -> f64 {
        match *self {
            ThermalEfficiency::Fixed(value) => value,
            ThermalEfficiency::WasteHeatRecovery { fraction } => fraction * (1.0 - electric_efficiency),
        }
    }

    /// Parse a formula string
    ///
    /// Accepted forms (whitespace is ignored):
    /// - a numeric literal, e.g. `0.25`
    /// - `1-electric_efficiency` or `(1-electric_efficiency)`
    /// - `(1-electric_efficiency)/k`
    /// - `k*(1-electric_efficiency)` or `(1-electric_efficiency)*k`
    pub fn parse_formula(formula: &str) -> Result<Self> {
        let compact: String = formula.chars().filter(|c| !c.is_whitespace()).collect();
        let malformed = |reason: &str| ValuationError::MalformedFormula {
            formula: formula.to_string(),
            reason: reason.to_string(),
        };

        if compact.is_empty() {
            return Err(malformed("empty expression"));
        }

        if let Ok(value) = compact.parse::<f64>() {
            if !value.is_finite() {
                return Err(malformed("literal must be finite"));
            }
            return Ok(ThermalEfficiency::Fixed(value));
        }

        if compact == WASTE_HEAT || compact == "1-electric_efficiency" {
            return Ok(ThermalEfficiency::WasteHeatRecovery { fraction: 1.0 });
        }

        if !balanced_parentheses(&compact) {
            return Err(malformed("unbalanced parentheses"));
        }

        // A bare number or a single parenthesized one
        let coefficient = |text: &str| -> Result<f64> {
            let inner = match text.strip_prefix('(') {
                Some(rest) => rest
                    .strip_suffix(')')
                    .ok_or_else(|| malformed("unbalanced parentheses"))?,
                None => text,
            };
            match inner.parse::<f64>() {
                Ok(value) if value.is_finite() => Ok(value),
                _ => Err(malformed("coefficient is not a finite number")),
            }
        };

        if let Some(rest) = compact.strip_prefix(WASTE_HEAT) {
            if let Some(divisor) = rest.strip_prefix('/') {
                let divisor = coefficient(divisor)?;
                if divisor == 0.0 {
                    return Err(malformed("division by zero"));
                }
                return Ok(ThermalEfficiency::WasteHeatRecovery { fraction: 1.0 / divisor });
            }
            if let Some(factor) = rest.strip_prefix('*') {
                return Ok(ThermalEfficiency::WasteHeatRecovery { fraction: coefficient(factor)? });
            }
        }

        if let Some(factor) = compact
            .strip_suffix(WASTE_HEAT)
            .and_then(|rest| rest.strip_suffix('*'))
        {
            return Ok(ThermalEfficiency::WasteHeatRecovery { fraction: coefficient(factor)? });
        }

        Err(malformed("unsupported expression"))
    }
}

fn balanced_parentheses(text: &str) -> bool {
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '(' => depth += 1,
            ')' => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}

impl Default for ThermalEfficiency {
    fn default() -> Self {
        ThermalEfficiency::Fixed(0.0)
    }
}

impl FromStr for ThermalEfficiency {
    type Err = ValuationError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_formula(s)
    }
}

impl fmt::Display for ThermalEfficiency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThermalEfficiency::Fixed(value) => write!(f, "{}", value),
            ThermalEfficiency::WasteHeatRecovery { fraction } => {
                write!(f, "{}*{}", fraction, WASTE_HEAT)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_literal() {
        let thermal = ThermalEfficiency::parse_formula(" 0.25 ").unwrap();
        assert_eq!(thermal, ThermalEfficiency::Fixed(0.25));
        assert_relative_eq!(thermal.resolve(0.7), 0.25);
    }

    #[test]
    fn test_parse_half_waste_heat() {
        let thermal = ThermalEfficiency::parse_formula("(1-electric_efficiency)/2").unwrap();
        assert_eq!(thermal, ThermalEfficiency::half_waste_heat());
        assert_relative_eq!(thermal.resolve(0.7), 0.15, epsilon = 1e-12);
    }

    #[test]
    fn test_parse_multiplied_forms() {
        let left = ThermalEfficiency::parse_formula("0.4 * (1 - electric_efficiency)").unwrap();
        let right = ThermalEfficiency::parse_formula("(1-electric_efficiency)*0.4").unwrap();
        assert_eq!(left, right);
        assert_relative_eq!(left.resolve(0.5), 0.2, epsilon = 1e-12);

        let whole = ThermalEfficiency::parse_formula("1-electric_efficiency").unwrap();
        assert_relative_eq!(whole.resolve(0.3), 0.7, epsilon = 1e-12);
    }

    #[test]
    fn test_parenthesized_coefficient() {
        let divided = ThermalEfficiency::parse_formula("(1-electric_efficiency)/(2)").unwrap();
        assert_eq!(divided, ThermalEfficiency::half_waste_heat());
        let scaled = ThermalEfficiency::parse_formula("(0.5)*(1-electric_efficiency)").unwrap();
        assert_eq!(scaled, ThermalEfficiency::half_waste_heat());
    }

    #[test]
    fn test_malformed_formulas() {
        for formula in [
            "",
            "(1-electric_efficiency)/0",
            "__import__('os')",
            "(1-thermal_efficiency)/2",
            "(1-electric_efficiency)/two",
            "inf",
            "(1-electric_efficiency)+2",
            "(1-electric_efficiency)/(2",
            "(1-electric_efficiency)/)2(",
            "((0.5*(1-electric_efficiency)",
            "((0.5))*(1-electric_efficiency)",
            "(1-electric_efficiency))/2",
        ] {
            let err = ThermalEfficiency::parse_formula(formula);
            assert!(
                matches!(err, Err(ValuationError::MalformedFormula { .. })),
                "expected failure for {:?}",
                formula
            );
        }
    }
}
