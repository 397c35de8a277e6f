//! Sweep axes for two-parameter sensitivity studies

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogParameter, Technology};
use crate::error::{Result, ValuationError};
use crate::inputs::InputParameter;

/// One varied parameter and the ordered values it takes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub parameter: InputParameter,
    pub values: Vec<f64>,
}

impl Axis {
    pub fn new(parameter: InputParameter, values: Vec<f64>) -> Self {
        Self { parameter, values }
    }

    /// Evenly spaced values from `start` to `stop` inclusive
    pub fn linspace(parameter: InputParameter, start: f64, stop: f64, steps: usize) -> Self {
        let values = match steps {
            0 => Vec::new(),
            1 => vec![start],
            n => {
                let step = (stop - start) / (n - 1) as f64;
                (0..n).map(|i| start + step * i as f64).collect()
            }
        };
        Self { parameter, values }
    }

    /// Values of a catalog series for a technology
    pub fn from_catalog(technology: Technology, series: CatalogParameter) -> Result<Self> {
        let parameter = series.input_parameter().ok_or_else(|| {
            ValuationError::InvalidSweep(format!(
                "catalog series {} does not map to an input parameter",
                series.as_str()
            ))
        })?;
        Ok(Self {
            parameter,
            values: technology.series(series).to_vec(),
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn validate(&self) -> Result<()> {
        if self.values.is_empty() {
            return Err(ValuationError::InvalidSweep(format!(
                "no values given for {}",
                self.parameter
            )));
        }
        for &value in &self.values {
            if !value.is_finite() {
                return Err(ValuationError::InvalidSweep(format!(
                    "non-finite value {} for {}",
                    value, self.parameter
                )));
            }
            self.parameter.check_value(value)?;
        }
        Ok(())
    }
}

/// The x and y axes of a sensitivity grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sweep {
    pub x: Axis,
    pub y: Axis,
}

impl Sweep {
    pub fn new(x: Axis, y: Axis) -> Self {
        Self { x, y }
    }

    /// Resolve parameter names, failing on unknown names
    pub fn by_name(x_parameter: &str, x_values: Vec<f64>, y_parameter: &str, y_values: Vec<f64>) -> Result<Self> {
        Ok(Self {
            x: Axis::new(x_parameter.parse()?, x_values),
            y: Axis::new(y_parameter.parse()?, y_values),
        })
    }

    /// Grid shape as (rows, columns) = (y values, x values)
    pub fn shape(&self) -> (usize, usize) {
        (self.y.len(), self.x.len())
    }

    /// Structural checks done before any cell is evaluated
    pub fn validate(&self) -> Result<()> {
        if self.x.parameter == self.y.parameter {
            return Err(ValuationError::InvalidSweep(format!(
                "x and y both vary {}",
                self.x.parameter
            )));
        }
        self.x.validate()?;
        self.y.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linspace() {
        let axis = Axis::linspace(InputParameter::InstalledPricePerWatt, 1.0, 3.0, 5);
        assert_eq!(axis.len(), 5);
        assert_relative_eq!(axis.values[1], 1.5);
        assert_relative_eq!(axis.values[4], 3.0);
        assert_eq!(Axis::linspace(InputParameter::DiscountRate, 0.1, 0.2, 1).values, vec![0.1]);
    }

    #[test]
    fn test_sweep_by_name() {
        let sweep = Sweep::by_name("installed_price_per_watt", vec![1.0, 2.0], "electric_efficiency", vec![0.3]).unwrap();
        assert_eq!(sweep.shape(), (1, 2));
        assert!(sweep.validate().is_ok());

        let err = Sweep::by_name("installed_price", vec![1.0], "electric_efficiency", vec![0.3]);
        assert!(matches!(err, Err(ValuationError::UnknownParameter(_))));
    }

    #[test]
    fn test_invalid_sweeps() {
        let same = Sweep::new(
            Axis::new(InputParameter::DiscountRate, vec![0.1]),
            Axis::new(InputParameter::DiscountRate, vec![0.2]),
        );
        assert!(same.validate().is_err());

        let empty = Sweep::new(
            Axis::new(InputParameter::DiscountRate, vec![]),
            Axis::new(InputParameter::InflationRate, vec![0.02]),
        );
        assert!(empty.validate().is_err());

        let fractional_life = Sweep::new(
            Axis::new(InputParameter::LifeYears, vec![10.0, 12.5]),
            Axis::new(InputParameter::InflationRate, vec![0.02]),
        );
        assert!(matches!(fractional_life.validate(), Err(ValuationError::InvalidValue { .. })));

        let nan_value = Sweep::new(
            Axis::new(InputParameter::DiscountRate, vec![f64::NAN]),
            Axis::new(InputParameter::InflationRate, vec![0.02]),
        );
        assert!(nan_value.validate().is_err());
    }

    #[test]
    fn test_from_catalog() {
        let axis = Axis::from_catalog(Technology::Microturbine, CatalogParameter::InstalledPricePerWatt).unwrap();
        assert_eq!(axis.parameter, InputParameter::InstalledPricePerWatt);
        assert_eq!(axis.len(), 6);
        assert!(Axis::from_catalog(Technology::FuelCell, CatalogParameter::PowerKw).is_err());
    }
}
