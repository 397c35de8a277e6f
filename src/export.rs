//! CSV and JSON export of study results
//!
//! Metric grids are written as a matrix: the header row holds the x values,
//! the first column the y values. Undefined cells are written as `NaN` in CSV
//! and `null` in JSON.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::inputs::InputParameter;
use crate::regional::StudyLocation;
use crate::study::{MetricGrid, SensitivityGrid, Sweep};
use crate::valuation::{CashFlowSeries, Metric};

/// Writes a metric grid as CSV to any writer
pub fn write_metric_grid_csv(grid: &MetricGrid, sweep: &Sweep, writer: impl Write) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    let corner = format!("{}\\{}", sweep.y.parameter.as_str(), sweep.x.parameter.as_str());
    let mut header = vec![corner];
    header.extend(sweep.x.values.iter().map(|x| x.to_string()));
    wtr.write_record(&header)?;

    for (y, row) in sweep.y.values.iter().zip(grid.rows()) {
        let mut record = Vec::with_capacity(row.len() + 1);
        record.push(y.to_string());
        record.extend(row.iter().map(|v| v.to_string()));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports a metric grid to a CSV file at the given path
pub fn export_metric_grid_csv(grid: &MetricGrid, sweep: &Sweep, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    write_metric_grid_csv(grid, sweep, io::BufWriter::new(file))
}

/// Writes a cash-flow series as `year,cash_flow_per_kwh` rows
pub fn write_cash_flows_csv(series: &CashFlowSeries, writer: impl Write) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    for row in series.rows() {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn export_cash_flows_csv(series: &CashFlowSeries, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    write_cash_flows_csv(series, io::BufWriter::new(file))
}

/// Axis description for reports
#[derive(Debug, Clone, Serialize)]
pub struct AxisReport {
    pub parameter: InputParameter,
    pub label: &'static str,
    pub values: Vec<f64>,
}

/// Every metric of a sensitivity grid, keyed by short metric name
#[derive(Debug, Clone, Serialize)]
pub struct GridReport {
    pub location: StudyLocation,
    pub net_generation_twh: f64,
    pub x_axis: AxisReport,
    pub y_axis: AxisReport,
    pub metrics: BTreeMap<&'static str, MetricGrid>,
}

impl GridReport {
    pub fn from_grid(grid: &SensitivityGrid) -> Self {
        let axis = |parameter: InputParameter, values: &[f64]| AxisReport {
            parameter,
            label: parameter.label(),
            values: values.to_vec(),
        };
        let sweep = grid.sweep();
        Self {
            location: grid.location().clone(),
            net_generation_twh: grid.net_generation_twh(),
            x_axis: axis(sweep.x.parameter, &sweep.x.values),
            y_axis: axis(sweep.y.parameter, &sweep.y.values),
            metrics: Metric::ALL
                .iter()
                .map(|&metric| (metric.short_name(), grid.metric(metric)))
                .collect(),
        }
    }
}

/// Writes any report as pretty JSON
pub fn write_json<T: Serialize + ?Sized>(value: &T, mut writer: impl Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

pub fn export_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    write_json(value, io::BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs::ValuationInputs;
    use crate::regional::{RegionYearData, Sector};
    use crate::study::Axis;
    use crate::valuation::CashFlowEngine;

    fn sweep() -> Sweep {
        Sweep::new(
            Axis::new(InputParameter::InstalledPricePerWatt, vec![1.0, 2.0]),
            Axis::new(InputParameter::ElectricEfficiency, vec![0.3, 0.5, 0.7]),
        )
    }

    fn grid() -> SensitivityGrid {
        let data = RegionYearData {
            electricity_rate_per_kwh: 0.12,
            natural_gas_rate_per_kwh: 0.03,
            net_generation_kwh: 1.0e10,
        };
        SensitivityGrid::build(
            &ValuationInputs::default(),
            &sweep(),
            &StudyLocation::new("CT", Sector::Commercial, 2015),
            &data,
        )
        .unwrap()
    }

    #[test]
    fn test_metric_grid_csv_layout() {
        let grid = MetricGrid::from_rows(vec![vec![1.0, 2.0], vec![3.0, f64::NAN], vec![5.0, 6.5]]).unwrap();
        let mut buf = Vec::new();
        write_metric_grid_csv(&grid, &sweep(), &mut buf).unwrap();

        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "electric_efficiency\\installed_price_per_watt,1,2");
        assert_eq!(lines[1], "0.3,1,2");
        assert_eq!(lines[2], "0.5,3,NaN");
        assert_eq!(lines[3], "0.7,5,6.5");
    }

    #[test]
    fn test_cash_flows_csv() {
        let inputs = ValuationInputs::default().with_rates(&RegionYearData {
            electricity_rate_per_kwh: 0.12,
            natural_gas_rate_per_kwh: 0.03,
            net_generation_kwh: 1.0e10,
        });
        let series = CashFlowEngine::cash_flows(&inputs);
        let mut buf = Vec::new();
        write_cash_flows_csv(&series, &mut buf).unwrap();

        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "year,cash_flow_per_kwh");
        assert_eq!(lines.len(), series.len() + 1);
        assert!(lines[1].starts_with("0,-"));
    }

    #[test]
    fn test_grid_report_json() {
        let report = GridReport::from_grid(&grid());
        assert_eq!(report.metrics.len(), Metric::ALL.len());

        let mut buf = Vec::new();
        write_json(&report, &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["location"]["region"], "CT");
        assert_eq!(value["x_axis"]["parameter"], "installed_price_per_watt");
        assert_eq!(value["metrics"]["payback"].as_array().unwrap().len(), 3);
        assert_eq!(value["metrics"]["npv"][0].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_undefined_values_become_null() {
        let grid = MetricGrid::filled(1, 2, f64::NAN);
        let mut buf = Vec::new();
        write_json(&grid, &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert!(value[0][0].is_null());
    }
}
