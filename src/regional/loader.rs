//! Load regional data from CSV
//!
//! Expected columns: region, sector, year, electricity_rate_per_kwh,
//! natural_gas_rate_per_kwh, net_generation_kwh. Empty cells are missing data.

use std::path::Path;

use csv::Reader;

use super::{RegionYearData, RegionalDataSet, StudyLocation};
use crate::error::Result;

/// Raw CSV row
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    region: String,
    sector: String,
    year: i32,
    electricity_rate_per_kwh: Option<f64>,
    natural_gas_rate_per_kwh: Option<f64>,
    net_generation_kwh: Option<f64>,
}

impl CsvRow {
    fn into_entry(self) -> Result<(StudyLocation, RegionYearData)> {
        let sector = self.sector.parse()?;
        let data = RegionYearData {
            electricity_rate_per_kwh: self.electricity_rate_per_kwh.unwrap_or(f64::NAN),
            natural_gas_rate_per_kwh: self.natural_gas_rate_per_kwh.unwrap_or(f64::NAN),
            net_generation_kwh: self.net_generation_kwh.unwrap_or(f64::NAN),
        };
        Ok((StudyLocation::new(&self.region, sector, self.year), data))
    }
}

/// Load regional data from a CSV file
pub fn load_regional_data<P: AsRef<Path>>(path: P) -> Result<RegionalDataSet> {
    let reader = Reader::from_path(path.as_ref())?;
    let data = read_rows(reader)?;
    log::info!("Loaded {} regional data rows from {}", data.len(), path.as_ref().display());
    Ok(data)
}

/// Load regional data from any reader (e.g., string buffer)
pub fn load_regional_data_from_reader<R: std::io::Read>(reader: R) -> Result<RegionalDataSet> {
    read_rows(Reader::from_reader(reader))
}

fn read_rows<R: std::io::Read>(mut reader: Reader<R>) -> Result<RegionalDataSet> {
    let mut data = RegionalDataSet::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        let (location, values) = row.into_entry()?;
        if !values.is_complete() {
            log::debug!("Incomplete regional data for {}", location);
        }
        data.insert(location, values);
    }

    Ok(data)
}
