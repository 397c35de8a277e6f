//! Regional energy rates and generation by region, sector and year
//!
//! The data is assumed to be standardized already: rates in $/kWh (natural
//! gas on an LHV basis) and generation in kWh. Missing values are NaN.

pub mod loader;

pub use loader::{load_regional_data, load_regional_data_from_reader};

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValuationError};

/// kWh per TWh
pub const KWH_PER_TWH: f64 = 1.0e9;

/// Market sector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sector {
    Commercial,
    Residential,
    Industrial,
}

impl Sector {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sector::Commercial => "COM",
            Sector::Residential => "RES",
            Sector::Industrial => "IND",
        }
    }
}

impl FromStr for Sector {
    type Err = ValuationError;

    /// Only the first letter is significant: "C", "com" and "Commercial" all match
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().chars().next().map(|c| c.to_ascii_uppercase()) {
            Some('C') => Ok(Sector::Commercial),
            Some('R') => Ok(Sector::Residential),
            Some('I') => Ok(Sector::Industrial),
            _ => Err(ValuationError::UnknownSector(s.to_string())),
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rates and generation for one region, sector and year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionYearData {
    /// Average electricity rate ($/kWh)
    pub electricity_rate_per_kwh: f64,
    /// Average natural gas rate ($/kWh, LHV)
    pub natural_gas_rate_per_kwh: f64,
    /// Net generated (consumed) electricity (kWh)
    pub net_generation_kwh: f64,
}

impl RegionYearData {
    /// All values unknown
    pub fn missing() -> Self {
        Self {
            electricity_rate_per_kwh: f64::NAN,
            natural_gas_rate_per_kwh: f64::NAN,
            net_generation_kwh: f64::NAN,
        }
    }

    pub fn net_generation_twh(&self) -> f64 {
        self.net_generation_kwh / KWH_PER_TWH
    }

    pub fn is_complete(&self) -> bool {
        self.electricity_rate_per_kwh.is_finite()
            && self.natural_gas_rate_per_kwh.is_finite()
            && self.net_generation_kwh.is_finite()
    }
}

impl Default for RegionYearData {
    fn default() -> Self {
        Self::missing()
    }
}

/// Where a study is located
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StudyLocation {
    /// Region code, typically a two letter state abbreviation or "US"
    pub region: String,
    pub sector: Sector,
    pub year: i32,
}

impl StudyLocation {
    pub fn new(region: &str, sector: Sector, year: i32) -> Self {
        Self {
            region: normalize_region(region),
            sector,
            year,
        }
    }
}

impl fmt::Display for StudyLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.region, self.sector, self.year)
    }
}

/// Supplier of regional data, keyed by region, sector and year
pub trait RegionalDataSource {
    /// Look up a region/year. Absent entries come back as [`RegionYearData::missing`].
    fn lookup(&self, location: &StudyLocation) -> RegionYearData;
}

/// In-memory regional data set
#[derive(Debug, Clone, Default)]
pub struct RegionalDataSet {
    entries: HashMap<StudyLocation, RegionYearData>,
}

impl RegionalDataSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, location: StudyLocation, data: RegionYearData) {
        self.entries.insert(location, data);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Years available for a region and sector, ascending
    pub fn years(&self, region: &str, sector: Sector) -> Vec<i32> {
        let region = normalize_region(region);
        let mut years: Vec<i32> = self
            .entries
            .keys()
            .filter(|loc| loc.region == region && loc.sector == sector)
            .map(|loc| loc.year)
            .collect();
        years.sort_unstable();
        years
    }
}

impl RegionalDataSource for RegionalDataSet {
    fn lookup(&self, location: &StudyLocation) -> RegionYearData {
        match self.entries.get(location) {
            Some(data) => *data,
            None => {
                log::debug!("No regional data for {}, using NaN", location);
                RegionYearData::missing()
            }
        }
    }
}

pub(crate) fn normalize_region(region: &str) -> String {
    region.trim().to_ascii_uppercase()
}
