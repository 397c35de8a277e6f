//! DG Value Proposition - economics and market potential of distributed generation
//!
//! This library provides:
//! - Per-kWh cash flows, NPV, IRR, payback and LCOE for one DG scenario
//! - Logistic maximum market penetration from simple payback
//! - Two-parameter sensitivity grids per region, sector and year
//! - Generation-weighted market aggregation with primary energy savings
//! - The EPA CHP technology catalog as sweep values

pub mod catalog;
pub mod config;
pub mod error;
pub mod export;
pub mod inputs;
pub mod market;
pub mod regional;
pub mod scenario;
pub mod study;
pub mod valuation;

// Re-export commonly used types
pub use error::{Result, ValuationError};
pub use inputs::{InputParameter, ThermalEfficiency, ValuationInputs, ValuationInputsBuilder};
pub use market::{MarketAggregator, MarketPortfolio, MarketSegment};
pub use regional::{RegionYearData, RegionalDataSet, RegionalDataSource, Sector, StudyLocation};
pub use scenario::{MarketStudyResult, StudyRunner};
pub use study::{Axis, MetricGrid, SensitivityGrid, Sweep};
pub use valuation::{CashFlowEngine, CashFlowSeries, Metric, ValuationOutputs};
