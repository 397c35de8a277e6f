//! Multi-region market aggregation
//!
//! Sensitivity grids for the regions of a (sector, year) are combined into
//! the addressed market, total market penetration and primary energy savings,
//! each weighted by the regions' total generation.

mod aggregator;

pub use aggregator::{
    MarketAggregator, MarketPortfolio, MarketSegment, DEFAULT_GRID_BASELINE_EFFICIENCY, TWH_PER_QUAD,
};
