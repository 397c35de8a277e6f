//! Cash-flow valuation of a single DG scenario

mod cashflows;
mod discount;
mod engine;
mod irr;
mod outputs;
mod penetration;

pub use cashflows::{CashFlowRow, CashFlowSeries};
pub use discount::DiscountCurve;
pub use engine::{CashFlowEngine, HOURS_PER_YEAR};
pub use irr::{calculate_irr, npv_at_rate};
pub use outputs::{Metric, ValuationOutputs};
pub use penetration::MarketPenetrationModel;
