//! Error types for structural failures
//!
//! Numeric degeneracies (non-convergent IRR, division by zero) are never
//! errors: they surface as NaN or `None` inside the outputs. Only problems
//! that make a study impossible to set up are reported here.

use thiserror::Error;

/// Construction and build-time failures
#[derive(Debug, Error)]
pub enum ValuationError {
    #[error("Malformed thermal efficiency formula `{formula}`: {reason}")]
    MalformedFormula { formula: String, reason: String },

    #[error("Unknown input parameter: {0}")]
    UnknownParameter(String),

    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    #[error("Unknown sector: {0}")]
    UnknownSector(String),

    #[error("Unknown technology: {0}")]
    UnknownTechnology(String),

    #[error("Invalid value for {parameter}: {value} ({reason})")]
    InvalidValue {
        parameter: String,
        value: f64,
        reason: String,
    },

    #[error("Invalid sweep: {0}")]
    InvalidSweep(String),

    #[error("Inconsistent grids for {sector} {year}: {reason}")]
    InconsistentGrids {
        sector: String,
        year: i32,
        reason: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ValuationError>;
