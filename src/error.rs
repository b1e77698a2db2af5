use thiserror::Error;

/// Hard failures of the pipeline. Soft states (empty selection, missing
/// data points) are carried as values and never appear here.
#[derive(Debug, Error)]
pub enum DashError {
    /// The input cannot be interpreted at all (no year columns, no key column...).
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("invalid selection: from year {from} is after to year {to}")]
    InvalidSelection { from: i32, to: i32 },

    #[error("year {year} outside available range {min}..={max}")]
    YearOutOfRange { year: i32, min: i32, max: i32 },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DashError>;
