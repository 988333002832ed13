//! Error types for transformations.

use thiserror::Error;

/// Errors raised while joining or summarising tables.
#[derive(Debug, Error)]
pub enum TransformError {
    /// No monthly tables were loaded, so there is nothing to join.
    #[error("no monthly data found to join")]
    NoMonthlyData,

    /// A required column is absent from a table.
    #[error("column '{column}' not found in {table}")]
    MissingColumn { table: String, column: String },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for TransformError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for transformation operations.
pub type Result<T> = std::result::Result<T, TransformError>;
