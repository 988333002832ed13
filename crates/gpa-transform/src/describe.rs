//! Descriptive statistics over a numeric column.

use polars::prelude::{DataFrame, DataType, Expr, IntoLazy, QuantileMethod, col, lit};

use crate::error::{Result, TransformError};
use crate::frame::{any_to_f64, has_column};

/// Distribution summary of a set of values.
///
/// Quartiles use linear interpolation between closest ranks and `std` is the
/// sample standard deviation (`n - 1` denominator).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Describe {
    pub count: usize,
    pub mean: f64,
    /// `None` when fewer than two values are present.
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl Describe {
    /// Statistic labels, in row order.
    pub const LABELS: [&'static str; 8] =
        ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

    /// Values in [`Describe::LABELS`] order.
    #[must_use]
    pub fn values(&self) -> [Option<f64>; 8] {
        [
            Some(self.count as f64),
            Some(self.mean),
            self.std,
            Some(self.min),
            Some(self.q25),
            Some(self.median),
            Some(self.q75),
            Some(self.max),
        ]
    }
}

/// Describes the non-null, non-NaN values of `column`, or `None` when there
/// are none.
pub fn describe(df: &DataFrame, column: &str) -> Result<Option<Describe>> {
    if !has_column(df, column) {
        return Err(TransformError::MissingColumn {
            table: "frame".to_string(),
            column: column.to_string(),
        });
    }
    let values = || -> Expr {
        col(column)
            .cast(DataType::Float64)
            .drop_nulls()
            .drop_nans()
    };
    let quantile = |q: f64| values().quantile(lit(q), QuantileMethod::Linear);
    let stats = df
        .clone()
        .lazy()
        .select([
            values().count().cast(DataType::Float64).alias("count"),
            values().mean().alias("mean"),
            values().std(1).alias("std"),
            values().min().alias("min"),
            quantile(0.25).alias("q25"),
            quantile(0.5).alias("median"),
            quantile(0.75).alias("q75"),
            values().max().alias("max"),
        ])
        .collect()?;

    let scalar = |name: &str| -> Result<Option<f64>> {
        Ok(any_to_f64(stats.column(name)?.get(0)?).filter(|v| !v.is_nan()))
    };
    let count = scalar("count")?.unwrap_or(0.0) as usize;
    if count == 0 {
        return Ok(None);
    }
    let required = |name: &str| -> Result<f64> { Ok(scalar(name)?.unwrap_or(f64::NAN)) };

    Ok(Some(Describe {
        count,
        mean: required("mean")?,
        std: if count > 1 { scalar("std")? } else { None },
        min: required("min")?,
        q25: required("q25")?,
        median: required("median")?,
        q75: required("q75")?,
        max: required("max")?,
    }))
}
