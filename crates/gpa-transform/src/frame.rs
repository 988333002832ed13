//! Polars value access helpers.

use polars::prelude::{AnyValue, DataFrame, DataType};

use crate::error::{Result, TransformError};

/// Converts a Polars AnyValue to a String representation.
/// Returns empty string for Null, properly formats numeric types.
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Formats a floating-point number as a string without trailing zeros.
fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// Converts an AnyValue to f64, returning None for non-numeric or null values.
pub fn any_to_f64(value: AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(f64::from(v)),
        AnyValue::Int16(v) => Some(f64::from(v)),
        AnyValue::Int32(v) => Some(f64::from(v)),
        AnyValue::Int64(v) => Some(v as f64),
        AnyValue::UInt8(v) => Some(f64::from(v)),
        AnyValue::UInt16(v) => Some(f64::from(v)),
        AnyValue::UInt32(v) => Some(f64::from(v)),
        AnyValue::UInt64(v) => Some(v as f64),
        AnyValue::Float32(v) => Some(f64::from(v)),
        AnyValue::Float64(v) => Some(v),
        AnyValue::String(s) => s.trim().parse().ok(),
        AnyValue::StringOwned(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Returns true if `df` has a column named `name`.
pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|column| column.as_str() == name)
}

fn missing(column: &str) -> TransformError {
    TransformError::MissingColumn {
        table: "frame".to_string(),
        column: column.to_string(),
    }
}

/// Values of `column` rendered as strings (nulls become empty strings).
pub fn string_values(df: &DataFrame, column: &str) -> Result<Vec<String>> {
    let values = df.column(column).map_err(|_| missing(column))?;
    (0..values.len())
        .map(|idx| Ok(any_to_string(values.get(idx)?)))
        .collect()
}

/// Values of `column` as f64; nulls and non-numeric values become `None`.
pub fn f64_values(df: &DataFrame, column: &str) -> Result<Vec<Option<f64>>> {
    let values = df.column(column).map_err(|_| missing(column))?;
    let values = values
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    Ok(values.f64()?.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{NamedFrom, Series};

    #[test]
    fn test_any_to_string() {
        assert_eq!(any_to_string(AnyValue::Null), "");
        assert_eq!(any_to_string(AnyValue::Int64(12)), "12");
        assert_eq!(any_to_string(AnyValue::Float64(0.70)), "0.7");
        assert_eq!(any_to_string(AnyValue::Float64(10.0)), "10");
        assert_eq!(any_to_string(AnyValue::String("London")), "London");
    }

    #[test]
    fn test_any_to_f64() {
        assert_eq!(any_to_f64(AnyValue::Int32(3)), Some(3.0));
        assert_eq!(any_to_f64(AnyValue::String(" 2.5 ")), Some(2.5));
        assert_eq!(any_to_f64(AnyValue::String("n/a")), None);
        assert_eq!(any_to_f64(AnyValue::Null), None);
    }

    #[test]
    fn test_column_values() {
        let df = DataFrame::new(vec![
            Series::new("name".into(), vec![Some("a"), None]).into(),
            Series::new("count".into(), vec![Some(1i64), None]).into(),
        ])
        .unwrap();

        assert_eq!(string_values(&df, "name").unwrap(), vec!["a", ""]);
        assert_eq!(f64_values(&df, "count").unwrap(), vec![Some(1.0), None]);
        assert!(has_column(&df, "count"));
        assert!(!has_column(&df, "region_name"));
        assert!(matches!(
            string_values(&df, "absent"),
            Err(TransformError::MissingColumn { .. })
        ));
    }
}
