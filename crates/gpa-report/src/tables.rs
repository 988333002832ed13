//! CSV output for DataFrames.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use polars::prelude::{CsvWriter, DataFrame, SerWriter};

use crate::error::{ReportError, Result};

/// Writes `df` to `path` as comma-separated values with a header row and no
/// index column.
pub fn write_table_csv(df: &DataFrame, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|source| ReportError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    let mut data = df.clone();
    CsvWriter::new(BufWriter::new(file))
        .include_header(true)
        .finish(&mut data)
        .map_err(|e| ReportError::CsvWrite {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{NamedFrom, Series};
    use tempfile::TempDir;

    #[test]
    fn test_write_table_csv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("key_metrics.csv");
        let df = DataFrame::new(vec![
            Series::new("metric".into(), vec!["total_appointments", "dna_rate"]).into(),
            Series::new("value".into(), vec![10.0, 0.3]).into(),
        ])
        .unwrap();

        write_table_csv(&df, &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "metric,value");
        assert_eq!(lines.len(), 3);
        assert!(lines[2].starts_with("dna_rate,0.3"));
    }

    #[test]
    fn test_write_table_csv_missing_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent").join("t.csv");
        let df = DataFrame::empty();
        assert!(matches!(
            write_table_csv(&df, &path),
            Err(ReportError::FileWrite { .. })
        ));
    }
}
