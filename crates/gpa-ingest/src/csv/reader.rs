//! CSV file reading into Polars DataFrames.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use polars::prelude::{CsvReadOptions, DataFrame, SerReader};
use tracing::debug;

use crate::discovery::dataset_name;
use crate::error::{IngestError, Result};

use super::header::{CsvHeaders, parse_csv_line};

/// A CSV file loaded into a DataFrame with normalized column names.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    /// Dataset name derived from the file stem.
    pub name: String,
    pub path: PathBuf,
    pub headers: CsvHeaders,
    pub data: DataFrame,
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// Reads and normalizes the header row of a CSV file.
pub fn read_csv_headers(path: &Path) -> Result<CsvHeaders> {
    let reader = BufReader::new(open(path)?);
    let Some(first) = reader.lines().next() else {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    };
    let line = first.map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    // Skip BOM if present
    let line = line.strip_prefix('\u{feff}').unwrap_or(&line);

    let raw = parse_csv_line(line);
    if raw.iter().all(String::is_empty) {
        return Err(IngestError::NoHeaderDetected {
            path: path.to_path_buf(),
        });
    }

    let headers = CsvHeaders::from_raw(raw);
    if let Some(column) = headers.first_duplicate() {
        return Err(IngestError::DuplicateColumn {
            column: column.to_string(),
            path: path.to_path_buf(),
        });
    }
    Ok(headers)
}

/// Reads a CSV file into a DataFrame with snake_case column names.
///
/// When `sample_size` is set, at most that many data rows are read.
pub fn read_csv_table(path: &Path, sample_size: Option<usize>) -> Result<LoadedTable> {
    let headers = read_csv_headers(path)?;

    let csv_error = |e: polars::prelude::PolarsError| IngestError::CsvParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    };
    let mut data = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(1000))
        .with_n_rows(sample_size)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(csv_error)?
        .finish()
        .map_err(csv_error)?;

    if data.width() != headers.len() {
        return Err(IngestError::CsvParse {
            path: path.to_path_buf(),
            message: format!(
                "expected {} columns from header, parsed {}",
                headers.len(),
                data.width()
            ),
        });
    }
    data.set_column_names(headers.columns.iter().map(String::as_str))?;

    let name = dataset_name(path);
    debug!(
        dataset = %name,
        rows = data.height(),
        columns = data.width(),
        "CSV loaded"
    );

    Ok(LoadedTable {
        name,
        path: path.to_path_buf(),
        headers,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        write!(file, "{content}").unwrap();
        path
    }

    #[test]
    fn test_read_csv_headers_normalizes() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "a.csv", "\u{feff}GP_CODE,Appt Status,COUNT_OF_APPOINTMENTS\n");
        let headers = read_csv_headers(&path).unwrap();

        assert_eq!(
            headers.columns,
            vec!["gp_code", "appt_status", "count_of_appointments"]
        );
        assert_eq!(headers.raw[1], "Appt Status");
    }

    #[test]
    fn test_read_csv_headers_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "empty.csv", "");
        assert!(matches!(
            read_csv_headers(&path),
            Err(IngestError::EmptyCsv { .. })
        ));
    }

    #[test]
    fn test_read_csv_headers_duplicate_after_normalizing() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "dup.csv", "GP_CODE,gp code\nA,B\n");
        assert!(matches!(
            read_csv_headers(&path),
            Err(IngestError::DuplicateColumn { .. })
        ));
    }

    #[test]
    fn test_read_csv_table() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "Practice_Level_Crosstab_Jul_25.csv",
            "GP_CODE,APPT_STATUS,COUNT_OF_APPOINTMENTS\nA81001,Attended,5\nA81002,DNA,2\n",
        );
        let table = read_csv_table(&path, None).unwrap();

        assert_eq!(table.name, "Practice_Level_Crosstab_Jul_25");
        assert_eq!(table.data.height(), 2);
        assert_eq!(
            table.data.get_column_names_str(),
            vec!["gp_code", "appt_status", "count_of_appointments"]
        );
    }

    #[test]
    fn test_read_csv_table_sample_size() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "m.csv", "A,B\n1,2\n3,4\n5,6\n");
        let table = read_csv_table(&path, Some(2)).unwrap();
        assert_eq!(table.data.height(), 2);
    }

    #[test]
    fn test_read_csv_table_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = read_csv_table(&dir.path().join("absent.csv"), None);
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }
}
