//! CSV reading with header normalization.

mod header;
mod reader;

pub use header::{CsvHeaders, normalize_column_name};
pub use reader::{LoadedTable, read_csv_headers, read_csv_table};
