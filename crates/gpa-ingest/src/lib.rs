//! GP appointments data ingestion.
//!
//! This crate turns a monthly extract archive into Polars DataFrames.
//!
//! # Features
//!
//! - **Archive Extraction**: Unpack CSV members of a zip archive, routing lookup
//!   files to their own directory and skipping files already on disk
//! - **Discovery**: Find data files in a directory by glob pattern
//! - **CSV Loading**: Read CSV files with headers normalized to snake_case
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use gpa_ingest::{ExtractionTargets, extract_archive, discover_files, read_csv_table};
//!
//! let targets = ExtractionTargets::new(Path::new("data/raw/jul_25"), Path::new("data/lookup"));
//! let extracted = extract_archive(Path::new("data/compressed/jul_25.zip"), &targets)?;
//!
//! for path in discover_files(Path::new("data/raw/jul_25"), "*.csv")? {
//!     let table = read_csv_table(&path, None)?;
//! }
//! ```

mod archive;
mod csv;
mod discovery;
mod error;

// === Error Types ===
pub use error::{IngestError, Result};

// === Archive Extraction ===
pub use archive::{ExtractedFile, ExtractionTargets, extract_archive};

// === CSV Reading ===
pub use csv::{CsvHeaders, LoadedTable, normalize_column_name, read_csv_headers, read_csv_table};

// === File Discovery ===
pub use discovery::{dataset_name, discover_files};
