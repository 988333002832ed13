//! Shared data model for the GP appointments analysis pipeline.
//!
//! This crate holds everything the pipeline crates agree on:
//!
//! - **Configuration**: [`AnalysisConfig`] with run-derived paths and output options
//! - **Columns**: normalized column names of the monthly and lookup tables
//! - **Values**: the typed values stages pass to each other
//!   ([`RawTables`], [`SummaryTables`], [`FigureSet`], [`OutputManifest`])

pub mod columns;
pub mod config;
pub mod error;
pub mod values;

pub use config::{AnalysisConfig, ConfigOverrides, CropMode, FigureFormat, KpiTargets};
pub use error::{ConfigError, Result};
pub use values::{
    Figure, FigureSet, OutputFile, OutputKind, OutputManifest, RawTables, SummaryTables,
};
