//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;
use gpa_model::{CropMode, FigureFormat};

#[derive(Parser)]
#[command(
    name = "gp-appointments",
    version,
    about = "NHS GP appointments pipeline - summarise practice level crosstabs",
    long_about = "Extract a monthly practice level crosstab archive, join it with the\n\
                  practice lookup, and write summary tables, charts and a text report."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the full analysis for one monthly archive.
    Run(RunArgs),

    /// List the pipeline stages with their inputs and outputs.
    Stages,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Archive stem under <DATA_DIR>/compressed, e.g. `jul_25`.
    #[arg(value_name = "MONTH", default_value = "jul_25")]
    pub month: String,

    /// Root of the compressed, raw, lookup and processed directories.
    #[arg(long = "data-dir", value_name = "DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Root directory for rendered charts (one subdirectory per run).
    #[arg(long = "figures-dir", value_name = "DIR", default_value = "figures")]
    pub figures_dir: PathBuf,

    /// TOML file with option overrides. Flags given here take precedence.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Read at most this many rows from each monthly file.
    #[arg(long = "sample-size", value_name = "ROWS")]
    pub sample_size: Option<usize>,

    /// Image format for charts.
    #[arg(long = "figure-format", value_enum)]
    pub figure_format: Option<FigureFormatArg>,

    /// Raster resolution for PNG charts.
    #[arg(long = "dpi", value_name = "DPI")]
    pub dpi: Option<u32>,

    /// Whitespace handling around charts.
    #[arg(long = "crop", value_enum)]
    pub crop: Option<CropArg>,

    /// Glob pattern selecting monthly CSV files in the raw directory.
    #[arg(long = "csv-pattern", value_name = "GLOB")]
    pub csv_pattern: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FigureFormatArg {
    Png,
    Svg,
}

impl From<FigureFormatArg> for FigureFormat {
    fn from(arg: FigureFormatArg) -> Self {
        match arg {
            FigureFormatArg::Png => Self::Png,
            FigureFormatArg::Svg => Self::Svg,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum CropArg {
    Tight,
    Standard,
}

impl From<CropArg> for CropMode {
    fn from(arg: CropArg) -> Self {
        match arg {
            CropArg::Tight => Self::Tight,
            CropArg::Standard => Self::Standard,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
