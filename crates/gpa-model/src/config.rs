//! Pipeline configuration.
//!
//! Every path of a run is derived from one run identifier (the archive stem,
//! e.g. `jul_25`):
//!
//! ```text
//! <data_dir>/compressed/<run_id>.zip   input archive
//! <data_dir>/raw/<run_id>/             extracted monthly CSV files
//! <data_dir>/lookup/                   extracted lookup table
//! <data_dir>/processed/<run_id>/       combined data, summaries, report
//! <figures_root>/<run_id>/             rendered charts
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Image format for rendered charts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FigureFormat {
    /// Rasterized PNG at the configured DPI.
    #[default]
    Png,
    /// Vector SVG as built.
    Svg,
}

impl FigureFormat {
    /// File extension without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }
}

/// How much whitespace is kept around a rendered chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropMode {
    /// Trim the canvas to the drawn content plus a small margin.
    #[default]
    Tight,
    /// Keep the full canvas.
    Standard,
}

/// Target values the KPI metrics are reported against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KpiTargets {
    /// Upper bound for the did-not-attend rate.
    pub dna_rate: f64,
    /// Lower bound for the completion (attended) rate.
    pub completion_rate: f64,
}

impl Default for KpiTargets {
    fn default() -> Self {
        Self {
            dna_rate: 0.05,
            completion_rate: 0.85,
        }
    }
}

/// Configuration shared by all stages of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub data_dir: PathBuf,
    pub compressed_data_dir: PathBuf,
    pub lookup_data_dir: PathBuf,
    /// Run identifier, also the archive stem.
    pub run_id: String,
    pub raw_data_dir: PathBuf,
    pub processed_data_dir: PathBuf,
    /// Per-run directory for tables and the report.
    pub output_dir: PathBuf,
    pub figures_dir: PathBuf,
    pub input_archive: PathBuf,

    /// Glob pattern matched against file names in the raw data directory.
    pub csv_file_pattern: String,
    /// File name of the lookup table inside the lookup directory.
    pub lookup_file: String,
    /// Case-insensitive marker identifying lookup files inside the archive.
    pub lookup_marker: String,
    /// Optional row cap applied to each monthly file.
    pub sample_size: Option<usize>,

    pub combined_data_filename: String,
    pub report_filename: String,

    pub figure_format: FigureFormat,
    pub figure_dpi: u32,
    pub figure_crop: CropMode,

    pub kpi_targets: KpiTargets,
}

impl AnalysisConfig {
    /// Derive the directory layout for `run_id` without touching the filesystem.
    pub fn layout(
        data_dir: impl Into<PathBuf>,
        figures_root: impl AsRef<Path>,
        run_id: &str,
    ) -> Result<Self> {
        let run_id = run_id.trim();
        if run_id.is_empty() || run_id.contains(['/', '\\']) || run_id == ".." {
            return Err(ConfigError::InvalidRunId(run_id.to_string()));
        }

        let data_dir = data_dir.into();
        let compressed_data_dir = data_dir.join("compressed");
        let lookup_data_dir = data_dir.join("lookup");
        let raw_data_dir = data_dir.join("raw").join(run_id);
        let processed_data_dir = data_dir.join("processed");
        let output_dir = processed_data_dir.join(run_id);
        let figures_dir = figures_root.as_ref().join(run_id);
        let input_archive = compressed_data_dir.join(format!("{run_id}.zip"));

        Ok(Self {
            data_dir,
            compressed_data_dir,
            lookup_data_dir,
            run_id: run_id.to_string(),
            raw_data_dir,
            processed_data_dir,
            output_dir,
            figures_dir,
            input_archive,
            csv_file_pattern: "*.csv".to_string(),
            lookup_file: "Mapping.csv".to_string(),
            lookup_marker: "mapping".to_string(),
            sample_size: None,
            combined_data_filename: "combined_data.csv".to_string(),
            report_filename: "pipeline_report.txt".to_string(),
            figure_format: FigureFormat::default(),
            figure_dpi: 300,
            figure_crop: CropMode::default(),
            kpi_targets: KpiTargets::default(),
        })
    }

    /// Derive the layout for `run_id` and require its archive to exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ArchiveNotFound`] when
    /// `<data_dir>/compressed/<run_id>.zip` is missing.
    pub fn create(
        data_dir: impl Into<PathBuf>,
        figures_root: impl AsRef<Path>,
        run_id: &str,
    ) -> Result<Self> {
        let config = Self::layout(data_dir, figures_root, run_id)?;
        if !config.input_archive.is_file() {
            return Err(ConfigError::ArchiveNotFound {
                path: config.input_archive,
            });
        }
        Ok(config)
    }

    /// Full path of the lookup table.
    #[must_use]
    pub fn lookup_path(&self) -> PathBuf {
        self.lookup_data_dir.join(&self.lookup_file)
    }

    /// Full path of the text report.
    #[must_use]
    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(&self.report_filename)
    }

    #[must_use]
    pub fn with_sample_size(mut self, sample_size: Option<usize>) -> Self {
        self.sample_size = sample_size;
        self
    }

    #[must_use]
    pub fn with_figure_format(mut self, format: FigureFormat) -> Self {
        self.figure_format = format;
        self
    }

    #[must_use]
    pub fn with_figure_dpi(mut self, dpi: u32) -> Self {
        self.figure_dpi = dpi;
        self
    }

    #[must_use]
    pub fn with_figure_crop(mut self, crop: CropMode) -> Self {
        self.figure_crop = crop;
        self
    }

    #[must_use]
    pub fn with_csv_file_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.csv_file_pattern = pattern.into();
        self
    }

    #[must_use]
    pub fn with_kpi_targets(mut self, targets: KpiTargets) -> Self {
        self.kpi_targets = targets;
        self
    }

    /// Check option ranges that the type system cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.figure_dpi == 0 {
            return Err(ConfigError::InvalidValue {
                field: "figure_dpi",
                value: self.figure_dpi.to_string(),
            });
        }
        if self.sample_size == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "sample_size",
                value: "0".to_string(),
            });
        }
        for (field, rate) in [
            ("target_dna_rate", self.kpi_targets.dna_rate),
            ("target_completion_rate", self.kpi_targets.completion_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(ConfigError::InvalidValue {
                    field,
                    value: rate.to_string(),
                });
            }
        }
        if self.csv_file_pattern.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "csv_file_pattern",
                value: self.csv_file_pattern.clone(),
            });
        }
        Ok(())
    }
}

/// Optional settings read from a TOML file and layered over the defaults.
///
/// ```toml
/// csv_file_pattern = "Practice_Level_Crosstab_*.csv"
/// sample_size = 10000
/// figure_format = "svg"
/// target_dna_rate = 0.05
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    pub csv_file_pattern: Option<String>,
    pub lookup_file: Option<String>,
    pub lookup_marker: Option<String>,
    pub sample_size: Option<usize>,
    pub combined_data_filename: Option<String>,
    pub report_filename: Option<String>,
    pub figure_format: Option<FigureFormat>,
    pub figure_dpi: Option<u32>,
    pub figure_crop: Option<CropMode>,
    pub target_dna_rate: Option<f64>,
    pub target_completion_rate: Option<f64>,
}

impl ConfigOverrides {
    /// Load overrides from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply the overrides to `config` and validate the result.
    pub fn apply(self, mut config: AnalysisConfig) -> Result<AnalysisConfig> {
        if let Some(pattern) = self.csv_file_pattern {
            config.csv_file_pattern = pattern;
        }
        if let Some(file) = self.lookup_file {
            config.lookup_file = file;
        }
        if let Some(marker) = self.lookup_marker {
            config.lookup_marker = marker;
        }
        if self.sample_size.is_some() {
            config.sample_size = self.sample_size;
        }
        if let Some(name) = self.combined_data_filename {
            config.combined_data_filename = name;
        }
        if let Some(name) = self.report_filename {
            config.report_filename = name;
        }
        if let Some(format) = self.figure_format {
            config.figure_format = format;
        }
        if let Some(dpi) = self.figure_dpi {
            config.figure_dpi = dpi;
        }
        if let Some(crop) = self.figure_crop {
            config.figure_crop = crop;
        }
        if let Some(rate) = self.target_dna_rate {
            config.kpi_targets.dna_rate = rate;
        }
        if let Some(rate) = self.target_completion_rate {
            config.kpi_targets.completion_rate = rate;
        }
        config.validate()?;
        Ok(config)
    }
}
