//! Subcommand implementations.

use anyhow::{Context, Result};
use gpa_core::{AnalysisOutcome, analysis_pipeline, run_analysis};
use gpa_model::{AnalysisConfig, ConfigOverrides};
use tracing::info;

use crate::cli::RunArgs;

/// Resolve the run configuration: defaults, then the config file, then flags.
pub fn build_config(args: &RunArgs) -> Result<AnalysisConfig> {
    let config = AnalysisConfig::create(&args.data_dir, &args.figures_dir, &args.month)
        .context("failed to create configuration")?;
    let mut config = match &args.config {
        Some(path) => ConfigOverrides::from_file(path)?.apply(config)?,
        None => config,
    };
    if let Some(pattern) = &args.csv_pattern {
        config = config.with_csv_file_pattern(pattern.clone());
    }
    if args.sample_size.is_some() {
        config = config.with_sample_size(args.sample_size);
    }
    if let Some(format) = args.figure_format {
        config = config.with_figure_format(format.into());
    }
    if let Some(dpi) = args.dpi {
        config = config.with_figure_dpi(dpi);
    }
    if let Some(crop) = args.crop {
        config = config.with_figure_crop(crop.into());
    }
    config.validate()?;
    Ok(config)
}

pub fn run_pipeline(args: &RunArgs) -> Result<AnalysisOutcome> {
    let config = build_config(args)?;
    info!(
        run_id = %config.run_id,
        archive = %config.input_archive.display(),
        "Starting analysis"
    );
    let pipeline = analysis_pipeline(config);
    Ok(run_analysis(&pipeline))
}

/// One row of the `stages` listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageRow {
    pub name: String,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

/// Stage contracts of the analysis pipeline, in execution order.
pub fn stage_rows() -> Result<Vec<StageRow>> {
    // The layout is only needed to construct the stages; nothing is read.
    let config = AnalysisConfig::layout("data", "figures", "jul_25")?;
    let pipeline = analysis_pipeline(config);
    Ok(pipeline
        .descriptors()
        .map(|descriptor| StageRow {
            name: descriptor.name().to_string(),
            inputs: descriptor.inputs().to_vec(),
            outputs: descriptor.outputs().to_vec(),
        })
        .collect())
}
