//! Persisting a run: combined data, summary tables, figures and the report.

use std::path::Path;

use gpa_model::{AnalysisConfig, FigureSet, OutputKind, OutputManifest, SummaryTables};
use polars::prelude::DataFrame;
use tracing::info;

use crate::error::{ReportError, Result};
use crate::render::FigureRenderer;
use crate::report::{ReportData, render_report};
use crate::tables::write_table_csv;

fn create_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|source| ReportError::DirectoryCreate {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes every output of a run and returns the manifest in write order.
///
/// Tables and the report go to `config.output_dir`, figures to
/// `config.figures_dir`; both are created when missing.
pub fn write_outputs(
    config: &AnalysisConfig,
    combined: &DataFrame,
    summaries: &SummaryTables,
    figures: &FigureSet,
) -> Result<OutputManifest> {
    create_dir(&config.output_dir)?;
    create_dir(&config.figures_dir)?;
    let mut manifest = OutputManifest::default();

    let combined_path = config.output_dir.join(&config.combined_data_filename);
    write_table_csv(combined, &combined_path)?;
    info!(path = %combined_path.display(), rows = combined.height(), "Saved combined data");
    manifest.push("combined_data", OutputKind::CombinedData, combined_path);

    for (name, table) in summaries.iter() {
        let path = config.output_dir.join(format!("{name}.csv"));
        write_table_csv(table, &path)?;
        info!(path = %path.display(), "Saved summary");
        manifest.push(name, OutputKind::Summary, path);
    }

    let renderer = FigureRenderer::new(
        config.figure_format,
        config.figure_dpi,
        config.figure_crop,
    );
    for (name, figure) in figures.iter() {
        let path = config
            .figures_dir
            .join(format!("{name}.{}", renderer.format().extension()));
        renderer.save(name, figure, &path)?;
        info!(path = %path.display(), "Saved figure");
        manifest.push(name, OutputKind::Figure, path);
    }

    let mut report = ReportData::from_tables(combined, summaries, config.kpi_targets)?;
    report.summary_files = manifest
        .of_kind(OutputKind::Summary)
        .map(|file| file.path.clone())
        .collect();
    report.figure_files = manifest
        .of_kind(OutputKind::Figure)
        .map(|file| file.path.clone())
        .collect();
    let report_path = config.report_path();
    std::fs::write(&report_path, render_report(&report)).map_err(|source| {
        ReportError::FileWrite {
            path: report_path.clone(),
            source,
        }
    })?;
    info!(path = %report_path.display(), "Saved report");
    manifest.push("report", OutputKind::Report, report_path);

    info!(outputs = manifest.len(), "Output complete");
    Ok(manifest)
}
