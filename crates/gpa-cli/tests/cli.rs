//! Argument parsing and configuration precedence.

use std::path::Path;

use clap::Parser;
use gpa_cli::cli::{Cli, Command, RunArgs};
use gpa_cli::commands::{build_config, stage_rows};
use gpa_model::{CropMode, FigureFormat};
use tempfile::TempDir;

fn data_dir_with_archive(month: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    let compressed = dir.path().join("compressed");
    std::fs::create_dir_all(&compressed).unwrap();
    std::fs::write(compressed.join(format!("{month}.zip")), b"").unwrap();
    dir
}

fn run_args(args: &[&str]) -> RunArgs {
    let cli = Cli::try_parse_from(args).unwrap();
    match cli.command {
        Command::Run(args) => args,
        Command::Stages => panic!("expected the run subcommand"),
    }
}

fn data_dir_arg(dir: &Path) -> String {
    dir.display().to_string()
}

#[test]
fn run_defaults_to_jul_25() {
    let args = run_args(&["gp-appointments", "run"]);
    assert_eq!(args.month, "jul_25");
    assert_eq!(args.data_dir, Path::new("data"));
    assert_eq!(args.figures_dir, Path::new("figures"));
    assert!(args.config.is_none());
    assert!(args.figure_format.is_none());
}

#[test]
fn unknown_figure_format_is_rejected() {
    let result = Cli::try_parse_from(["gp-appointments", "run", "--figure-format", "gif"]);
    assert!(result.is_err());
}

#[test]
fn flags_override_config_file() {
    let dir = data_dir_with_archive("jun_25");
    let config_path = dir.path().join("pipeline.toml");
    std::fs::write(
        &config_path,
        "sample_size = 500\nfigure_format = \"svg\"\nfigure_dpi = 150\n",
    )
    .unwrap();
    let data_dir = data_dir_arg(dir.path());
    let config_arg = config_path.display().to_string();

    let args = run_args(&[
        "gp-appointments",
        "run",
        "jun_25",
        "--data-dir",
        &data_dir,
        "--config",
        &config_arg,
        "--dpi",
        "72",
        "--crop",
        "standard",
    ]);
    let config = build_config(&args).unwrap();

    assert_eq!(config.run_id, "jun_25");
    assert_eq!(config.sample_size, Some(500));
    assert_eq!(config.figure_format, FigureFormat::Svg);
    assert_eq!(config.figure_dpi, 72);
    assert_eq!(config.figure_crop, CropMode::Standard);
    assert_eq!(config.output_dir, dir.path().join("processed/jun_25"));
}

#[test]
fn missing_archive_fails_before_any_stage() {
    let dir = TempDir::new().unwrap();
    let data_dir = data_dir_arg(dir.path());
    let args = run_args(&["gp-appointments", "run", "aug_25", "--data-dir", &data_dir]);

    let error = build_config(&args).unwrap_err();
    assert!(format!("{error:#}").contains("zip file not found"));
}

#[test]
fn zero_dpi_is_rejected() {
    let dir = data_dir_with_archive("jul_25");
    let data_dir = data_dir_arg(dir.path());
    let args = run_args(&["gp-appointments", "run", "--data-dir", &data_dir, "--dpi", "0"]);

    assert!(build_config(&args).is_err());
}

#[test]
fn stages_lists_contracts_in_order() {
    let rows = stage_rows().unwrap();
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[0].name, "data_extraction");
    assert!(rows[0].inputs.is_empty());
    assert_eq!(rows[0].outputs, vec!["extracted_files".to_string()]);
    assert_eq!(rows[5].name, "output");
    assert_eq!(rows[5].outputs, vec!["output_files".to_string()]);
}
