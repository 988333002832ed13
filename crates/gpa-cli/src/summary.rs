use std::time::Duration;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use gpa_cli::commands::StageRow;
use gpa_core::{AnalysisOutcome, RunSummary, keys};
use gpa_model::OutputManifest;

pub fn print_outcome(outcome: &AnalysisOutcome) {
    match outcome {
        AnalysisOutcome::Completed(summary) => print_summary(summary),
        AnalysisOutcome::ValidationFailed(error) => {
            eprintln!("error: pipeline validation failed: {error}");
        }
        AnalysisOutcome::Failed { run_id, error } => {
            eprintln!("error: run {run_id} failed: {error}");
        }
    }
}

fn print_summary(summary: &RunSummary) {
    println!("Run: {}", summary.run_id);

    let mut table = Table::new();
    table.set_header(vec![header_cell("Stage"), header_cell("Duration")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for stage in &summary.stages {
        table.add_row(vec![Cell::new(&stage.name), Cell::new(format_duration(stage.duration))]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format_duration(summary.total)).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    let Ok(manifest) = summary
        .context
        .get_as::<OutputManifest>(keys::OUTPUT_FILES)
    else {
        return;
    };
    print_manifest(&manifest);
}

fn print_manifest(manifest: &OutputManifest) {
    if manifest.is_empty() {
        println!("No files written.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Kind"),
        header_cell("Name"),
        header_cell("Path"),
    ]);
    apply_table_style(&mut table);
    for file in &manifest.files {
        table.add_row(vec![
            Cell::new(file.kind.label()).fg(Color::Green),
            Cell::new(&file.name),
            Cell::new(file.path.display()),
        ]);
    }
    println!();
    println!("Files:");
    println!("{table}");
}

pub fn print_stages(rows: &[StageRow]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Stage"),
        header_cell("Inputs"),
        header_cell("Outputs"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (idx, row) in rows.iter().enumerate() {
        table.add_row(vec![
            Cell::new(idx + 1),
            Cell::new(&row.name).fg(Color::Cyan),
            key_cell(&row.inputs),
            key_cell(&row.outputs),
        ]);
    }
    println!("{table}");
}

fn key_cell(keys: &[String]) -> Cell {
    if keys.is_empty() {
        Cell::new("-").add_attribute(Attribute::Dim)
    } else {
        Cell::new(keys.join(", "))
    }
}

fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1000 {
        format!("{millis} ms")
    } else {
        format!("{:.2} s", duration.as_secs_f64())
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
