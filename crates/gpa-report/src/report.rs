//! Plain-text run report.

use std::collections::BTreeSet;
use std::path::PathBuf;

use gpa_model::columns::{COUNT_OF_APPOINTMENTS, DATA_MONTH, GP_CODE};
use gpa_model::{KpiTargets, SummaryTables};
use gpa_transform::{KeyMetrics, f64_values, has_column, string_values};
use polars::prelude::DataFrame;

use crate::error::Result;
use crate::format::{format_percent, format_thousands};

pub const REPORT_TITLE: &str = "NHS Practice Level Crosstabs Pipeline Report";

/// Everything the report prints.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportData {
    pub total_records: usize,
    /// Distinct source months in first-seen order.
    pub data_months: Vec<String>,
    pub practice_count: usize,
    pub total_appointments: f64,
    pub metrics: Option<KeyMetrics>,
    pub targets: KpiTargets,
    pub summary_files: Vec<PathBuf>,
    pub figure_files: Vec<PathBuf>,
}

impl ReportData {
    /// Collects the data summary from the combined table and the key metrics
    /// table. File lists start empty.
    pub fn from_tables(
        combined: &DataFrame,
        summaries: &SummaryTables,
        targets: KpiTargets,
    ) -> Result<Self> {
        let mut data_months = Vec::new();
        if has_column(combined, DATA_MONTH) {
            let mut seen = BTreeSet::new();
            for month in string_values(combined, DATA_MONTH)? {
                if seen.insert(month.clone()) {
                    data_months.push(month);
                }
            }
        }

        let practice_count = if has_column(combined, GP_CODE) {
            string_values(combined, GP_CODE)?
                .into_iter()
                .filter(|code| !code.trim().is_empty())
                .collect::<BTreeSet<_>>()
                .len()
        } else {
            0
        };

        let total_appointments = if has_column(combined, COUNT_OF_APPOINTMENTS) {
            f64_values(combined, COUNT_OF_APPOINTMENTS)?
                .into_iter()
                .flatten()
                .sum()
        } else {
            0.0
        };

        let metrics = match summaries.get(SummaryTables::KEY_METRICS) {
            Some(table) => KeyMetrics::from_frame(table)?,
            None => None,
        };

        Ok(Self {
            total_records: combined.height(),
            data_months,
            practice_count,
            total_appointments,
            metrics,
            targets,
            summary_files: Vec::new(),
            figure_files: Vec::new(),
        })
    }
}

fn status(meets: bool, miss: &str) -> String {
    if meets {
        "meets target".to_string()
    } else {
        miss.to_string()
    }
}

/// Renders the report text.
pub fn render_report(data: &ReportData) -> String {
    let mut lines: Vec<String> = vec![REPORT_TITLE.to_string(), "=".repeat(50), String::new()];

    lines.push("Data Summary:".to_string());
    lines.push(format!(
        "- Total records processed: {}",
        format_thousands(data.total_records as f64)
    ));
    lines.push(format!("- Data months: {}", data.data_months.join(", ")));
    lines.push(format!(
        "- Number of unique GP practices: {}",
        data.practice_count
    ));
    lines.push(format!(
        "- Total appointments: {}",
        format_thousands(data.total_appointments)
    ));
    lines.push(String::new());

    lines.push("Key Metrics:".to_string());
    match &data.metrics {
        Some(metrics) => {
            let dna_ok = metrics.dna_rate <= data.targets.dna_rate;
            let completion_ok = metrics.completion_rate >= data.targets.completion_rate;
            lines.push(format!(
                "- DNA rate: {} (target {}, {})",
                format_percent(metrics.dna_rate),
                format_percent(data.targets.dna_rate),
                status(dna_ok, "above target")
            ));
            lines.push(format!(
                "- Completion rate: {} (target {}, {})",
                format_percent(metrics.completion_rate),
                format_percent(data.targets.completion_rate),
                status(completion_ok, "below target")
            ));
            lines.push(format!(
                "- DNA appointments: {}",
                format_thousands(metrics.dna_count)
            ));
            lines.push(format!(
                "- Attended appointments: {}",
                format_thousands(metrics.attended_count)
            ));
        }
        None => lines.push("- Not available (no appointment status column)".to_string()),
    }
    lines.push(String::new());

    lines.push("Summary Tables Created:".to_string());
    lines.extend(
        data.summary_files
            .iter()
            .map(|path| format!("- {}", path.display())),
    );
    lines.push(String::new());

    lines.push("Visualizations Created:".to_string());
    lines.extend(
        data.figure_files
            .iter()
            .map(|path| format!("- {}", path.display())),
    );

    let mut report = lines.join("\n");
    report.push('\n');
    report
}
