//! Figures built from the summary tables.

use gpa_model::columns::{
    APPT_MODE, APPT_STATUS, COUNT_OF_APPOINTMENTS, DATA_MONTH, HCP_TYPE, REGION_NAME,
    TIME_BETWEEN_BOOK_AND_APPT, TOTAL_APPOINTMENTS,
};
use gpa_model::{FigureSet, SummaryTables};
use gpa_transform::{f64_values, has_column, string_values};
use polars::prelude::DataFrame;
use tracing::{debug, info, warn};

use crate::charts::{
    ChartLabels, ChartSeries, horizontal_bar_chart, line_chart, stacked_bar_chart,
    vertical_bar_chart,
};
use crate::error::Result;
use crate::theme::ChartTheme;

pub const MONTHLY_APPOINTMENTS_BY_STATUS: &str = "monthly_appointments_by_status";
pub const HCP_TYPE_DISTRIBUTION: &str = "hcp_type_distribution";
pub const APPOINTMENT_MODE_TRENDS: &str = "appointment_mode_trends";
pub const REGIONAL_DISTRIBUTION: &str = "regional_distribution";
pub const BOOKING_TIME_ANALYSIS: &str = "booking_time_analysis";

/// Bars shown in the HCP type chart.
const HCP_TOP_N: usize = 10;

/// Builds one figure per summary table that is present with its expected
/// columns. Tables of the wrong shape are skipped with a warning.
pub fn build_figures(summaries: &SummaryTables, theme: &ChartTheme) -> Result<FigureSet> {
    let mut figures = FigureSet::new();

    if let Some(table) = usable(
        summaries,
        SummaryTables::MONTHLY_BY_STATUS,
        &[DATA_MONTH, APPT_STATUS, COUNT_OF_APPOINTMENTS],
    ) {
        let (months, series) = pivot(table, DATA_MONTH, APPT_STATUS, COUNT_OF_APPOINTMENTS)?;
        let labels = ChartLabels {
            title: "Monthly Appointments by Status",
            x_label: "Month",
            y_label: "Number of Appointments",
            legend_title: Some("Appointment Status"),
        };
        figures.insert(
            MONTHLY_APPOINTMENTS_BY_STATUS,
            stacked_bar_chart(&labels, &months, &series, (1200.0, 600.0), theme),
        );
    }

    if let Some(table) = usable(
        summaries,
        SummaryTables::HCP_TYPE_SUMMARY,
        &[HCP_TYPE, TOTAL_APPOINTMENTS],
    ) {
        let mut rows: Vec<(String, f64)> = string_values(table, HCP_TYPE)?
            .into_iter()
            .zip(f64_values(table, TOTAL_APPOINTMENTS)?)
            .map(|(name, total)| (name, total.unwrap_or(0.0)))
            .collect();
        rows.sort_by(|a, b| b.1.total_cmp(&a.1));
        rows.truncate(HCP_TOP_N);
        let (names, totals): (Vec<String>, Vec<f64>) = rows.into_iter().unzip();
        let labels = ChartLabels {
            title: "Total Appointments by Healthcare Professional Type",
            x_label: "Total Appointments",
            y_label: "HCP Type",
            legend_title: None,
        };
        figures.insert(
            HCP_TYPE_DISTRIBUTION,
            horizontal_bar_chart(&labels, &names, &totals, (1000.0, 600.0), theme),
        );
    }

    if let Some(table) = usable(
        summaries,
        SummaryTables::MODE_BY_MONTH,
        &[DATA_MONTH, APPT_MODE, COUNT_OF_APPOINTMENTS],
    ) {
        let (months, series) = pivot(table, DATA_MONTH, APPT_MODE, COUNT_OF_APPOINTMENTS)?;
        let labels = ChartLabels {
            title: "Appointment Mode Trends Across Months",
            x_label: "Month",
            y_label: "Number of Appointments",
            legend_title: Some("Appointment Mode"),
        };
        figures.insert(
            APPOINTMENT_MODE_TRENDS,
            line_chart(&labels, &months, &series, (1200.0, 600.0), theme),
        );
    }

    if let Some(table) = usable(
        summaries,
        SummaryTables::REGIONAL_SUMMARY,
        &[REGION_NAME, TOTAL_APPOINTMENTS],
    ) {
        let regions = string_values(table, REGION_NAME)?;
        let totals = zero_filled(f64_values(table, TOTAL_APPOINTMENTS)?);
        let labels = ChartLabels {
            title: "Total Appointments by Region",
            x_label: "Total Appointments",
            y_label: "Region",
            legend_title: None,
        };
        figures.insert(
            REGIONAL_DISTRIBUTION,
            horizontal_bar_chart(&labels, &regions, &totals, (1200.0, 800.0), theme),
        );
    }

    if let Some(table) = usable(
        summaries,
        SummaryTables::BOOKING_TIME_SUMMARY,
        &[TIME_BETWEEN_BOOK_AND_APPT, COUNT_OF_APPOINTMENTS],
    ) {
        let buckets = string_values(table, TIME_BETWEEN_BOOK_AND_APPT)?;
        let counts = zero_filled(f64_values(table, COUNT_OF_APPOINTMENTS)?);
        let labels = ChartLabels {
            title: "Appointments by Time Between Booking and Appointment",
            x_label: "Time Between Booking and Appointment",
            y_label: "Number of Appointments",
            legend_title: None,
        };
        figures.insert(
            BOOKING_TIME_ANALYSIS,
            vertical_bar_chart(&labels, &buckets, &counts, (1000.0, 600.0), theme),
        );
    }

    info!(figures = figures.len(), "Created visualizations");
    Ok(figures)
}

/// Returns the named table if it exists and has all `columns`.
fn usable<'a>(summaries: &'a SummaryTables, name: &str, columns: &[&str]) -> Option<&'a DataFrame> {
    let Some(table) = summaries.get(name) else {
        debug!(table = name, "Summary table absent, figure skipped");
        return None;
    };
    if let Some(missing) = columns.iter().find(|column| !has_column(table, column)) {
        warn!(table = name, column = %missing, "Summary table lacks column, figure skipped");
        return None;
    }
    Some(table)
}

fn zero_filled(values: Vec<Option<f64>>) -> Vec<f64> {
    values.into_iter().map(|v| v.unwrap_or(0.0)).collect()
}

/// Long to wide: one category per distinct `index` value, one series per
/// distinct `columns` value, missing combinations filled with zero.
///
/// Categories and series keep their first-seen order.
fn pivot(
    df: &DataFrame,
    index: &str,
    columns: &str,
    values: &str,
) -> Result<(Vec<String>, Vec<ChartSeries>)> {
    let index_values = string_values(df, index)?;
    let column_values = string_values(df, columns)?;
    let numbers = f64_values(df, values)?;

    let mut categories: Vec<String> = Vec::new();
    let mut series: Vec<ChartSeries> = Vec::new();
    for ((category, name), value) in index_values.into_iter().zip(column_values).zip(numbers) {
        let cat_idx = match categories.iter().position(|c| *c == category) {
            Some(idx) => idx,
            None => {
                categories.push(category);
                for entry in &mut series {
                    entry.values.push(0.0);
                }
                categories.len() - 1
            }
        };
        let series_idx = match series.iter().position(|s| s.name == name) {
            Some(idx) => idx,
            None => {
                series.push(ChartSeries {
                    name,
                    values: vec![0.0; categories.len()],
                });
                series.len() - 1
            }
        };
        series[series_idx].values[cat_idx] += value.unwrap_or(0.0);
    }
    Ok((categories, series))
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{NamedFrom, Series};

    fn monthly_by_status() -> DataFrame {
        DataFrame::new(vec![
            Series::new(DATA_MONTH.into(), vec!["Jul", "Jul", "Jun"]).into(),
            Series::new(APPT_STATUS.into(), vec!["Attended", "DNA", "Attended"]).into(),
            Series::new(COUNT_OF_APPOINTMENTS.into(), vec![7i64, 3, 5]).into(),
        ])
        .unwrap()
    }

    #[test]
    fn test_pivot_fills_missing_with_zero() {
        let (months, series) =
            pivot(&monthly_by_status(), DATA_MONTH, APPT_STATUS, COUNT_OF_APPOINTMENTS).unwrap();
        assert_eq!(months, vec!["Jul", "Jun"]);
        assert_eq!(series[0].name, "Attended");
        assert_eq!(series[0].values, vec![7.0, 5.0]);
        assert_eq!(series[1].name, "DNA");
        assert_eq!(series[1].values, vec![3.0, 0.0]);
    }

    #[test]
    fn test_figures_follow_present_tables() {
        let mut summaries = SummaryTables::new();
        summaries.insert(SummaryTables::MONTHLY_BY_STATUS, monthly_by_status());
        summaries.insert(
            SummaryTables::BOOKING_TIME_SUMMARY,
            DataFrame::new(vec![
                Series::new(TIME_BETWEEN_BOOK_AND_APPT.into(), vec!["Same Day"]).into(),
                Series::new(COUNT_OF_APPOINTMENTS.into(), vec![10i64]).into(),
            ])
            .unwrap(),
        );
        // wrong shape
        summaries.insert(
            SummaryTables::REGIONAL_SUMMARY,
            DataFrame::new(vec![Series::new(REGION_NAME.into(), vec!["London"]).into()]).unwrap(),
        );

        let figures = build_figures(&summaries, &ChartTheme::default()).unwrap();
        let names: Vec<&str> = figures.names().collect();
        assert_eq!(names, vec![BOOKING_TIME_ANALYSIS, MONTHLY_APPOINTMENTS_BY_STATUS]);
        assert_eq!(
            figures.get(MONTHLY_APPOINTMENTS_BY_STATUS).unwrap().title,
            "Monthly Appointments by Status"
        );
    }

    #[test]
    fn test_hcp_chart_keeps_top_ten() {
        let names: Vec<String> = (0..12).map(|idx| format!("Role {idx}")).collect();
        let totals: Vec<f64> = (0..12).map(f64::from).collect();
        let mut summaries = SummaryTables::new();
        summaries.insert(
            SummaryTables::HCP_TYPE_SUMMARY,
            DataFrame::new(vec![
                Series::new(HCP_TYPE.into(), names).into(),
                Series::new(TOTAL_APPOINTMENTS.into(), totals).into(),
            ])
            .unwrap(),
        );

        let figures = build_figures(&summaries, &ChartTheme::default()).unwrap();
        let svg = &figures.get(HCP_TYPE_DISTRIBUTION).unwrap().svg;
        assert!(svg.contains(">Role 11</text>"));
        assert!(svg.contains(">Role 2</text>"));
        assert!(!svg.contains(">Role 1</text>"));
        assert!(!svg.contains(">Role 0</text>"));
    }
}
