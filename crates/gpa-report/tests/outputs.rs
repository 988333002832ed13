//! Output writing from summaries to files on disk.

use gpa_model::columns::{
    APPT_MODE, APPT_STATUS, COUNT_OF_APPOINTMENTS, DATA_MONTH, GP_CODE, HCP_TYPE, REGION_NAME,
    TIME_BETWEEN_BOOK_AND_APPT,
};
use gpa_model::{AnalysisConfig, FigureFormat, OutputKind};
use gpa_report::{ChartTheme, REPORT_TITLE, build_figures, write_outputs};
use gpa_transform::summarise;
use polars::prelude::{DataFrame, NamedFrom, Series};
use tempfile::TempDir;

fn combined() -> DataFrame {
    DataFrame::new(vec![
        Series::new(GP_CODE.into(), vec!["A81001", "A81002", "A81001"]).into(),
        Series::new(DATA_MONTH.into(), vec!["jul_25"; 3]).into(),
        Series::new(APPT_STATUS.into(), vec!["Attended", "DNA", "Attended"]).into(),
        Series::new(HCP_TYPE.into(), vec!["GP", "GP", "Nurse"]).into(),
        Series::new(APPT_MODE.into(), vec!["Face-to-Face", "Telephone", "Face-to-Face"]).into(),
        Series::new(
            TIME_BETWEEN_BOOK_AND_APPT.into(),
            vec!["Same Day", "1 Day", "Same Day"],
        )
        .into(),
        Series::new(COUNT_OF_APPOINTMENTS.into(), vec![6i64, 2, 2]).into(),
        Series::new(REGION_NAME.into(), vec!["London"; 3]).into(),
    ])
    .unwrap()
}

#[test]
fn writes_tables_figures_and_report() {
    let dir = TempDir::new().unwrap();
    let config =
        AnalysisConfig::layout(dir.path().join("data"), dir.path().join("figures"), "jul_25")
            .unwrap()
            .with_figure_format(FigureFormat::Svg);
    let data = combined();
    let summaries = summarise(&data).unwrap();
    let figures = build_figures(&summaries, &ChartTheme::default()).unwrap();

    let manifest = write_outputs(&config, &data, &summaries, &figures).unwrap();

    assert_eq!(manifest.of_kind(OutputKind::CombinedData).count(), 1);
    assert_eq!(manifest.of_kind(OutputKind::Summary).count(), summaries.len());
    assert_eq!(manifest.of_kind(OutputKind::Figure).count(), 5);
    assert_eq!(manifest.files.last().unwrap().kind, OutputKind::Report);
    assert!(manifest.files.iter().all(|file| file.path.is_file()));

    let combined_csv =
        std::fs::read_to_string(config.output_dir.join("combined_data.csv")).unwrap();
    assert_eq!(combined_csv.lines().count(), 4);

    let figure = config.figures_dir.join("regional_distribution.svg");
    assert!(std::fs::read_to_string(figure).unwrap().contains("Total Appointments by Region"));

    let report = std::fs::read_to_string(config.report_path()).unwrap();
    assert!(report.starts_with(REPORT_TITLE));
    assert!(report.contains("- Number of unique GP practices: 2"));
    assert!(report.contains("- Total appointments: 10"));
    assert!(report.contains("key_metrics.csv"));
    assert!(report.contains("booking_time_analysis.svg"));
}
