//! Summary tables over the combined dataset.

use gpa_model::SummaryTables;
use gpa_model::columns::{
    APPT_MODE, APPT_STATUS, COUNT_OF_APPOINTMENTS, DATA_MONTH, HCP_TYPE, MEAN_APPOINTMENTS,
    NUMBER_OF_RECORDS, REGION_NAME, STATISTIC, STATUS_ATTENDED, STATUS_DNA,
    TIME_BETWEEN_BOOK_AND_APPT, TOTAL_APPOINTMENTS,
};
use polars::prelude::*;
use tracing::{debug, info, warn};

use crate::describe::{Describe, describe};
use crate::error::{Result, TransformError};
use crate::frame::{any_to_f64, has_column};
use crate::metrics::KeyMetrics;

/// Computes every summary table the combined data supports.
///
/// The count column and `hcp_type` are required. `hcp_type_summary` and
/// `descriptive_stats` are always produced; every other table is skipped with a
/// warning when one of its key columns is absent (`key_metrics` needs
/// `appt_status`). Grouped tables are sorted by their key columns.
pub fn summarise(combined: &DataFrame) -> Result<SummaryTables> {
    require(combined, COUNT_OF_APPOINTMENTS)?;
    require(combined, HCP_TYPE)?;
    let mut summaries = SummaryTables::new();

    insert_grouped_sum(
        &mut summaries,
        SummaryTables::MONTHLY_BY_STATUS,
        combined,
        &[DATA_MONTH, APPT_STATUS],
    )?;

    let hcp = combined
        .clone()
        .lazy()
        .group_by([col(HCP_TYPE)])
        .agg([
            col(COUNT_OF_APPOINTMENTS).sum().alias(TOTAL_APPOINTMENTS),
            col(COUNT_OF_APPOINTMENTS)
                .mean()
                .alias(MEAN_APPOINTMENTS),
            col(COUNT_OF_APPOINTMENTS).count().alias(NUMBER_OF_RECORDS),
        ])
        .sort([HCP_TYPE], SortMultipleOptions::default())
        .collect()?;
    summaries.insert(SummaryTables::HCP_TYPE_SUMMARY, hcp);

    insert_grouped_sum(
        &mut summaries,
        SummaryTables::MODE_BY_MONTH,
        combined,
        &[APPT_MODE, DATA_MONTH],
    )?;

    if has_column(combined, REGION_NAME) {
        let regional = combined
            .clone()
            .lazy()
            .filter(col(REGION_NAME).is_not_null())
            .group_by([col(REGION_NAME)])
            .agg([
                col(COUNT_OF_APPOINTMENTS).sum().alias(TOTAL_APPOINTMENTS),
                col(COUNT_OF_APPOINTMENTS)
                    .mean()
                    .alias(MEAN_APPOINTMENTS),
            ])
            .sort([REGION_NAME], SortMultipleOptions::default())
            .collect()?;
        summaries.insert(SummaryTables::REGIONAL_SUMMARY, regional);
    } else {
        debug!("No region column, regional summary skipped");
    }

    insert_grouped_sum(
        &mut summaries,
        SummaryTables::BOOKING_TIME_SUMMARY,
        combined,
        &[TIME_BETWEEN_BOOK_AND_APPT],
    )?;

    summaries.insert(
        SummaryTables::DESCRIPTIVE_STATS,
        descriptive_stats(combined)?,
    );

    if has_column(combined, APPT_STATUS) {
        let metrics = key_metrics(combined)?;
        info!(
            total = metrics.total_appointments,
            dna_rate = metrics.dna_rate,
            completion_rate = metrics.completion_rate,
            "Key metrics"
        );
        summaries.insert(SummaryTables::KEY_METRICS, metrics.to_frame()?);
    }

    info!(tables = summaries.len(), "Created summary tables");
    Ok(summaries)
}

fn require(df: &DataFrame, column: &str) -> Result<()> {
    if has_column(df, column) {
        Ok(())
    } else {
        Err(TransformError::MissingColumn {
            table: "combined data".to_string(),
            column: column.to_string(),
        })
    }
}

fn insert_grouped_sum(
    summaries: &mut SummaryTables,
    name: &str,
    df: &DataFrame,
    keys: &[&str],
) -> Result<()> {
    if let Some(missing) = keys.iter().find(|key| !has_column(df, key)) {
        warn!(summary = name, column = %missing, "Column not found, summary skipped");
        return Ok(());
    }
    summaries.insert(name, grouped_sum(df, keys)?);
    Ok(())
}

/// Sum of the count column per distinct key combination.
fn grouped_sum(df: &DataFrame, keys: &[&str]) -> Result<DataFrame> {
    let summary = df
        .clone()
        .lazy()
        .group_by(keys.iter().map(|key| col(*key)).collect::<Vec<_>>())
        .agg([col(COUNT_OF_APPOINTMENTS).sum()])
        .sort(keys.to_vec(), SortMultipleOptions::default())
        .collect()?;
    Ok(summary)
}

fn descriptive_stats(df: &DataFrame) -> Result<DataFrame> {
    let stats: Vec<Option<f64>> = match describe(df, COUNT_OF_APPOINTMENTS)? {
        Some(stats) => stats.values().to_vec(),
        None => {
            let mut empty = vec![None; Describe::LABELS.len()];
            empty[0] = Some(0.0);
            empty
        }
    };
    Ok(DataFrame::new(vec![
        Series::new(STATISTIC.into(), Describe::LABELS.to_vec()).into(),
        Series::new(COUNT_OF_APPOINTMENTS.into(), stats).into(),
    ])?)
}

fn key_metrics(df: &DataFrame) -> Result<KeyMetrics> {
    let count = || col(COUNT_OF_APPOINTMENTS).cast(DataType::Float64);
    let sums = df
        .clone()
        .lazy()
        .select([
            count().sum().alias("total"),
            count()
                .filter(col(APPT_STATUS).eq(lit(STATUS_ATTENDED)))
                .sum()
                .alias("attended"),
            count()
                .filter(col(APPT_STATUS).eq(lit(STATUS_DNA)))
                .sum()
                .alias("dna"),
        ])
        .collect()?;
    let scalar = |name: &str| -> Result<f64> {
        Ok(any_to_f64(sums.column(name)?.get(0)?).unwrap_or(0.0))
    };
    Ok(KeyMetrics::from_counts(
        scalar("total")?,
        scalar("attended")?,
        scalar("dna")?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{f64_values, string_values};
    use gpa_model::columns::{METRIC, VALUE};

    fn combined(with_region: bool) -> DataFrame {
        let mut df = DataFrame::new(vec![
            Series::new(DATA_MONTH.into(), vec!["jul", "jul", "jun", "jun"]).into(),
            Series::new(
                APPT_STATUS.into(),
                vec!["Attended", "DNA", "Attended", "Attended"],
            )
            .into(),
            Series::new(HCP_TYPE.into(), vec!["GP", "GP", "Nurse", "GP"]).into(),
            Series::new(
                APPT_MODE.into(),
                vec!["Face-to-Face", "Telephone", "Face-to-Face", "Face-to-Face"],
            )
            .into(),
            Series::new(
                TIME_BETWEEN_BOOK_AND_APPT.into(),
                vec!["Same Day", "1 Day", "Same Day", "1 Day"],
            )
            .into(),
            Series::new(COUNT_OF_APPOINTMENTS.into(), vec![4i64, 1, 2, 3]).into(),
        ])
        .unwrap();
        if with_region {
            df.with_column(Series::new(
                REGION_NAME.into(),
                vec![Some("London"), Some("London"), Some("North"), None],
            ))
            .unwrap();
        }
        df
    }

    #[test]
    fn test_summaries_present() {
        let summaries = summarise(&combined(true)).unwrap();
        assert_eq!(summaries.len(), 7);
        assert!(summaries.contains(SummaryTables::REGIONAL_SUMMARY));

        let without_region = summarise(&combined(false)).unwrap();
        assert_eq!(without_region.len(), 6);
        assert!(!without_region.contains(SummaryTables::REGIONAL_SUMMARY));
    }

    #[test]
    fn test_monthly_by_status_sums() {
        let summaries = summarise(&combined(false)).unwrap();
        let monthly = summaries.get(SummaryTables::MONTHLY_BY_STATUS).unwrap();
        assert_eq!(monthly.height(), 3);
        assert_eq!(
            string_values(monthly, DATA_MONTH).unwrap(),
            vec!["jul", "jul", "jun"]
        );
        assert_eq!(
            f64_values(monthly, COUNT_OF_APPOINTMENTS).unwrap(),
            vec![Some(4.0), Some(1.0), Some(5.0)]
        );
    }

    #[test]
    fn test_hcp_type_summary() {
        let summaries = summarise(&combined(false)).unwrap();
        let hcp = summaries.get(SummaryTables::HCP_TYPE_SUMMARY).unwrap();
        assert_eq!(string_values(hcp, HCP_TYPE).unwrap(), vec!["GP", "Nurse"]);
        assert_eq!(
            f64_values(hcp, TOTAL_APPOINTMENTS).unwrap(),
            vec![Some(8.0), Some(2.0)]
        );
        assert_eq!(
            f64_values(hcp, NUMBER_OF_RECORDS).unwrap(),
            vec![Some(3.0), Some(1.0)]
        );
    }

    #[test]
    fn test_regional_summary_skips_unmatched_rows() {
        let summaries = summarise(&combined(true)).unwrap();
        let regional = summaries.get(SummaryTables::REGIONAL_SUMMARY).unwrap();
        assert_eq!(
            string_values(regional, REGION_NAME).unwrap(),
            vec!["London", "North"]
        );
        assert_eq!(
            f64_values(regional, MEAN_APPOINTMENTS).unwrap(),
            vec![Some(2.5), Some(2.0)]
        );
    }

    #[test]
    fn test_descriptive_stats_and_metrics() {
        let summaries = summarise(&combined(false)).unwrap();
        let stats = summaries.get(SummaryTables::DESCRIPTIVE_STATS).unwrap();
        assert_eq!(
            string_values(stats, STATISTIC).unwrap(),
            Describe::LABELS.to_vec()
        );
        assert_eq!(
            f64_values(stats, COUNT_OF_APPOINTMENTS).unwrap()[1],
            Some(2.5)
        );

        let metrics = summaries.get(SummaryTables::KEY_METRICS).unwrap();
        assert_eq!(string_values(metrics, METRIC).unwrap().len(), 5);
        let parsed = KeyMetrics::from_frame(metrics).unwrap().unwrap();
        assert_eq!(parsed.total_appointments, 10.0);
        assert_eq!(parsed.attended_count, 9.0);
        assert_eq!(parsed.dna_count, 1.0);
        assert!((parsed.completion_rate - 0.9).abs() < 1e-12);
        assert!(f64_values(metrics, VALUE).unwrap().iter().all(Option::is_some));
    }

    #[test]
    fn test_missing_count_column() {
        let df = DataFrame::new(vec![Series::new(HCP_TYPE.into(), vec!["GP"]).into()]).unwrap();
        assert!(matches!(
            summarise(&df),
            Err(TransformError::MissingColumn { .. })
        ));
    }

    #[test]
    fn test_status_tables_skipped_without_status_column() {
        let df = combined(false).drop(APPT_STATUS).unwrap();
        let summaries = summarise(&df).unwrap();
        assert!(!summaries.contains(SummaryTables::MONTHLY_BY_STATUS));
        assert!(!summaries.contains(SummaryTables::KEY_METRICS));
        assert!(summaries.contains(SummaryTables::MODE_BY_MONTH));
        assert_eq!(summaries.len(), 4);
    }
}
