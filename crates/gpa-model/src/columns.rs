//! Normalized column names.
//!
//! Source headers are normalized to snake_case on load, so `GP_CODE` and
//! `Gp Code` both arrive as `gp_code`.

/// Practice identifier, the join key between monthly and lookup tables.
pub const GP_CODE: &str = "gp_code";
pub const APPT_STATUS: &str = "appt_status";
pub const APPT_MODE: &str = "appt_mode";
pub const HCP_TYPE: &str = "hcp_type";
pub const TIME_BETWEEN_BOOK_AND_APPT: &str = "time_between_book_and_appt";
pub const COUNT_OF_APPOINTMENTS: &str = "count_of_appointments";

/// Source month tag added while joining.
pub const DATA_MONTH: &str = "data_month";

pub const ICB_CODE: &str = "icb_code";
pub const ICB_NAME: &str = "icb_name";
pub const REGION_CODE: &str = "region_code";
pub const REGION_NAME: &str = "region_name";

/// Columns selected from the lookup table during the join, key first.
pub const LOOKUP_COLUMNS: [&str; 5] = [GP_CODE, ICB_CODE, ICB_NAME, REGION_CODE, REGION_NAME];

/// Appointment status values used by the KPI metrics.
pub const STATUS_ATTENDED: &str = "Attended";
pub const STATUS_DNA: &str = "DNA";

/// Aggregate column names shared by summaries and charts.
pub const TOTAL_APPOINTMENTS: &str = "total_appointments";
pub const MEAN_APPOINTMENTS: &str = "mean_appointments";
pub const NUMBER_OF_RECORDS: &str = "number_of_records";
pub const METRIC: &str = "metric";
pub const VALUE: &str = "value";
pub const STATISTIC: &str = "statistic";
