//! Chart building and run output generation.
//!
//! Charts are built as SVG documents ([`build_figures`]) and written either as
//! SVG or rasterised to PNG with `resvg` ([`FigureRenderer`]). Tables are
//! written as CSV and a plain-text run report summarises the whole output.

mod charts;
mod error;
mod figures;
mod format;
mod output;
mod render;
mod report;
mod svg;
mod tables;
mod theme;

pub use charts::{ChartLabels, ChartSeries};
pub use error::{ReportError, Result};
pub use figures::{
    APPOINTMENT_MODE_TRENDS, BOOKING_TIME_ANALYSIS, HCP_TYPE_DISTRIBUTION,
    MONTHLY_APPOINTMENTS_BY_STATUS, REGIONAL_DISTRIBUTION, build_figures,
};
pub use format::{format_percent, format_thousands};
pub use output::write_outputs;
pub use render::FigureRenderer;
pub use report::{REPORT_TITLE, ReportData, render_report};
pub use tables::write_table_csv;
pub use theme::ChartTheme;
