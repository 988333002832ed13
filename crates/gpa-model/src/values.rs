//! Values passed between pipeline stages.

use std::collections::BTreeMap;
use std::path::PathBuf;

use polars::prelude::DataFrame;

/// Tables produced by the loading stage.
#[derive(Debug, Clone, Default)]
pub struct RawTables {
    /// Monthly tables keyed by dataset name (the source file stem).
    pub monthly: BTreeMap<String, DataFrame>,
    /// Practice lookup table, when one was found.
    pub lookup: Option<DataFrame>,
}

impl RawTables {
    /// Total rows across all monthly tables.
    #[must_use]
    pub fn monthly_row_count(&self) -> usize {
        self.monthly.values().map(DataFrame::height).sum()
    }

    /// Monthly dataset names in name order, followed by `lookup` when present.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.monthly.keys().cloned().collect();
        if self.lookup.is_some() {
            names.push("lookup".to_string());
        }
        names
    }
}

/// Named summary tables computed from the combined dataset.
#[derive(Debug, Clone, Default)]
pub struct SummaryTables {
    tables: BTreeMap<String, DataFrame>,
}

impl SummaryTables {
    pub const MONTHLY_BY_STATUS: &'static str = "monthly_by_status";
    pub const HCP_TYPE_SUMMARY: &'static str = "hcp_type_summary";
    pub const MODE_BY_MONTH: &'static str = "mode_by_month";
    pub const REGIONAL_SUMMARY: &'static str = "regional_summary";
    pub const BOOKING_TIME_SUMMARY: &'static str = "booking_time_summary";
    pub const DESCRIPTIVE_STATS: &'static str = "descriptive_stats";
    pub const KEY_METRICS: &'static str = "key_metrics";

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, table: DataFrame) {
        self.tables.insert(name.into(), table);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DataFrame> {
        self.tables.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DataFrame)> {
        self.tables.iter().map(|(name, df)| (name.as_str(), df))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// A rendered chart held as an SVG document.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub title: String,
    /// Complete SVG document.
    pub svg: String,
    /// Canvas width in SVG user units (100 per inch).
    pub width: f32,
    /// Canvas height in SVG user units.
    pub height: f32,
}

/// Named charts produced by the graphing stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FigureSet {
    figures: BTreeMap<String, Figure>,
}

impl FigureSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, figure: Figure) {
        self.figures.insert(name.into(), figure);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Figure> {
        self.figures.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Figure)> {
        self.figures.iter().map(|(name, figure)| (name.as_str(), figure))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.figures.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.figures.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.figures.is_empty()
    }
}

/// Kind of file written by the output stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum OutputKind {
    CombinedData,
    Summary,
    Figure,
    Report,
}

impl OutputKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CombinedData => "combined data",
            Self::Summary => "summary",
            Self::Figure => "figure",
            Self::Report => "report",
        }
    }
}

/// One written file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    /// Logical name (summary or figure name, `combined_data`, `report`).
    pub name: String,
    pub kind: OutputKind,
    pub path: PathBuf,
}

/// Files written by the output stage, in write order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputManifest {
    pub files: Vec<OutputFile>,
}

impl OutputManifest {
    pub fn push(&mut self, name: impl Into<String>, kind: OutputKind, path: PathBuf) {
        self.files.push(OutputFile {
            name: name.into(),
            kind,
            path,
        });
    }

    /// Files of one kind, in write order.
    pub fn of_kind(&self, kind: OutputKind) -> impl Iterator<Item = &OutputFile> {
        self.files.iter().filter(move |file| file.kind == kind)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
