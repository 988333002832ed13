//! Values stored in the pipeline context.

use std::path::PathBuf;

use gpa_model::{FigureSet, OutputManifest, RawTables, SummaryTables};
use polars::prelude::DataFrame;

/// A value produced by one stage for later stages.
#[derive(Debug, Clone)]
pub enum ContextValue {
    Paths(Vec<PathBuf>),
    RawTables(RawTables),
    Table(DataFrame),
    Summaries(SummaryTables),
    Figures(FigureSet),
    Outputs(OutputManifest),
}

impl ContextValue {
    /// Variant name used in type mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Paths(_) => Vec::<PathBuf>::KIND,
            Self::RawTables(_) => RawTables::KIND,
            Self::Table(_) => DataFrame::KIND,
            Self::Summaries(_) => SummaryTables::KIND,
            Self::Figures(_) => FigureSet::KIND,
            Self::Outputs(_) => OutputManifest::KIND,
        }
    }
}

/// Conversion from a context value to the concrete type a stage expects.
pub trait FromContextValue: Sized {
    const KIND: &'static str;

    /// Returns the value back unchanged when it holds another variant.
    fn from_context_value(value: ContextValue) -> std::result::Result<Self, ContextValue>;
}

macro_rules! context_value {
    ($ty:ty, $variant:ident, $kind:literal) => {
        impl FromContextValue for $ty {
            const KIND: &'static str = $kind;

            fn from_context_value(value: ContextValue) -> std::result::Result<Self, ContextValue> {
                match value {
                    ContextValue::$variant(inner) => Ok(inner),
                    other => Err(other),
                }
            }
        }

        impl From<$ty> for ContextValue {
            fn from(value: $ty) -> Self {
                Self::$variant(value)
            }
        }
    };
}

context_value!(Vec<PathBuf>, Paths, "file paths");
context_value!(RawTables, RawTables, "raw tables");
context_value!(DataFrame, Table, "table");
context_value!(SummaryTables, Summaries, "summary tables");
context_value!(FigureSet, Figures, "figures");
context_value!(OutputManifest, Outputs, "output files");
