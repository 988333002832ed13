//! Combining monthly tables and enriching them with practice geography.

use std::collections::BTreeMap;

use gpa_model::RawTables;
use gpa_model::columns::{DATA_MONTH, GP_CODE, LOOKUP_COLUMNS};
use polars::prelude::{
    DataFrame, DataType, IntoLazy, LazyFrame, NamedFrom, Series, UnionArgs, concat_lf_diagonal,
};
use tracing::{info, warn};

use crate::error::{Result, TransformError};
use crate::frame::{has_column, string_values};

/// Suffix given to lookup columns that clash with a monthly column.
const LOOKUP_SUFFIX: &str = "_mapping";

/// Concatenates every monthly table, tagging rows with their dataset name in
/// `data_month`, then left-joins the lookup on `gp_code`.
///
/// Monthly tables are matched by column name, so header order may differ
/// between months, and numeric columns widen to a common type. A column
/// missing from one month is null for its rows. The
/// result has exactly one row per monthly row. Duplicate practice codes in the
/// lookup keep their first row.
pub fn join_monthly_data(raw: &RawTables) -> Result<DataFrame> {
    if raw.monthly.is_empty() {
        return Err(TransformError::NoMonthlyData);
    }
    let tagged = raw
        .monthly
        .iter()
        .map(|(month, df)| tag_month(df, month).map(IntoLazy::lazy))
        .collect::<Result<Vec<LazyFrame>>>()?;

    let args = UnionArgs {
        to_supertypes: true,
        ..UnionArgs::default()
    };
    let mut combined = concat_lf_diagonal(tagged, args)
        .and_then(LazyFrame::collect)
        .map_err(|e| TransformError::DataFrame {
            message: format!("concatenate monthly data: {e}"),
        })?;
    combined.as_single_chunk_par();
    info!(
        rows = combined.height(),
        columns = combined.width(),
        "Combined monthly data"
    );

    let Some(lookup) = raw.lookup.as_ref() else {
        warn!("No lookup data available for joining");
        return Ok(combined);
    };

    attach_lookup(&mut combined, lookup)?;
    info!(
        rows = combined.height(),
        columns = combined.width(),
        "Joined lookup data"
    );
    Ok(combined)
}

fn tag_month(df: &DataFrame, month: &str) -> Result<DataFrame> {
    let mut tagged = df.clone();
    if has_column(&tagged, GP_CODE) {
        let codes = tagged.column(GP_CODE)?.cast(&DataType::String)?;
        tagged.with_column(codes)?;
    }
    tagged.with_column(Series::new(DATA_MONTH.into(), vec![month; df.height()]))?;
    Ok(tagged)
}

fn attach_lookup(combined: &mut DataFrame, lookup: &DataFrame) -> Result<()> {
    for (table, df) in [("combined data", &*combined), ("lookup", lookup)] {
        if !has_column(df, GP_CODE) {
            return Err(TransformError::MissingColumn {
                table: table.to_string(),
                column: GP_CODE.to_string(),
            });
        }
    }

    let lookup_codes = string_values(lookup, GP_CODE)?;
    let mut first_row: BTreeMap<&str, usize> = BTreeMap::new();
    let mut duplicates = 0usize;
    for (idx, code) in lookup_codes.iter().enumerate() {
        let code = code.trim();
        if code.is_empty() {
            continue;
        }
        if first_row.contains_key(code) {
            duplicates += 1;
        } else {
            first_row.insert(code, idx);
        }
    }
    if duplicates > 0 {
        warn!(duplicates, "Lookup has duplicate practice codes, keeping first");
    }

    let row_codes = string_values(combined, GP_CODE)?;
    let matched: Vec<Option<usize>> = row_codes
        .iter()
        .map(|code| first_row.get(code.trim()).copied())
        .collect();

    for column in &LOOKUP_COLUMNS[1..] {
        if !has_column(lookup, column) {
            warn!(column = %column, "Lookup column missing, skipped");
            continue;
        }
        let source = string_values(lookup, column)?;
        let values: Vec<Option<&str>> = matched
            .iter()
            .map(|row| row.map(|idx| source[idx].as_str()).filter(|v| !v.is_empty()))
            .collect();
        let name = if has_column(combined, column) {
            format!("{column}{LOOKUP_SUFFIX}")
        } else {
            (*column).to_string()
        };
        combined.with_column(Series::new(name.as_str().into(), values))?;
    }
    Ok(())
}
