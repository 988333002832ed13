//! Appointment KPI metrics.

use gpa_model::columns::{METRIC, VALUE};
use polars::prelude::{DataFrame, NamedFrom, Series};

use crate::error::Result;
use crate::frame::{f64_values, string_values};

/// Headline appointment counts and the rates derived from them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyMetrics {
    pub total_appointments: f64,
    pub dna_rate: f64,
    pub completion_rate: f64,
    pub dna_count: f64,
    pub attended_count: f64,
}

impl KeyMetrics {
    const TOTAL: &'static str = "total_appointments";
    const DNA_RATE: &'static str = "dna_rate";
    const COMPLETION_RATE: &'static str = "completion_rate";
    const DNA_COUNT: &'static str = "dna_count";
    const ATTENDED_COUNT: &'static str = "attended_count";

    /// Derives rates from counts. A zero total yields zero rates.
    #[must_use]
    pub fn from_counts(total: f64, attended: f64, dna: f64) -> Self {
        let rate = |numerator: f64| if total > 0.0 { numerator / total } else { 0.0 };
        Self {
            total_appointments: total,
            dna_rate: rate(dna),
            completion_rate: rate(attended),
            dna_count: dna,
            attended_count: attended,
        }
    }

    fn rows(&self) -> [(&'static str, f64); 5] {
        [
            (Self::TOTAL, self.total_appointments),
            (Self::DNA_RATE, self.dna_rate),
            (Self::COMPLETION_RATE, self.completion_rate),
            (Self::DNA_COUNT, self.dna_count),
            (Self::ATTENDED_COUNT, self.attended_count),
        ]
    }

    /// Two-column `metric`/`value` table.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let (metrics, values): (Vec<&str>, Vec<f64>) = self.rows().into_iter().unzip();
        Ok(DataFrame::new(vec![
            Series::new(METRIC.into(), metrics).into(),
            Series::new(VALUE.into(), values).into(),
        ])?)
    }

    /// Reads metrics back from a table produced by [`KeyMetrics::to_frame`].
    ///
    /// Returns `None` when any metric row is missing or non-numeric.
    pub fn from_frame(df: &DataFrame) -> Result<Option<Self>> {
        let names = string_values(df, METRIC)?;
        let values = f64_values(df, VALUE)?;
        let lookup = |metric: &str| {
            names
                .iter()
                .position(|name| name == metric)
                .and_then(|idx| values[idx])
        };
        let (Some(total), Some(dna_rate), Some(completion_rate), Some(dna), Some(attended)) = (
            lookup(Self::TOTAL),
            lookup(Self::DNA_RATE),
            lookup(Self::COMPLETION_RATE),
            lookup(Self::DNA_COUNT),
            lookup(Self::ATTENDED_COUNT),
        ) else {
            return Ok(None);
        };
        Ok(Some(Self {
            total_appointments: total,
            dna_rate,
            completion_rate,
            dna_count: dna,
            attended_count: attended,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rates_from_counts() {
        let metrics = KeyMetrics::from_counts(10.0, 7.0, 3.0);
        assert!((metrics.completion_rate - 0.7).abs() < 1e-12);
        assert!((metrics.dna_rate - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_zero_total_gives_zero_rates() {
        let metrics = KeyMetrics::from_counts(0.0, 0.0, 0.0);
        assert_eq!(metrics.completion_rate, 0.0);
        assert_eq!(metrics.dna_rate, 0.0);
    }

    #[test]
    fn test_frame_round_trip() {
        let metrics = KeyMetrics::from_counts(12.0, 9.0, 2.0);
        let frame = metrics.to_frame().unwrap();
        assert_eq!(frame.height(), 5);
        assert_eq!(
            string_values(&frame, METRIC).unwrap()[0],
            "total_appointments"
        );
        assert_eq!(KeyMetrics::from_frame(&frame).unwrap(), Some(metrics));
    }
}
