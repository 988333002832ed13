//! Transformations over loaded appointment tables.
//!
//! - [`join_monthly_data`]: concatenate monthly tables and enrich them with
//!   geography from the practice lookup
//! - [`summarise`]: grouped aggregates, descriptive statistics and KPI metrics
//!
//! Every function takes frames by reference and returns new frames; inputs are
//! never modified in place.

pub mod describe;
pub mod error;
pub mod frame;
pub mod join;
pub mod metrics;
pub mod summary;

pub use describe::{Describe, describe};
pub use error::{Result, TransformError};
pub use frame::{any_to_f64, any_to_string, f64_values, has_column, string_values};
pub use join::join_monthly_data;
pub use metrics::KeyMetrics;
pub use summary::summarise;
