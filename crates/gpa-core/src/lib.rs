//! Pipeline engine and the GP appointments analysis run.
//!
//! Stages implement [`Stage`]: each declares its input and output context keys
//! in a [`StageDescriptor`] and transforms a [`PipelineContext`]. A
//! [`Pipeline`] checks that every input is produced upstream before running
//! anything, then executes its stages strictly in order.
//!
//! ```text
//! data_extraction -> data_loading -> data_joining -> summarisation -> graphing -> output
//! ```

pub mod analysis;
pub mod context;
pub mod error;
pub mod keys;
pub mod pipeline;
pub mod stage;
pub mod stages;
pub mod value;

pub use analysis::{AnalysisOutcome, analysis_pipeline, generate_run_id, run_analysis};
pub use context::PipelineContext;
pub use error::{PipelineError, Result};
pub use pipeline::{Pipeline, RunSummary, StageTiming};
pub use stage::{Stage, StageDescriptor};
pub use value::{ContextValue, FromContextValue};
