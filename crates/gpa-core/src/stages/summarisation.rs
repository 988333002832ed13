use gpa_transform::summarise;
use polars::prelude::DataFrame;

use crate::context::PipelineContext;
use crate::keys::{COMBINED_DATA, SUMMARY_STATISTICS};
use crate::stage::{Stage, StageDescriptor};

/// Aggregates the combined table into summary and KPI tables.
pub struct SummarisationStage {
    descriptor: StageDescriptor,
}

impl SummarisationStage {
    pub const NAME: &'static str = "summarisation";

    pub fn new() -> Self {
        Self {
            descriptor: StageDescriptor::new(Self::NAME)
                .input(COMBINED_DATA)
                .output(SUMMARY_STATISTICS),
        }
    }
}

impl Default for SummarisationStage {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for SummarisationStage {
    fn descriptor(&self) -> &StageDescriptor {
        &self.descriptor
    }

    fn execute(&self, mut context: PipelineContext) -> anyhow::Result<PipelineContext> {
        let combined: DataFrame = self.descriptor.input_as(&context, COMBINED_DATA)?;
        let summaries = summarise(&combined)?;
        self.descriptor
            .store(&mut context, SUMMARY_STATISTICS, summaries)?;
        Ok(context)
    }
}
