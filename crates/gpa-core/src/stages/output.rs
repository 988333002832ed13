use std::sync::Arc;

use gpa_model::{AnalysisConfig, FigureSet, SummaryTables};
use gpa_report::write_outputs;
use polars::prelude::DataFrame;

use crate::context::PipelineContext;
use crate::keys::{COMBINED_DATA, FIGURES, OUTPUT_FILES, SUMMARY_STATISTICS};
use crate::stage::{Stage, StageDescriptor};

/// Writes the combined table, summaries, figures and the run report.
pub struct OutputStage {
    descriptor: StageDescriptor,
    config: Arc<AnalysisConfig>,
}

impl OutputStage {
    pub const NAME: &'static str = "output";

    pub fn new(config: Arc<AnalysisConfig>) -> Self {
        Self {
            descriptor: StageDescriptor::new(Self::NAME)
                .input(COMBINED_DATA)
                .input(SUMMARY_STATISTICS)
                .input(FIGURES)
                .output(OUTPUT_FILES),
            config,
        }
    }
}

impl Stage for OutputStage {
    fn descriptor(&self) -> &StageDescriptor {
        &self.descriptor
    }

    fn execute(&self, mut context: PipelineContext) -> anyhow::Result<PipelineContext> {
        let combined: DataFrame = self.descriptor.input_as(&context, COMBINED_DATA)?;
        let summaries: SummaryTables = self.descriptor.input_as(&context, SUMMARY_STATISTICS)?;
        let figures: FigureSet = self.descriptor.input_as(&context, FIGURES)?;

        let manifest = write_outputs(&self.config, &combined, &summaries, &figures)?;
        self.descriptor.store(&mut context, OUTPUT_FILES, manifest)?;
        Ok(context)
    }
}
