use gpa_model::SummaryTables;
use gpa_report::{ChartTheme, build_figures};

use crate::context::PipelineContext;
use crate::keys::{FIGURES, SUMMARY_STATISTICS};
use crate::stage::{Stage, StageDescriptor};

/// Builds chart figures from the summary tables.
pub struct GraphingStage {
    descriptor: StageDescriptor,
}

impl GraphingStage {
    pub const NAME: &'static str = "graphing";

    pub fn new() -> Self {
        Self {
            descriptor: StageDescriptor::new(Self::NAME)
                .input(SUMMARY_STATISTICS)
                .output(FIGURES),
        }
    }
}

impl Default for GraphingStage {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for GraphingStage {
    fn descriptor(&self) -> &StageDescriptor {
        &self.descriptor
    }

    fn execute(&self, mut context: PipelineContext) -> anyhow::Result<PipelineContext> {
        let summaries: SummaryTables = self.descriptor.input_as(&context, SUMMARY_STATISTICS)?;
        let theme = ChartTheme::default();
        let figures = build_figures(&summaries, &theme)?;
        self.descriptor.store(&mut context, FIGURES, figures)?;
        Ok(context)
    }
}
