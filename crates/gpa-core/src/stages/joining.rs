use gpa_model::RawTables;
use gpa_transform::join_monthly_data;

use crate::context::PipelineContext;
use crate::keys::{COMBINED_DATA, RAW_DATA};
use crate::stage::{Stage, StageDescriptor};

/// Concatenates the monthly tables and joins the lookup geography.
pub struct JoiningStage {
    descriptor: StageDescriptor,
}

impl JoiningStage {
    pub const NAME: &'static str = "data_joining";

    pub fn new() -> Self {
        Self {
            descriptor: StageDescriptor::new(Self::NAME)
                .input(RAW_DATA)
                .output(COMBINED_DATA),
        }
    }
}

impl Default for JoiningStage {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for JoiningStage {
    fn descriptor(&self) -> &StageDescriptor {
        &self.descriptor
    }

    fn execute(&self, mut context: PipelineContext) -> anyhow::Result<PipelineContext> {
        let raw: RawTables = self.descriptor.input_as(&context, RAW_DATA)?;
        let combined = join_monthly_data(&raw)?;
        self.descriptor.store(&mut context, COMBINED_DATA, combined)?;
        Ok(context)
    }
}
