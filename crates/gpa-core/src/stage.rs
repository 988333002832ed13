//! Stage contract.

use crate::context::PipelineContext;
use crate::error::{PipelineError, Result};
use crate::value::{ContextValue, FromContextValue};

/// Name and context keys a stage reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageDescriptor {
    name: String,
    inputs: Vec<String>,
    outputs: Vec<String>,
}

impl StageDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    #[must_use]
    pub fn input(mut self, key: impl Into<String>) -> Self {
        self.inputs.push(key.into());
        self
    }

    #[must_use]
    pub fn output(mut self, key: impl Into<String>) -> Self {
        self.outputs.push(key.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    fn missing(&self, key: &str) -> PipelineError {
        PipelineError::MissingInput {
            stage: self.name.clone(),
            key: key.to_string(),
        }
    }

    /// Values of every declared input, in declaration order.
    pub fn input_values(&self, context: &PipelineContext) -> Result<Vec<ContextValue>> {
        self.inputs
            .iter()
            .map(|key| context.get(key).map_err(|_| self.missing(key)))
            .collect()
    }

    /// Value of the declared input `key` converted to `T`.
    pub fn input_as<T: FromContextValue>(&self, context: &PipelineContext, key: &str) -> Result<T> {
        if !self.inputs.iter().any(|input| input == key) || !context.contains(key) {
            return Err(self.missing(key));
        }
        context.get_as(key)
    }

    /// Stores `value` under a declared output key.
    pub fn store(
        &self,
        context: &mut PipelineContext,
        key: &str,
        value: impl Into<ContextValue>,
    ) -> Result<()> {
        if !self.outputs.iter().any(|output| output == key) {
            return Err(PipelineError::UndeclaredOutput {
                stage: self.name.clone(),
                key: key.to_string(),
            });
        }
        context.set(key, value);
        Ok(())
    }
}

/// One step of a pipeline.
///
/// `execute` reads the declared inputs from the context, writes results under
/// the declared outputs and hands the context on. Errors abort the run.
pub trait Stage {
    fn descriptor(&self) -> &StageDescriptor;

    fn execute(&self, context: PipelineContext) -> anyhow::Result<PipelineContext>;

    fn name(&self) -> &str {
        self.descriptor().name()
    }
}
