//! Validated, strictly ordered stage execution.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use tracing::{error, info, info_span};

use crate::context::PipelineContext;
use crate::error::{PipelineError, Result};
use crate::stage::{Stage, StageDescriptor};

/// Wall-clock time spent in one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageTiming {
    pub name: String,
    pub duration: Duration,
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: String,
    pub stages: Vec<StageTiming>,
    pub total: Duration,
    /// Context after the last stage.
    pub context: PipelineContext,
}

/// An ordered list of stages plus the context every run starts from.
pub struct Pipeline {
    name: String,
    stages: Vec<Box<dyn Stage>>,
    seed: PipelineContext,
}

impl Pipeline {
    pub fn new(name: impl Into<String>, stages: Vec<Box<dyn Stage>>) -> Self {
        Self {
            name: name.into(),
            stages,
            seed: PipelineContext::new(),
        }
    }

    /// Values present in the context before the first stage runs.
    #[must_use]
    pub fn with_seed(mut self, seed: PipelineContext) -> Self {
        self.seed = seed;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &StageDescriptor> {
        self.stages.iter().map(|stage| stage.descriptor())
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Checks the stage list without running anything.
    ///
    /// Every input must be seeded or produced by an earlier stage, stage names
    /// must be unique and every stage must declare at least one output.
    pub fn validate(&self) -> Result<()> {
        let mut available: BTreeSet<&str> = self.seed.keys().collect();
        let mut names = BTreeSet::new();

        for descriptor in self.descriptors() {
            let stage = descriptor.name();
            if !names.insert(stage) {
                return Err(PipelineError::DuplicateStage {
                    stage: stage.to_string(),
                });
            }
            if descriptor.outputs().is_empty() {
                return Err(PipelineError::NoOutputs {
                    stage: stage.to_string(),
                });
            }
            if let Some(key) = descriptor
                .inputs()
                .iter()
                .find(|key| !available.contains(key.as_str()))
            {
                return Err(PipelineError::Dependency {
                    stage: stage.to_string(),
                    key: key.clone(),
                });
            }
            available.extend(descriptor.outputs().iter().map(String::as_str));
        }

        info!(pipeline = %self.name, stages = self.stages.len(), "Pipeline validation successful");
        Ok(())
    }

    /// Runs every stage in order on a fresh copy of the seed context.
    ///
    /// The first stage error stops the run. Files written by earlier stages
    /// stay on disk.
    pub fn run(&self, run_id: &str) -> Result<RunSummary> {
        let _span = info_span!("pipeline", name = %self.name, run_id = %run_id).entered();
        info!(stages = self.stages.len(), "Starting pipeline run");

        let started = Instant::now();
        let mut context = self.seed.clone();
        let mut timings = Vec::with_capacity(self.stages.len());

        for (index, stage) in self.stages.iter().enumerate() {
            let name = stage.name();
            let _stage_span = info_span!("stage", name = %name).entered();
            info!(
                step = index + 1,
                of = self.stages.len(),
                "Starting stage"
            );

            let stage_start = Instant::now();
            context = match stage.execute(context) {
                Ok(next) => next,
                Err(source) => {
                    let message = format!("{source:#}");
                    error!(
                        duration_ms = stage_start.elapsed().as_millis() as u64,
                        error = %message,
                        "Stage failed"
                    );
                    return Err(PipelineError::StageFailed {
                        stage: name.to_string(),
                        source,
                    });
                }
            };
            let duration = stage_start.elapsed();
            info!(duration_ms = duration.as_millis() as u64, "Stage completed");
            timings.push(StageTiming {
                name: name.to_string(),
                duration,
            });
        }

        let total = started.elapsed();
        info!(duration_ms = total.as_millis() as u64, "Pipeline run completed");
        Ok(RunSummary {
            run_id: run_id.to_string(),
            stages: timings,
            total,
            context,
        })
    }
}
