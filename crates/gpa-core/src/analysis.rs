//! The appointments analysis: stage wiring and the top-level run.

use std::sync::Arc;

use chrono::Local;
use gpa_model::AnalysisConfig;
use tracing::{error, info};

use crate::error::PipelineError;
use crate::pipeline::{Pipeline, RunSummary};
use crate::stage::Stage;
use crate::stages::{
    ExtractionStage, GraphingStage, JoiningStage, LoadingStage, OutputStage, SummarisationStage,
};

pub const PIPELINE_NAME: &str = "gp_appointments_analysis";

/// Builds the six-stage analysis pipeline for `config`.
pub fn analysis_pipeline(config: AnalysisConfig) -> Pipeline {
    let config = Arc::new(config);
    let stages: Vec<Box<dyn Stage>> = vec![
        Box::new(ExtractionStage::new(Arc::clone(&config))),
        Box::new(LoadingStage::new(Arc::clone(&config))),
        Box::new(JoiningStage::new()),
        Box::new(SummarisationStage::new()),
        Box::new(GraphingStage::new()),
        Box::new(OutputStage::new(config)),
    ];
    Pipeline::new(PIPELINE_NAME, stages)
}

/// Timestamped identifier for one run, e.g.
/// `gp_appointments_analysis_20250801_093000`.
pub fn generate_run_id() -> String {
    format!("{PIPELINE_NAME}_{}", Local::now().format("%Y%m%d_%H%M%S"))
}

/// How a run ended.
#[derive(Debug)]
pub enum AnalysisOutcome {
    Completed(RunSummary),
    /// The stage list is inconsistent; no stage ran.
    ValidationFailed(PipelineError),
    /// A stage failed; earlier stages completed and their files remain.
    Failed { run_id: String, error: PipelineError },
}

impl AnalysisOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    /// Process exit code: 0 on success, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.is_success() { 0 } else { 1 }
    }
}

/// Validates `pipeline` and runs it under a fresh run identifier.
pub fn run_analysis(pipeline: &Pipeline) -> AnalysisOutcome {
    if let Err(err) = pipeline.validate() {
        error!(error = %err, "Pipeline validation failed");
        return AnalysisOutcome::ValidationFailed(err);
    }

    let run_id = generate_run_id();
    match pipeline.run(&run_id) {
        Ok(summary) => {
            info!(run_id = %run_id, "Analysis completed successfully");
            AnalysisOutcome::Completed(summary)
        }
        Err(err) => {
            error!(run_id = %run_id, error = %err, "Analysis failed");
            AnalysisOutcome::Failed { run_id, error: err }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys;

    #[test]
    fn test_run_id_format() {
        let run_id = generate_run_id();
        let stamp = run_id
            .strip_prefix("gp_appointments_analysis_")
            .unwrap();
        assert_eq!(stamp.len(), 15);
        assert_eq!(stamp.as_bytes()[8], b'_');
        assert!(stamp.chars().filter(|c| *c != '_').all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_analysis_pipeline_is_valid() {
        let config = AnalysisConfig::layout("data", "figures", "jul_25").unwrap();
        let pipeline = analysis_pipeline(config);
        pipeline.validate().unwrap();

        let names: Vec<&str> = pipeline.descriptors().map(|d| d.name()).collect();
        assert_eq!(
            names,
            vec![
                "data_extraction",
                "data_loading",
                "data_joining",
                "summarisation",
                "graphing",
                "output"
            ]
        );
        let last = pipeline.descriptors().last().unwrap();
        assert_eq!(
            last.inputs(),
            [keys::COMBINED_DATA, keys::SUMMARY_STATISTICS, keys::FIGURES]
        );
    }

    #[test]
    fn test_exit_codes() {
        let failed = AnalysisOutcome::ValidationFailed(PipelineError::NoOutputs {
            stage: "x".into(),
        });
        assert_eq!(failed.exit_code(), 1);
    }
}
