//! Pipeline engine errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("context key '{key}' not found")]
    KeyNotFound { key: String },

    #[error("context key '{key}' holds {found}, expected {expected}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("stage '{stage}' is missing required input '{key}'")]
    MissingInput { stage: String, key: String },

    #[error("stage '{stage}' tried to write undeclared output '{key}'")]
    UndeclaredOutput { stage: String, key: String },

    /// An input is neither seeded nor produced by an earlier stage.
    #[error("stage '{stage}' requires '{key}', which no earlier stage produces")]
    Dependency { stage: String, key: String },

    #[error("duplicate stage name '{stage}'")]
    DuplicateStage { stage: String },

    #[error("stage '{stage}' declares no outputs")]
    NoOutputs { stage: String },

    #[error("stage '{stage}' failed: {source:#}")]
    StageFailed {
        stage: String,
        #[source]
        source: anyhow::Error,
    },
}

impl PipelineError {
    /// Name of the stage the error is attributed to, if any.
    pub fn stage(&self) -> Option<&str> {
        match self {
            Self::KeyNotFound { .. } | Self::TypeMismatch { .. } => None,
            Self::MissingInput { stage, .. }
            | Self::UndeclaredOutput { stage, .. }
            | Self::Dependency { stage, .. }
            | Self::DuplicateStage { stage }
            | Self::NoOutputs { stage }
            | Self::StageFailed { stage, .. } => Some(stage),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_failed_display_includes_cause_chain() {
        let source = anyhow::anyhow!("no monthly data found to join").context("join");
        let err = PipelineError::StageFailed {
            stage: "data_joining".into(),
            source,
        };
        assert_eq!(
            err.to_string(),
            "stage 'data_joining' failed: join: no monthly data found to join"
        );
        assert_eq!(err.stage(), Some("data_joining"));
    }
}
