use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use gpa_ingest::{ExtractionTargets, IngestError, extract_archive};
use gpa_model::AnalysisConfig;
use tracing::{info, warn};

use crate::context::PipelineContext;
use crate::keys::EXTRACTED_FILES;
use crate::stage::{Stage, StageDescriptor};

/// Unpacks the run's archive into the raw and lookup directories.
pub struct ExtractionStage {
    descriptor: StageDescriptor,
    config: Arc<AnalysisConfig>,
}

impl ExtractionStage {
    pub const NAME: &'static str = "data_extraction";

    pub fn new(config: Arc<AnalysisConfig>) -> Self {
        Self {
            descriptor: StageDescriptor::new(Self::NAME).output(EXTRACTED_FILES),
            config,
        }
    }
}

impl Stage for ExtractionStage {
    fn descriptor(&self) -> &StageDescriptor {
        &self.descriptor
    }

    fn execute(&self, mut context: PipelineContext) -> anyhow::Result<PipelineContext> {
        let config = &self.config;
        info!(archive = %config.input_archive.display(), "Extracting data files");

        let targets = ExtractionTargets::new(&config.raw_data_dir, &config.lookup_data_dir)
            .with_lookup_marker(&config.lookup_marker);
        let extracted = match extract_archive(&config.input_archive, &targets) {
            Ok(files) => files,
            Err(IngestError::FileNotFound { path }) => {
                warn!(path = %path.display(), "Archive not found, nothing extracted");
                Vec::new()
            }
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("extract {}", config.input_archive.display())
                });
            }
        };

        let paths: Vec<PathBuf> = extracted.into_iter().map(|file| file.path).collect();
        info!(files = paths.len(), "Extraction complete");
        self.descriptor.store(&mut context, EXTRACTED_FILES, paths)?;
        Ok(context)
    }
}
