use std::path::PathBuf;
use std::sync::Arc;

use gpa_ingest::{IngestError, discover_files, read_csv_table};
use gpa_model::{AnalysisConfig, RawTables};
use tracing::{debug, info, warn};

use crate::context::PipelineContext;
use crate::keys::{EXTRACTED_FILES, RAW_DATA};
use crate::stage::{Stage, StageDescriptor};

/// Loads every monthly CSV in the raw directory plus the lookup table.
///
/// A file that fails to load is logged and skipped.
pub struct LoadingStage {
    descriptor: StageDescriptor,
    config: Arc<AnalysisConfig>,
}

impl LoadingStage {
    pub const NAME: &'static str = "data_loading";

    pub fn new(config: Arc<AnalysisConfig>) -> Self {
        Self {
            descriptor: StageDescriptor::new(Self::NAME)
                .input(EXTRACTED_FILES)
                .output(RAW_DATA),
            config,
        }
    }
}

impl Stage for LoadingStage {
    fn descriptor(&self) -> &StageDescriptor {
        &self.descriptor
    }

    fn execute(&self, mut context: PipelineContext) -> anyhow::Result<PipelineContext> {
        let config = &self.config;
        let extracted: Vec<PathBuf> = self.descriptor.input_as(&context, EXTRACTED_FILES)?;
        debug!(extracted = extracted.len(), "Loading data files");

        let mut raw = RawTables::default();
        let files = match discover_files(&config.raw_data_dir, &config.csv_file_pattern) {
            Ok(files) => files,
            Err(IngestError::DirectoryNotFound { path }) => {
                warn!(path = %path.display(), "Raw data directory not found");
                Vec::new()
            }
            Err(err) => return Err(err.into()),
        };
        info!(
            files = files.len(),
            pattern = %config.csv_file_pattern,
            "Discovered monthly files"
        );

        for path in files {
            match read_csv_table(&path, config.sample_size) {
                Ok(table) => {
                    info!(
                        dataset = %table.name,
                        rows = table.data.height(),
                        columns = table.data.width(),
                        "Loaded"
                    );
                    raw.monthly.insert(table.name, table.data);
                }
                Err(err) => warn!(path = %path.display(), error = %err, "Skipping file"),
            }
        }

        let lookup_path = config.lookup_path();
        if lookup_path.is_file() {
            match read_csv_table(&lookup_path, None) {
                Ok(table) => {
                    info!(rows = table.data.height(), "Loaded lookup table");
                    raw.lookup = Some(table.data);
                }
                Err(err) => {
                    warn!(path = %lookup_path.display(), error = %err, "Skipping lookup table");
                }
            }
        } else {
            warn!(path = %lookup_path.display(), "Lookup table not found");
        }

        info!(
            datasets = ?raw.names(),
            rows = raw.monthly_row_count(),
            "Loading complete"
        );
        self.descriptor.store(&mut context, RAW_DATA, raw)?;
        Ok(context)
    }
}
