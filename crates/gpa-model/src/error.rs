//! Configuration errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building an [`AnalysisConfig`](crate::AnalysisConfig).
///
/// All of these are fatal and surface before any stage runs.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The run identifier was empty or contained a path separator.
    #[error("invalid run identifier '{0}'")]
    InvalidRunId(String),

    /// The source archive selected by the run identifier does not exist.
    #[error("zip file not found: {path}")]
    ArchiveNotFound { path: PathBuf },

    /// A configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration file is not valid TOML for [`ConfigOverrides`](crate::ConfigOverrides).
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// An option value is outside its accepted range.
    #[error("invalid {field} value '{value}'")]
    InvalidValue { field: &'static str, value: String },
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigError::ArchiveNotFound {
            path: PathBuf::from("data/compressed/jul_25.zip"),
        };
        assert_eq!(err.to_string(), "zip file not found: data/compressed/jul_25.zip");
    }
}
