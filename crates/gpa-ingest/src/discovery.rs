//! File discovery for extracted data directories.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};

use crate::error::{IngestError, Result};

/// Lists files in `dir` whose name matches the glob `pattern`.
///
/// Matching is case-insensitive and not recursive. Returns files sorted by
/// filename.
pub fn discover_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let pattern = Pattern::new(pattern).map_err(|e| IngestError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;
    let options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::default()
    };

    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let path = entry.path();

        // Skip directories
        if !path.is_file() {
            continue;
        }

        let matches = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| pattern.matches_with(name, options));
        if matches {
            files.push(path);
        }
    }

    // Sort by filename
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(files)
}

/// Dataset name for a discovered file: its stem.
pub fn dataset_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();

        for name in &[
            "Practice_Level_Crosstab_Jun_25.csv",
            "Practice_Level_Crosstab_Jul_25.CSV",
            "notes.txt",
        ] {
            let path = dir.path().join(name);
            std::fs::write(&path, "header\ndata").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.csv")).unwrap();

        dir
    }

    #[test]
    fn test_discover_all_csv_files() {
        let dir = create_test_dir();
        let files = discover_files(dir.path(), "*.csv").unwrap();

        assert_eq!(files.len(), 2);
        // Should be sorted by filename
        assert_eq!(
            dataset_name(&files[0]),
            "Practice_Level_Crosstab_Jul_25"
        );
    }

    #[test]
    fn test_discover_with_prefix_pattern() {
        let dir = create_test_dir();
        let files = discover_files(dir.path(), "*Jun_25.csv").unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_discover_empty_dir() {
        let dir = TempDir::new().unwrap();
        let files = discover_files(dir.path(), "*.csv").unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_discover_missing_dir() {
        let dir = TempDir::new().unwrap();
        let result = discover_files(&dir.path().join("absent"), "*.csv");
        assert!(matches!(result, Err(IngestError::DirectoryNotFound { .. })));
    }

    #[test]
    fn test_discover_invalid_pattern() {
        let dir = TempDir::new().unwrap();
        let result = discover_files(dir.path(), "[*.csv");
        assert!(matches!(result, Err(IngestError::InvalidPattern { .. })));
    }

    #[test]
    fn test_dataset_name() {
        assert_eq!(dataset_name(Path::new("raw/Mapping.csv")), "Mapping");
    }
}
