//! Archive extraction for monthly extracts.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::{IngestError, Result};

/// Destination directories for extracted members.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionTargets<'a> {
    /// Directory receiving monthly data files.
    pub raw_dir: &'a Path,
    /// Directory receiving lookup files.
    pub lookup_dir: &'a Path,
    /// Case-insensitive marker that identifies lookup files by name.
    pub lookup_marker: &'a str,
}

impl<'a> ExtractionTargets<'a> {
    /// Targets with the default `mapping` lookup marker.
    #[must_use]
    pub fn new(raw_dir: &'a Path, lookup_dir: &'a Path) -> Self {
        Self {
            raw_dir,
            lookup_dir,
            lookup_marker: "mapping",
        }
    }

    #[must_use]
    pub fn with_lookup_marker(mut self, marker: &'a str) -> Self {
        self.lookup_marker = marker;
        self
    }

    fn is_lookup(&self, file_name: &str) -> bool {
        file_name
            .to_lowercase()
            .contains(&self.lookup_marker.to_lowercase())
    }
}

/// A CSV member of the archive and where it lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFile {
    pub path: PathBuf,
    /// Whether the member was routed to the lookup directory.
    pub is_lookup: bool,
    /// False when the destination already existed and was left untouched.
    pub newly_extracted: bool,
}

fn archive_error(path: &Path, err: &ZipError) -> IngestError {
    IngestError::Archive {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

fn is_csv_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Extracts the CSV members of `archive_path`.
///
/// Members are flattened to their file name. Files whose name contains the
/// lookup marker go to `targets.lookup_dir`, everything else to
/// `targets.raw_dir`. A destination that already exists is not overwritten
/// but is still reported. Non-CSV members and members with unsafe paths are
/// skipped.
pub fn extract_archive(
    archive_path: &Path,
    targets: &ExtractionTargets<'_>,
) -> Result<Vec<ExtractedFile>> {
    let file = File::open(archive_path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: archive_path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: archive_path.to_path_buf(),
                source: e,
            }
        }
    })?;
    let mut archive = ZipArchive::new(file).map_err(|e| archive_error(archive_path, &e))?;

    fs::create_dir_all(targets.raw_dir).map_err(|e| IngestError::FileWrite {
        path: targets.raw_dir.to_path_buf(),
        source: e,
    })?;

    let mut extracted = Vec::new();
    for index in 0..archive.len() {
        let mut member = archive
            .by_index(index)
            .map_err(|e| archive_error(archive_path, &e))?;
        if member.is_dir() {
            continue;
        }

        let member_name = member.name().to_string();
        let Some(file_name) = member
            .enclosed_name()
            .and_then(|path| path.file_name().map(ToOwned::to_owned))
        else {
            warn!(member = %member_name, "Skipping archive member with unsafe path");
            continue;
        };
        let file_name_str = file_name.to_string_lossy();
        if !is_csv_name(&file_name_str) {
            debug!(member = %member_name, "Skipping non-CSV archive member");
            continue;
        }

        let is_lookup = targets.is_lookup(&file_name_str);
        let dest_dir = if is_lookup {
            targets.lookup_dir
        } else {
            targets.raw_dir
        };
        let dest = dest_dir.join(&file_name);

        if dest.exists() {
            info!(path = %dest.display(), "File exists");
            extracted.push(ExtractedFile {
                path: dest,
                is_lookup,
                newly_extracted: false,
            });
            continue;
        }

        info!(member = %member_name, dest = %dest.display(), "Extracting");
        fs::create_dir_all(dest_dir).map_err(|e| IngestError::FileWrite {
            path: dest_dir.to_path_buf(),
            source: e,
        })?;
        let mut out = File::create(&dest).map_err(|e| IngestError::FileWrite {
            path: dest.clone(),
            source: e,
        })?;
        io::copy(&mut member, &mut out).map_err(|e| IngestError::FileWrite {
            path: dest.clone(),
            source: e,
        })?;

        extracted.push(ExtractedFile {
            path: dest,
            is_lookup,
            newly_extracted: true,
        });
    }

    Ok(extracted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn write_zip(path: &Path, members: &[(&str, &str)]) {
        let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
        for (name, content) in members {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_extract_routes_lookup_files() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("jul_25.zip");
        write_zip(
            &archive,
            &[
                ("Practice_Level_Crosstab_Jul_25.csv", "GP_CODE\nA1\n"),
                ("Mapping.csv", "GP_CODE\nA1\n"),
                ("readme.txt", "ignored"),
            ],
        );
        let raw = dir.path().join("raw");
        let lookup = dir.path().join("lookup");

        let files = extract_archive(&archive, &ExtractionTargets::new(&raw, &lookup)).unwrap();

        assert_eq!(files.len(), 2);
        assert!(raw.join("Practice_Level_Crosstab_Jul_25.csv").is_file());
        assert!(lookup.join("Mapping.csv").is_file());
        assert!(!raw.join("readme.txt").exists());
        assert!(files.iter().all(|file| file.newly_extracted));
        assert_eq!(files.iter().filter(|file| file.is_lookup).count(), 1);
    }

    #[test]
    fn test_extract_flattens_nested_members() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("aug_25.zip");
        write_zip(&archive, &[("nested/folder/Data.CSV", "A\n1\n")]);
        let raw = dir.path().join("raw");
        let lookup = dir.path().join("lookup");

        let files = extract_archive(&archive, &ExtractionTargets::new(&raw, &lookup)).unwrap();

        assert_eq!(files[0].path, raw.join("Data.CSV"));
        assert!(raw.join("Data.CSV").is_file());
    }

    #[test]
    fn test_extract_missing_archive() {
        let dir = TempDir::new().unwrap();
        let result = extract_archive(
            &dir.path().join("missing.zip"),
            &ExtractionTargets::new(dir.path(), dir.path()),
        );
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }

    #[test]
    fn test_extract_corrupt_archive() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("broken.zip");
        std::fs::write(&archive, b"not a zip").unwrap();
        let result = extract_archive(&archive, &ExtractionTargets::new(dir.path(), dir.path()));
        assert!(matches!(result, Err(IngestError::Archive { .. })));
    }

    #[test]
    fn test_custom_lookup_marker() {
        let targets = ExtractionTargets::new(Path::new("raw"), Path::new("lookup"))
            .with_lookup_marker("LOOKUP");
        assert!(targets.is_lookup("practice_lookup_2025.csv"));
        assert!(!targets.is_lookup("Mapping.csv"));
    }
}
