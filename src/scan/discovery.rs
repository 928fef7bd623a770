use std::io;
use std::path::PathBuf;

use tracing::debug;

use crate::core::config::ScanConfig;

/// List the record files directly inside the configured root directory.
///
/// Subdirectories are not descended into. The result is sorted by path so
/// that warnings and verbose output are reproducible between runs.
///
/// # Errors
///
/// Returns an I/O error if the root directory cannot be listed.
pub fn find_record_files(config: &ScanConfig) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in std::fs::read_dir(&config.root)? {
        let entry = entry?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            debug!(path = %path.display(), "Skipping file with non UTF-8 name");
            continue;
        };

        if config.is_record_file_name(name) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_find_record_files_filters_and_sorts() {
        let dir = tempfile::TempDir::new().unwrap();
        for name in [
            "Observation.ndjson",
            "Encounter.ndjson",
            "Claim.ndjson.gz",
            "README.md",
            "Patient.json",
        ] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        fs::create_dir(dir.path().join("nested.ndjson")).unwrap();

        let files = find_record_files(&ScanConfig::new(dir.path())).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["Claim.ndjson.gz", "Encounter.ndjson", "Observation.ndjson"]
        );
    }

    #[test]
    fn test_find_record_files_without_compressed() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join("Claim.ndjson.gz"), "").unwrap();
        fs::write(dir.path().join("Encounter.ndjson"), "").unwrap();

        let config = ScanConfig::new(dir.path()).with_compressed(false);
        let files = find_record_files(&config).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("Encounter.ndjson"));
    }

    #[test]
    fn test_find_record_files_uppercase_gzip_suffix() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join("Claim.ndjson.GZ"), "").unwrap();

        let files = find_record_files(&ScanConfig::new(dir.path())).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("Claim.ndjson.GZ"));
    }

    #[test]
    fn test_find_record_files_empty_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(find_record_files(&ScanConfig::new(dir.path()))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_find_record_files_missing_dir() {
        let config = ScanConfig::new("/nonexistent/export/dir");
        assert!(find_record_files(&config).is_err());
    }
}
