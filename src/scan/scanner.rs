use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::core::config::MatchMode;
use crate::core::resource::{references_patient, ResourceHeader};
use crate::core::types::{PatientId, ResourceType};
use crate::parsing::ndjson::{open_lines, parse_resource_value, NdjsonLines, ParseError};
use crate::tally::counts::Tally;

/// A recoverable problem met while scanning; the scan continues past it.
#[derive(Error, Debug)]
pub enum ScanWarning {
    #[error("Skipping {path}: {source}")]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Skipping {path} line {line}: {source}")]
    MalformedLine {
        path: PathBuf,
        line: usize,
        #[source]
        source: ParseError,
    },
}

/// Outcome of checking one line against the target ID
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineMatch {
    /// The raw text does not contain the ID; the line was not parsed
    Filtered,
    /// Parsed, but the resource does not reference the patient (reference mode only)
    Rejected,
    /// Counts towards the given category
    Matched(ResourceType),
}

/// Line and file counters for a scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub files_scanned: usize,
    pub files_skipped: usize,
    pub lines_read: u64,
    /// Lines whose raw text contained the ID
    pub prefilter_hits: u64,
    pub malformed_lines: u64,
    /// Pre-filter hits dropped by the reference check
    pub rejected_references: u64,
    pub matches: u64,
}

impl ScanStats {
    pub fn absorb(&mut self, other: &ScanStats) {
        self.files_scanned += other.files_scanned;
        self.files_skipped += other.files_skipped;
        self.lines_read += other.lines_read;
        self.prefilter_hits += other.prefilter_hits;
        self.malformed_lines += other.malformed_lines;
        self.rejected_references += other.rejected_references;
        self.matches += other.matches;
    }
}

/// Result of scanning one or more files
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub tally: Tally,
    pub stats: ScanStats,
    pub warnings: Vec<ScanWarning>,
}

impl ScanOutcome {
    fn absorb(&mut self, other: ScanOutcome) {
        self.tally.merge(other.tally);
        self.stats.absorb(&other.stats);
        self.warnings.extend(other.warnings);
    }
}

/// Cheap test applied to every raw line before any parsing.
///
/// Necessary but not sufficient: the ID may occur in a field that has
/// nothing to do with the patient.
#[inline]
#[must_use]
pub fn prefilter(line: &str, id: &PatientId) -> bool {
    line.contains(id.as_str())
}

/// Streams record files and counts the lines that mention one patient
pub struct ReferenceScanner<'a> {
    id: &'a PatientId,
    mode: MatchMode,
}

impl<'a> ReferenceScanner<'a> {
    pub fn new(id: &'a PatientId, mode: MatchMode) -> Self {
        Self { id, mode }
    }

    /// Scan every file, skipping the ones that cannot be read.
    ///
    /// Each file is tallied on its own and merged into the total only once it
    /// has been read to the end, so a file that fails midway contributes no
    /// counts at all.
    pub fn scan_files(&self, files: &[PathBuf]) -> ScanOutcome {
        let mut total = ScanOutcome::default();

        for path in files {
            match self.scan_file(path) {
                Ok(outcome) => {
                    debug!(
                        path = %path.display(),
                        lines = outcome.stats.lines_read,
                        matches = outcome.stats.matches,
                        "Scanned file"
                    );
                    total.absorb(outcome);
                }
                Err(warning) => {
                    warn!("{warning}");
                    total.stats.files_skipped += 1;
                    total.warnings.push(warning);
                }
            }
        }

        total
    }

    /// Scan a single file.
    ///
    /// # Errors
    ///
    /// Returns `ScanWarning::UnreadableFile` if the file cannot be opened or
    /// a read fails partway through.
    pub fn scan_file(&self, path: &Path) -> Result<ScanOutcome, ScanWarning> {
        let lines = open_lines(path).map_err(|source| ScanWarning::UnreadableFile {
            path: path.to_path_buf(),
            source,
        })?;

        self.scan_lines(path, lines)
            .map_err(|source| ScanWarning::UnreadableFile {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Scan an in-memory or otherwise already opened NDJSON stream.
    ///
    /// `source` is only used to label warnings.
    ///
    /// # Errors
    ///
    /// Returns the first I/O error raised by the reader.
    pub fn scan_reader<R: BufRead>(&self, source: &Path, reader: R) -> io::Result<ScanOutcome> {
        self.scan_lines(source, NdjsonLines::new(reader))
    }

    fn scan_lines<R: BufRead>(
        &self,
        source: &Path,
        lines: NdjsonLines<R>,
    ) -> io::Result<ScanOutcome> {
        let mut outcome = ScanOutcome::default();
        outcome.stats.files_scanned = 1;

        for line in lines {
            let (line_number, text) = line?;
            outcome.stats.lines_read += 1;

            match self.classify(&text) {
                Ok(LineMatch::Filtered) => {}
                Ok(LineMatch::Rejected) => {
                    outcome.stats.prefilter_hits += 1;
                    outcome.stats.rejected_references += 1;
                    debug!(
                        path = %source.display(),
                        line = line_number,
                        "ID present but not as a patient reference"
                    );
                }
                Ok(LineMatch::Matched(resource_type)) => {
                    outcome.stats.prefilter_hits += 1;
                    outcome.stats.matches += 1;
                    outcome.tally.increment(resource_type);
                }
                Err(source_error) => {
                    outcome.stats.prefilter_hits += 1;
                    outcome.stats.malformed_lines += 1;
                    let warning = ScanWarning::MalformedLine {
                        path: source.to_path_buf(),
                        line: line_number,
                        source: source_error,
                    };
                    warn!("{warning}");
                    outcome.warnings.push(warning);
                }
            }
        }

        Ok(outcome)
    }

    /// Decide whether a single line counts, and under which category.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the line passes the pre-filter but is not a
    /// JSON object or has no string `resourceType`.
    pub fn classify(&self, line: &str) -> Result<LineMatch, ParseError> {
        if !prefilter(line, self.id) {
            return Ok(LineMatch::Filtered);
        }

        let value = parse_resource_value(line)?;
        let resource_type = ResourceHeader::from_value(&value)
            .resource_type
            .ok_or(ParseError::MissingField("resourceType"))?;

        if self.mode == MatchMode::Reference && !references_patient(&value, self.id) {
            return Ok(LineMatch::Rejected);
        }
        Ok(LineMatch::Matched(resource_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;

    fn obs(id: &str, subject: &str) -> String {
        format!(
            r#"{{"resourceType":"Observation","id":"{id}","subject":{{"reference":"urn:uuid:{subject}"}}}}"#
        )
    }

    fn scan(mode: MatchMode, text: &str) -> ScanOutcome {
        let id = PatientId::new("abc123");
        ReferenceScanner::new(&id, mode)
            .scan_reader(Path::new("test.ndjson"), Cursor::new(text.to_string()))
            .unwrap()
    }

    #[test]
    fn test_n_matching_lines_yield_n() {
        for n in [0_usize, 1, 7] {
            let text: Vec<String> = (0..n).map(|i| obs(&format!("o{i}"), "abc123")).collect();
            let outcome = scan(MatchMode::Containment, &text.join("\n"));
            let snapshot = outcome.tally.finalize();
            assert_eq!(
                snapshot.get(&ResourceType::new("Observation")),
                u64::try_from(n).unwrap()
            );
            assert_eq!(snapshot.total(), outcome.stats.matches);
        }
    }

    #[test]
    fn test_non_matching_lines_are_not_parsed() {
        // Invalid JSON without the ID must be skipped silently
        let text = format!("this is not json\n{}\n{{broken", obs("o1", "abc123"));
        let outcome = scan(MatchMode::Containment, &text);
        assert_eq!(outcome.stats.lines_read, 3);
        assert_eq!(outcome.stats.prefilter_hits, 1);
        assert_eq!(outcome.stats.matches, 1);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_malformed_matching_line_is_warned_and_skipped() {
        let text = format!(
            "{}\n{{\"resourceType\": \"abc123\"\n{}",
            obs("o1", "abc123"),
            obs("o2", "abc123")
        );
        let outcome = scan(MatchMode::Containment, &text);
        assert_eq!(outcome.stats.matches, 2);
        assert_eq!(outcome.stats.malformed_lines, 1);
        assert!(matches!(
            outcome.warnings.as_slice(),
            [ScanWarning::MalformedLine { line: 2, .. }]
        ));
    }

    #[test]
    fn test_line_without_resource_type_is_warned() {
        let outcome = scan(MatchMode::Containment, r#"{"id":"abc123"}"#);
        assert_eq!(outcome.stats.matches, 0);
        assert!(matches!(
            outcome.warnings.as_slice(),
            [ScanWarning::MalformedLine {
                source: ParseError::MissingField("resourceType"),
                ..
            }]
        ));
    }

    #[test]
    fn test_containment_counts_unrelated_field_mentions() {
        // The ID only appears inside free text and as part of a longer ID,
        // yet containment mode still counts both lines.
        let text = [
            r#"{"resourceType":"DocumentReference","description":"see chart abc123"}"#,
            r#"{"resourceType":"Observation","subject":{"reference":"Patient/abc1234"}}"#,
        ]
        .join("\n");
        let outcome = scan(MatchMode::Containment, &text);
        let snapshot = outcome.tally.finalize();
        assert_eq!(snapshot.get(&ResourceType::new("DocumentReference")), 1);
        assert_eq!(snapshot.get(&ResourceType::new("Observation")), 1);
    }

    #[test]
    fn test_reference_mode_rejects_unrelated_field_mentions() {
        let text = [
            r#"{"resourceType":"DocumentReference","description":"see chart abc123"}"#,
            r#"{"resourceType":"Observation","subject":{"reference":"Patient/abc1234"}}"#,
            obs("o1", "abc123").as_str(),
            r#"{"resourceType":"Patient","id":"abc123"}"#,
        ]
        .join("\n");
        let outcome = scan(MatchMode::Reference, &text);
        assert_eq!(outcome.stats.prefilter_hits, 4);
        assert_eq!(outcome.stats.rejected_references, 2);
        let snapshot = outcome.tally.finalize();
        assert_eq!(snapshot.get(&ResourceType::new("Observation")), 1);
        assert_eq!(snapshot.get(&ResourceType::new("Patient")), 1);
        assert_eq!(snapshot.get(&ResourceType::new("DocumentReference")), 0);
    }

    #[test]
    fn test_odd_field_shapes_still_count() {
        // Non-string id and a duplicated key do not hide the category
        let text = [
            r#"{"resourceType":"Observation","id":42,"subject":{"reference":"Patient/abc123"}}"#,
            r#"{"resourceType":"Encounter","id":"e1","id":"e2","subject":{"reference":"urn:uuid:abc123"}}"#,
        ]
        .join("\n");
        for mode in [MatchMode::Containment, MatchMode::Reference] {
            let outcome = scan(mode, &text);
            assert_eq!(outcome.stats.matches, 2, "{mode:?}");
            assert_eq!(outcome.stats.malformed_lines, 0, "{mode:?}");
        }
    }

    #[test]
    fn test_non_object_line_is_malformed() {
        for mode in [MatchMode::Containment, MatchMode::Reference] {
            let outcome = scan(mode, r#"["Observation","abc123"]"#);
            assert_eq!(outcome.stats.matches, 0, "{mode:?}");
            assert!(matches!(
                outcome.warnings.as_slice(),
                [ScanWarning::MalformedLine {
                    line: 1,
                    source: ParseError::NotAnObject(_),
                    ..
                }]
            ));
        }
    }

    #[test]
    fn test_reference_matches_are_subset_of_containment() {
        let text = [
            obs("o1", "abc123").as_str(),
            r#"{"resourceType":"Observation","id":42,"subject":{"reference":"Patient/abc123"}}"#,
            r#"{"resourceType":"Observation","note":[{"text":"abc123"}]}"#,
            r#"{"resourceType":"DocumentReference","description":"see chart abc123"}"#,
            r#"{"resourceType":"Encounter","id":"e1","id":"e2","subject":{"reference":"urn:uuid:abc123"}}"#,
            r#"{"resourceType":"Patient","id":"abc123"}"#,
            r#"{"resourceType":"Claim","patient":"abc123"}"#,
            r#"["Observation","abc123"]"#,
            r#"{"id":"abc123"}"#,
            "{broken abc123",
        ]
        .join("\n");

        let containment = scan(MatchMode::Containment, &text);
        let reference = scan(MatchMode::Reference, &text);
        assert_eq!(
            containment.stats.malformed_lines,
            reference.stats.malformed_lines
        );
        assert!(reference.stats.matches <= containment.stats.matches);

        let containment = containment.tally.finalize();
        let reference = reference.tally.finalize();
        for (resource_type, count) in reference.iter() {
            assert!(
                count <= containment.get(resource_type),
                "{resource_type} counted more often by reference"
            );
        }
        assert_eq!(containment.get(&ResourceType::new("Observation")), 3);
        assert_eq!(reference.get(&ResourceType::new("Observation")), 2);
    }

    #[test]
    fn test_record_counts_under_its_own_type_once() {
        // Mentions the patient twice and references another resource type
        let line = r#"{"resourceType":"Claim","patient":{"reference":"urn:uuid:abc123"},"item":[{"encounter":[{"reference":"urn:uuid:abc123-enc"}]}]}"#;
        let outcome = scan(MatchMode::Containment, line);
        let snapshot = outcome.tally.finalize();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get(&ResourceType::new("Claim")), 1);
    }

    #[test]
    fn test_scan_files_skips_unreadable() {
        let dir = tempfile::TempDir::new().unwrap();
        let good = dir.path().join("Observation.ndjson");
        fs::write(&good, obs("o1", "abc123")).unwrap();
        let missing = dir.path().join("Encounter.ndjson");

        let id = PatientId::new("abc123");
        let outcome =
            ReferenceScanner::new(&id, MatchMode::Containment).scan_files(&[missing, good]);

        assert_eq!(outcome.stats.files_scanned, 1);
        assert_eq!(outcome.stats.files_skipped, 1);
        assert_eq!(outcome.stats.matches, 1);
        assert!(matches!(
            outcome.warnings.as_slice(),
            [ScanWarning::UnreadableFile { .. }]
        ));
    }

    #[test]
    fn test_classify() {
        let id = PatientId::new("abc123");
        let scanner = ReferenceScanner::new(&id, MatchMode::Containment);
        assert_eq!(scanner.classify("nothing here").unwrap(), LineMatch::Filtered);
        assert_eq!(
            scanner.classify(&obs("o1", "abc123")).unwrap(),
            LineMatch::Matched(ResourceType::new("Observation"))
        );
        assert!(scanner.classify("abc123").is_err());
    }
}
