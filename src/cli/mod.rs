//! Command-line interface for fhir-tally.
//!
//! The tool takes either one positional argument (a patient ID) or two (a
//! first and a last name), scans the export directory, and prints a table of
//! resource counts.
//!
//! ## Usage
//!
//! ```text
//! # Count by patient ID in the current directory
//! fhir-tally 8f789d0b-3145-4cf2-8504-13159edaa747
//!
//! # Count by name in another directory
//! fhir-tally Rosamond509 Lynch190 --dir output/fhir
//!
//! # Only count genuine references, as JSON
//! fhir-tally Rosamond509 Lynch190 --match-mode reference --format json
//! ```

use std::path::PathBuf;

use clap::Parser;

use crate::core::config::{MatchMode, ScanConfig, DEFAULT_EXTENSION, DEFAULT_IDENTITY_FILE};
use crate::core::types::IdentityQuery;

pub mod count;

#[derive(Parser)]
#[command(name = "fhir-tally")]
#[command(version)]
#[command(about = "Count the FHIR resources in an NDJSON export that reference a patient")]
#[command(
    long_about = "fhir-tally finds a patient by ID, or by first and last name, in the identity file of a FHIR bulk export and counts how many resources of each type mention that patient.\n\nExamples:\n  fhir-tally <ID>\n  fhir-tally Rosamond509 Lynch190"
)]
pub struct Cli {
    /// Patient ID, or first name followed by last name
    #[arg(required = true, num_args = 1..=2, value_names = ["ID|FIRST", "LAST"])]
    pub patient: Vec<String>,

    /// Directory holding the NDJSON record files
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// File name of the patient identity file inside --dir
    #[arg(long, default_value = DEFAULT_IDENTITY_FILE)]
    pub identity_file: String,

    /// Suffix of record files to scan
    #[arg(long, default_value = DEFAULT_EXTENSION)]
    pub extension: String,

    /// Do not scan gzip-compressed record files
    #[arg(long)]
    pub no_compressed: bool,

    /// What counts as a reference to the patient
    #[arg(long, value_enum, default_value = "containment")]
    pub match_mode: MatchMode,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

impl Cli {
    /// Interpret the positional arguments
    #[must_use]
    pub fn query(&self) -> Option<IdentityQuery> {
        match self.patient.as_slice() {
            [id] => Some(IdentityQuery::by_id(id.clone())),
            [first, last] => Some(IdentityQuery::by_name(first.clone(), last.clone())),
            _ => None,
        }
    }

    #[must_use]
    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig::new(self.dir.clone())
            .with_identity_file(&self.identity_file)
            .with_extension(&self.extension)
            .with_compressed(!self.no_compressed)
            .with_match_mode(self.match_mode)
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
