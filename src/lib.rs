//! # fhir-tally
//!
//! A library for counting the FHIR resources that reference a patient in an
//! NDJSON bulk export.
//!
//! Bulk exports (for example the ones Synthea writes) place one resource per
//! line in files named after the resource type: `Patient.ndjson`,
//! `Observation.ndjson`, `Encounter.ndjson` and so on. Given a patient ID, or
//! a first/last name pair that is resolved to an ID through `Patient.ndjson`,
//! `fhir-tally` scans every record file and reports how many resources of each
//! type mention that patient.
//!
//! ## Features
//!
//! - **Substring pre-filter**: lines that do not contain the ID are never parsed
//! - **Match modes**: raw textual containment, or a stricter reference check
//! - **Recoverable errors**: unreadable files and malformed lines are skipped with a warning
//! - **Deterministic ranking**: count descending, ties broken by resource type
//! - **Compressed exports**: `.ndjson.gz` files are read transparently
//!
//! ## Example
//!
//! ```rust,no_run
//! use fhir_tally::{CountingEngine, IdentityQuery, ScanConfig};
//! use fhir_tally::report::render::render_text;
//!
//! let config = ScanConfig::new("export/");
//! let engine = CountingEngine::new(&config);
//!
//! let summary = engine
//!     .run(&IdentityQuery::by_name("Rosamond509", "Lynch190"))
//!     .unwrap();
//!
//! print!(
//!     "{}",
//!     render_text(&summary.ranked, &summary.identity.id, &summary.identity.display_name)
//! );
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Configuration and the core data types for patients and resources
//! - [`parsing`]: NDJSON line reading and structural extraction
//! - [`identity`]: Patient ID / name resolution against the identity file
//! - [`scan`]: Record file discovery and the reference scanner
//! - [`tally`]: Count aggregation, ranking and the end-to-end engine
//! - [`report`]: Text, TSV and JSON rendering of ranked counts
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod identity;
pub mod parsing;
pub mod report;
pub mod scan;
pub mod tally;

// Re-export commonly used types for convenience
pub use crate::core::config::{MatchMode, ScanConfig};
pub use crate::core::types::*;
pub use identity::resolver::IdentityResolver;
pub use scan::scanner::{ReferenceScanner, ScanWarning};
pub use tally::counts::Tally;
pub use tally::engine::{CountError, CountSummary, CountingEngine};
pub use tally::rank::{rank, RankedEntry};
