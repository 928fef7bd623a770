use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{info, warn};

use crate::core::config::ScanConfig;
use crate::core::types::{Identity, IdentityQuery};
use crate::identity::resolver::{IdentityResolver, ResolveError};
use crate::scan::discovery::find_record_files;
use crate::scan::scanner::{ReferenceScanner, ScanStats, ScanWarning};
use crate::tally::rank::{rank, RankedEntry};

/// Conditions that end a run without a report
#[derive(Error, Debug)]
pub enum CountError {
    #[error("No files were found in: {0}")]
    NoRecordFiles(PathBuf),

    #[error("Failed to list record files in {path}: {source}")]
    Discovery {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Unable to find ID for patient: {0}")]
    PatientNotFound(String),

    #[error("Patient ID must not be empty")]
    EmptyId,

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Everything a completed run produced
#[derive(Debug)]
pub struct CountSummary {
    pub identity: Identity,
    /// Record files that were considered, in scan order
    pub files: Vec<PathBuf>,
    pub ranked: Vec<RankedEntry>,
    pub stats: ScanStats,
    /// Recoverable problems met during the scan
    pub warnings: Vec<ScanWarning>,
    /// Identity file failure for an ID query; the ID was scanned with an
    /// empty display name
    pub identity_warning: Option<ResolveError>,
}

impl CountSummary {
    /// Total number of matched records; equals the sum of the ranked counts
    #[must_use]
    pub fn total(&self) -> u64 {
        self.ranked.iter().map(|e| e.count).sum()
    }
}

/// Runs discovery, identity resolution, scanning and ranking for one patient
pub struct CountingEngine<'a> {
    config: &'a ScanConfig,
}

impl<'a> CountingEngine<'a> {
    pub fn new(config: &'a ScanConfig) -> Self {
        Self { config }
    }

    /// Count the resources referencing the queried patient.
    ///
    /// # Errors
    ///
    /// Returns `CountError::NoRecordFiles` if the root holds no record files,
    /// `CountError::PatientNotFound` if a name query matches no patient,
    /// `CountError::EmptyId` for an empty ID, and `CountError::Resolve` if the
    /// identity file cannot be read during a name query. Unreadable record
    /// files and malformed lines are reported in [`CountSummary::warnings`].
    pub fn run(&self, query: &IdentityQuery) -> Result<CountSummary, CountError> {
        let files = find_record_files(self.config).map_err(|source| CountError::Discovery {
            path: self.config.root.clone(),
            source,
        })?;

        if files.is_empty() {
            return Err(CountError::NoRecordFiles(self.config.root.clone()));
        }

        let (identity, identity_warning) = self.resolve(query)?;
        if identity.id.is_empty() {
            return Err(CountError::EmptyId);
        }

        info!(
            id = %identity.id,
            name = %identity.display_name,
            files = files.len(),
            "Scanning record files"
        );

        let scanner = ReferenceScanner::new(&identity.id, self.config.match_mode);
        let outcome = scanner.scan_files(&files);
        let ranked = rank(&outcome.tally.finalize());

        info!(
            lines = outcome.stats.lines_read,
            prefilter_hits = outcome.stats.prefilter_hits,
            matches = outcome.stats.matches,
            "Scan complete"
        );

        Ok(CountSummary {
            identity,
            files,
            ranked,
            stats: outcome.stats,
            warnings: outcome.warnings,
            identity_warning,
        })
    }

    /// Resolve the query against the identity file.
    ///
    /// An explicit ID is always scanned for, even when its name cannot be
    /// found; a name that resolves to nothing aborts the run. A failed lookup
    /// for an ID is handed back alongside the identity.
    fn resolve(
        &self,
        query: &IdentityQuery,
    ) -> Result<(Identity, Option<ResolveError>), CountError> {
        let path = self.config.identity_path();
        let resolver = IdentityResolver::new(&path);

        match query {
            IdentityQuery::ById(id) => {
                if id.is_empty() {
                    return Err(CountError::EmptyId);
                }
                let (name, failure) = match resolver.resolve_name_from_id(id) {
                    Ok(Some(name)) => (name, None),
                    Ok(None) => {
                        warn!(id = %id, path = %path.display(), "No patient found for ID");
                        (String::new(), None)
                    }
                    Err(e) => {
                        warn!("{e}");
                        (String::new(), Some(e))
                    }
                };
                Ok((Identity::new(id.clone(), name), failure))
            }
            IdentityQuery::ByName { .. } => resolver
                .resolve(query)?
                .map(|identity| (identity, None))
                .ok_or_else(|| CountError::PatientNotFound(query.to_string())),
        }
    }
}
