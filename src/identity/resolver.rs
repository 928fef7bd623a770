use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::core::resource::PatientResource;
use crate::core::types::{Identity, IdentityQuery, PatientId};
use crate::parsing::ndjson::{open_lines, parse_patient, ParseError};

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Failed to read identity file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse {path} line {line}: {source}")]
    Parse {
        path: PathBuf,
        line: usize,
        #[source]
        source: ParseError,
    },
}

/// Looks up patients in a single identity file
pub struct IdentityResolver<'a> {
    path: &'a Path,
}

impl<'a> IdentityResolver<'a> {
    pub fn new(path: &'a Path) -> Self {
        Self { path }
    }

    /// Find the display name of the patient with the given ID.
    ///
    /// Returns `Ok(None)` if the identity file does not exist or no line
    /// contains the ID.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::Io` if the file cannot be read, or
    /// `ResolveError::Parse` if a line containing the ID is not a valid
    /// patient or has no `name`.
    pub fn resolve_name_from_id(&self, id: &PatientId) -> Result<Option<String>, ResolveError> {
        let mut display_name = None;

        self.scan(
            |line| line.contains(id.as_str()),
            |line_number, patient| {
                let name = patient
                    .display_name()
                    .ok_or_else(|| ResolveError::Parse {
                        path: self.path.to_path_buf(),
                        line: line_number,
                        source: ParseError::MissingField("name"),
                    })?;
                display_name = Some(name);
                Ok(())
            },
        )?;

        Ok(display_name)
    }

    /// Find the ID of the patient with the given first and last name.
    ///
    /// Returns `Ok(None)` if the identity file does not exist or no line
    /// contains both names.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::Io` if the file cannot be read, or
    /// `ResolveError::Parse` if a matching line is not a valid patient or has
    /// no `id`.
    pub fn resolve_id_from_name(
        &self,
        first: &str,
        last: &str,
    ) -> Result<Option<PatientId>, ResolveError> {
        Ok(self.find_by_name(first, last)?.map(|identity| identity.id))
    }

    /// Resolve a query into a full identity.
    ///
    /// For a name query the display name is taken from the same patient line
    /// that supplied the ID, so resolving that ID again yields the same pair.
    ///
    /// # Errors
    ///
    /// Propagates the errors of the underlying lookup.
    pub fn resolve(&self, query: &IdentityQuery) -> Result<Option<Identity>, ResolveError> {
        match query {
            IdentityQuery::ById(id) => Ok(self
                .resolve_name_from_id(id)?
                .map(|name| Identity::new(id.clone(), name))),
            IdentityQuery::ByName { first, last } => self.find_by_name(first, last),
        }
    }

    fn find_by_name(&self, first: &str, last: &str) -> Result<Option<Identity>, ResolveError> {
        let mut found = None;

        self.scan(
            |line| line.contains(last) && line.contains(first),
            |line_number, patient| {
                let id = patient.id.clone().ok_or_else(|| ResolveError::Parse {
                    path: self.path.to_path_buf(),
                    line: line_number,
                    source: ParseError::MissingField("id"),
                })?;
                let name = patient.display_name().unwrap_or_default();
                found = Some(Identity::new(PatientId::new(id), name));
                Ok(())
            },
        )?;

        Ok(found)
    }

    /// Stream the identity file, parsing only the lines accepted by `prefilter`
    fn scan<F, V>(&self, prefilter: F, mut visit: V) -> Result<(), ResolveError>
    where
        F: Fn(&str) -> bool,
        V: FnMut(usize, PatientResource) -> Result<(), ResolveError>,
    {
        if !self.path.is_file() {
            debug!(path = %self.path.display(), "Identity file not found");
            return Ok(());
        }

        let lines = open_lines(self.path).map_err(|source| ResolveError::Io {
            path: self.path.to_path_buf(),
            source,
        })?;

        for line in lines {
            let (line_number, text) = line.map_err(|source| ResolveError::Io {
                path: self.path.to_path_buf(),
                source,
            })?;

            if !prefilter(&text) {
                continue;
            }

            let patient = parse_patient(&text).map_err(|source| ResolveError::Parse {
                path: self.path.to_path_buf(),
                line: line_number,
                source,
            })?;

            debug!(line = line_number, id = ?patient.id, "Matched identity line");
            visit(line_number, patient)?;
        }

        Ok(())
    }
}
