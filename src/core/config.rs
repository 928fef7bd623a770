use std::path::PathBuf;

/// Default name of the file holding `Patient` resources
pub const DEFAULT_IDENTITY_FILE: &str = "Patient.ndjson";

/// Default suffix of record files
pub const DEFAULT_EXTENSION: &str = ".ndjson";

/// Suffix appended to the record extension for gzip-compressed files
pub const GZIP_SUFFIX: &str = ".gz";

/// Strip a trailing `.gz`, in any letter case, from a file name
#[must_use]
pub fn strip_gzip_suffix(name: &str) -> Option<&str> {
    let split = name.len().checked_sub(GZIP_SUFFIX.len())?;
    let suffix = name.get(split..)?;
    suffix
        .eq_ignore_ascii_case(GZIP_SUFFIX)
        .then(|| &name[..split])
}

/// What counts as a match once a line has passed the substring pre-filter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum MatchMode {
    /// Count every parsed line whose raw text contains the ID.
    ///
    /// An ID that only occurs inside an unrelated field (a narrative, an
    /// identifier value, another resource's ID) is still counted.
    #[default]
    Containment,
    /// Count a line only when the resource is the patient itself or holds a
    /// `reference` pointing at the patient.
    Reference,
}

/// Where to look for record files and how to match them
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Directory holding the record files
    pub root: PathBuf,
    /// File name of the identity file inside `root`
    pub identity_file: String,
    /// Suffix a file name must end with to be scanned
    pub extension: String,
    /// Also scan `<extension>.gz` files
    pub include_compressed: bool,
    pub match_mode: MatchMode,
}

impl ScanConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            identity_file: DEFAULT_IDENTITY_FILE.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
            include_compressed: true,
            match_mode: MatchMode::default(),
        }
    }

    #[must_use]
    pub fn with_identity_file(mut self, name: impl Into<String>) -> Self {
        self.identity_file = name.into();
        self
    }

    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    #[must_use]
    pub fn with_compressed(mut self, include_compressed: bool) -> Self {
        self.include_compressed = include_compressed;
        self
    }

    #[must_use]
    pub fn with_match_mode(mut self, match_mode: MatchMode) -> Self {
        self.match_mode = match_mode;
        self
    }

    /// Full path of the identity file
    #[must_use]
    pub fn identity_path(&self) -> PathBuf {
        self.root.join(&self.identity_file)
    }

    /// Whether a file name qualifies as a record file under this configuration
    #[must_use]
    pub fn is_record_file_name(&self, name: &str) -> bool {
        if name.ends_with(&self.extension) {
            return true;
        }
        self.include_compressed
            && strip_gzip_suffix(name).is_some_and(|stem| stem.ends_with(&self.extension))
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new(".")
    }
}
