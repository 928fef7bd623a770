use serde::{Deserialize, Serialize};

/// Logical FHIR identifier of the patient being searched for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientId(pub String);

impl PatientId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for PatientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Category a record is tallied under (the FHIR `resourceType`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceType(pub String);

impl ResourceType {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the caller identified the patient on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityQuery {
    /// An explicit patient ID
    ById(PatientId),
    /// A first (given) and last (family) name pair
    ByName { first: String, last: String },
}

impl IdentityQuery {
    pub fn by_id(id: impl Into<String>) -> Self {
        Self::ById(PatientId::new(id))
    }

    pub fn by_name(first: impl Into<String>, last: impl Into<String>) -> Self {
        Self::ByName {
            first: first.into(),
            last: last.into(),
        }
    }
}

impl std::fmt::Display for IdentityQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ById(id) => write!(f, "{id}"),
            Self::ByName { first, last } => write!(f, "{first} {last}"),
        }
    }
}

/// A resolved patient: the ID that is scanned for and the name shown in reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub id: PatientId,
    /// Family name followed directly by the first given name; empty when unknown
    pub display_name: String,
}

impl Identity {
    pub fn new(id: PatientId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
        }
    }
}
