//! Core data types and configuration.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`ScanConfig`](config::ScanConfig): Root directory, identity file and match mode for a run
//! - [`PatientId`](types::PatientId), [`ResourceType`](types::ResourceType): Identifier and category keys
//! - [`IdentityQuery`](types::IdentityQuery), [`Identity`](types::Identity): What the caller asked for and what it resolved to
//! - [`ResourceHeader`](resource::ResourceHeader), [`PatientResource`](resource::PatientResource): Serde views over NDJSON lines
//!
//! ## Record Files
//!
//! A FHIR bulk export is a directory of newline-delimited JSON files, one
//! resource per line:
//!
//! | File | `resourceType` | Links to patient via |
//! |------|----------------|----------------------|
//! | Patient.ndjson     | Patient     | its own `id` |
//! | Encounter.ndjson   | Encounter   | `subject.reference` |
//! | Observation.ndjson | Observation | `subject.reference` |
//! | Claim.ndjson       | Claim       | `patient.reference` |
//!
//! Only `resourceType` and `id` are ever extracted from non-patient lines.

pub mod config;
pub mod resource;
pub mod types;
