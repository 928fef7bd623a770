//! Patient identity resolution.
//!
//! A run starts from either a patient ID or a first/last name pair. The
//! [`IdentityResolver`](resolver::IdentityResolver) scans the identity file
//! (`Patient.ndjson` by default) once to find the counterpart:
//!
//! - **By ID**: the display name, family name followed by the first given name
//! - **By name**: the patient ID
//!
//! Both lookups apply a raw substring check to each line before parsing it,
//! and the last matching line wins. A missing identity file is "no match",
//! not an error.

pub mod resolver;
