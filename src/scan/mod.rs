//! Record file discovery and reference scanning.
//!
//! - [`discovery`]: finds the NDJSON files in an export directory
//! - [`scanner`]: streams those files and classifies each line
//!
//! ## Two-Phase Filtering
//!
//! Most lines in an export belong to other patients. Every line is first
//! checked for the patient ID as a plain substring; only lines that pass are
//! parsed as JSON. The substring check can produce false positives (the ID
//! inside an unrelated field), which [`MatchMode::Containment`] counts and
//! [`MatchMode::Reference`] filters out after parsing.
//!
//! [`MatchMode::Containment`]: crate::core::config::MatchMode::Containment
//! [`MatchMode::Reference`]: crate::core::config::MatchMode::Reference

pub mod discovery;
pub mod scanner;
