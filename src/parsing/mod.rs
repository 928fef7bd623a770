//! Parsers for newline-delimited FHIR resources.
//!
//! This module provides:
//!
//! - **Line reading**: [`ndjson::open_lines`] streams a plain or gzipped file line by line
//! - **Record headers**: [`ndjson::parse_resource_header`] extracts `resourceType` and `id`
//! - **Patients**: [`ndjson::parse_patient`] extracts `id` and the `name` structure
//!
//! ## Example
//!
//! ```rust,no_run
//! use fhir_tally::parsing::ndjson::{open_lines, parse_resource_header};
//! use std::path::Path;
//!
//! for line in open_lines(Path::new("Observation.ndjson")).unwrap() {
//!     let (number, text) = line.unwrap();
//!     let header = parse_resource_header(&text).unwrap();
//!     println!("{number}: {:?}", header.resource_type);
//! }
//! ```
//!
//! ## Extracted Fields
//!
//! | Field | Where | Required |
//! |-------|-------|----------|
//! | resourceType | every record | Yes, for counting |
//! | id | every record | Only in the identity file |
//! | name[0].family | identity file | No |
//! | name[0].given[0] | identity file | No |

pub mod ndjson;
