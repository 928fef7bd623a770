//! Count aggregation, ranking and the end-to-end counting engine.
//!
//! This module provides the core counting functionality:
//!
//! - [`CountingEngine`](engine::CountingEngine): Main entry point, runs a whole count for one patient
//! - [`Tally`](counts::Tally): Per-resource-type match counts, mergeable across files
//! - [`rank`](rank::rank): Orders a finalized tally for reporting
//!
//! ## Run Sequence
//!
//! 1. **Discovery**: list the record files in the export directory
//! 2. **Identity**: resolve the ID or name against the identity file
//! 3. **Scan**: stream each file, pre-filter lines, tally matches per file
//! 4. **Rank**: sort by count descending, ties by resource type name
//!
//! ## Example
//!
//! ```rust,no_run
//! use fhir_tally::{CountingEngine, IdentityQuery, ScanConfig};
//!
//! let config = ScanConfig::new("export/");
//! let summary = CountingEngine::new(&config)
//!     .run(&IdentityQuery::by_id("abc123"))
//!     .unwrap();
//!
//! for entry in &summary.ranked {
//!     println!("{}: {}", entry.resource_type, entry.count);
//! }
//! ```

pub mod counts;
pub mod engine;
pub mod rank;
