//! Rendering of ranked counts.
//!
//! All renderers are pure functions from the ranked entries to a `String`;
//! printing is left to the caller.
//!
//! ## Text Layout
//!
//! ```text
//! Patient Name: Lynch190Rosamond509
//! Patient ID: abc123
//!
//! RESOURCE_TYPE         COUNT
//! ------------------------------
//! Observation           3
//! Encounter             1
//! ```
//!
//! Both columns are left-justified to 22 characters. TSV and JSON renderings
//! carry the same rows for scripting.

pub mod render;
