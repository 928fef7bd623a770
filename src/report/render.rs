use std::fmt;

use serde::Serialize;

use crate::core::types::PatientId;
use crate::tally::rank::RankedEntry;

/// Width of each column in the text table
const COLUMN_WIDTH: usize = 22;

/// Length of the dashed rule under the column headers
const RULE_WIDTH: usize = 30;

/// The human-readable report: patient header followed by the count table
pub struct TextReport<'a> {
    pub ranked: &'a [RankedEntry],
    pub id: &'a PatientId,
    pub display_name: &'a str,
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Patient Name: {}", self.display_name)?;
        writeln!(f, "Patient ID: {}", self.id)?;
        writeln!(f)?;
        writeln!(
            f,
            "{:<width$}{:<width$}",
            "RESOURCE_TYPE",
            "COUNT",
            width = COLUMN_WIDTH
        )?;
        writeln!(f, "{}", "-".repeat(RULE_WIDTH))?;
        for entry in self.ranked {
            writeln!(
                f,
                "{:<width$}{:<width$}",
                entry.resource_type.as_str(),
                entry.count,
                width = COLUMN_WIDTH
            )?;
        }
        Ok(())
    }
}

/// Tab-separated counts with a header row
pub struct TsvReport<'a> {
    pub ranked: &'a [RankedEntry],
}

impl fmt::Display for TsvReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "resource_type\tcount")?;
        for entry in self.ranked {
            writeln!(f, "{}\t{}", entry.resource_type, entry.count)?;
        }
        Ok(())
    }
}

/// Render the ranked counts as the human-readable table
#[must_use]
pub fn render_text(ranked: &[RankedEntry], id: &PatientId, display_name: &str) -> String {
    TextReport {
        ranked,
        id,
        display_name,
    }
    .to_string()
}

/// Render the ranked counts as tab-separated values with a header row
#[must_use]
pub fn render_tsv(ranked: &[RankedEntry]) -> String {
    TsvReport { ranked }.to_string()
}

#[derive(Serialize)]
struct JsonPatient<'a> {
    id: &'a PatientId,
    name: &'a str,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    patient: JsonPatient<'a>,
    total: u64,
    resources: &'a [RankedEntry],
}

/// Render the ranked counts as a pretty-printed JSON document
///
/// # Errors
///
/// Returns a serialization error from `serde_json`.
pub fn render_json(
    ranked: &[RankedEntry],
    id: &PatientId,
    display_name: &str,
) -> Result<String, serde_json::Error> {
    let report = JsonReport {
        patient: JsonPatient {
            id,
            name: display_name,
        },
        total: ranked.iter().map(|e| e.count).sum(),
        resources: ranked,
    };
    serde_json::to_string_pretty(&report)
}
