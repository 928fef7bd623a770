use serde::Serialize;

use crate::core::types::ResourceType;
use crate::tally::counts::TallySnapshot;

/// One row of the ranked result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    pub resource_type: ResourceType,
    pub count: u64,
}

/// Order the tally by count, highest first.
///
/// Equal counts are ordered by resource type name so that the same tally
/// always produces the same sequence.
#[must_use]
pub fn rank(tally: &TallySnapshot) -> Vec<RankedEntry> {
    let mut entries: Vec<RankedEntry> = tally
        .iter()
        .map(|(resource_type, count)| RankedEntry {
            resource_type: resource_type.clone(),
            count,
        })
        .collect();

    entries.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.resource_type.cmp(&b.resource_type))
    });

    entries
}
