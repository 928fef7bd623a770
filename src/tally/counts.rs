use std::collections::HashMap;

use crate::core::types::ResourceType;

/// Running count of matched records per resource type.
///
/// Every match increments exactly one category by exactly one. Categories
/// are never removed. [`Tally::finalize`] consumes the tally, so no further
/// increments are possible afterwards.
#[derive(Debug, Clone, Default)]
pub struct Tally {
    counts: HashMap<ResourceType, u64>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one match for a resource type
    pub fn increment(&mut self, resource_type: ResourceType) {
        *self.counts.entry(resource_type).or_insert(0) += 1;
    }

    /// Add another tally's counts into this one.
    ///
    /// Merging is commutative and associative, so per-file tallies can be
    /// combined in any order.
    pub fn merge(&mut self, other: Tally) {
        for (resource_type, count) in other.counts {
            *self.counts.entry(resource_type).or_insert(0) += count;
        }
    }

    #[must_use]
    pub fn finalize(self) -> TallySnapshot {
        TallySnapshot {
            counts: self.counts,
        }
    }
}

/// The final, read-only counts of a scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TallySnapshot {
    counts: HashMap<ResourceType, u64>,
}

impl TallySnapshot {
    /// Count for a resource type, zero if it was never seen
    #[must_use]
    pub fn get(&self, resource_type: &ResourceType) -> u64 {
        self.counts.get(resource_type).copied().unwrap_or(0)
    }

    /// Sum of all counts
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ResourceType, u64)> {
        self.counts.iter().map(|(k, v)| (k, *v))
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for TallySnapshot {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        Self {
            counts: iter
                .into_iter()
                .map(|(name, count)| (ResourceType::new(name), count))
                .collect(),
        }
    }
}
