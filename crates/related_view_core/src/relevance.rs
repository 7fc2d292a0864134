use std::collections::HashSet;

use crate::RecordId;

/// Identifiers of the records the view currently displays.
///
/// The set is only ever replaced as a whole, so it cannot drift away from the
/// last successful fetch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RelevanceTracker {
    ids: HashSet<RecordId>,
}

impl RelevanceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn replace_all<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = RecordId>,
    {
        // Build first, then swap, so the old set stays intact until the new one is complete.
        let next: HashSet<RecordId> = ids.into_iter().collect();
        self.ids = next;
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
