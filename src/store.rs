use crate::models::Tender;
use std::collections::BTreeMap;

/// Identifier-keyed collection of tenders for one run.
///
/// A later sighting of an id replaces the earlier record wholesale. Iteration is
/// in id order so artifacts written from the store are reproducible.
#[derive(Debug, Default)]
pub struct MergeStore {
    tenders: BTreeMap<String, Tender>,
}

impl MergeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `tender`, replacing any record stored under the same id.
    ///
    /// Returns `true` if an earlier record was replaced.
    pub fn upsert(&mut self, tender: Tender) -> bool {
        self.tenders.insert(tender.id.clone(), tender).is_some()
    }

    /// Record currently stored under `id`.
    pub fn get(&self, id: &str) -> Option<&Tender> {
        self.tenders.get(id)
    }

    pub fn values(&self) -> impl Iterator<Item = &Tender> {
        self.tenders.values()
    }

    pub fn len(&self) -> usize {
        self.tenders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tenders.is_empty()
    }
}
