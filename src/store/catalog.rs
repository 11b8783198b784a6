use chrono::{DateTime, Utc};
use std::collections::HashSet;

use crate::models::Internship;

/// The most recent recommendation result, held in memory
///
/// A refresh replaces the whole list: ids are only unique within one fetch,
/// so records from different fetches are never merged.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<Internship>,
    fetched_at: Option<DateTime<Utc>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swaps in a fresh result set, keeping the first record for a repeated id
    pub fn replace(&mut self, records: Vec<Internship>) {
        let received = records.len();
        let mut seen = HashSet::new();

        self.records = records
            .into_iter()
            .filter(|record| seen.insert(record.id.clone()))
            .collect();
        self.fetched_at = Some(Utc::now());

        if self.records.len() != received {
            tracing::warn!(
                received,
                kept = self.records.len(),
                "Recommendation result repeated ids"
            );
        }
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.fetched_at = None;
    }

    pub fn records(&self) -> &[Internship] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&Internship> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    pub fn is_loaded(&self) -> bool {
        self.fetched_at.is_some()
    }
}
