//! Name search over drawing requests.
//!
//! # Responsibility
//! - Filter a participant slice lazily, without copying records.
//!
//! # Invariants
//! - Only participants with `wants_drawing = true` are yielded.
//! - Matching is a case-insensitive substring test on `name`.
//! - Yield order is collection order.

use crate::model::participant::ParticipantRecord;
use std::slice::Iter;

/// Lazy iterator returned by `RecordStore::search`.
///
/// Each call to `search` builds a fresh iterator, so results always reflect
/// the collection at call time.
#[derive(Debug, Clone)]
pub struct DrawingRequestSearch<'a> {
    records: Iter<'a, ParticipantRecord>,
    needle: String,
}

impl<'a> DrawingRequestSearch<'a> {
    pub fn new(records: &'a [ParticipantRecord], term: &str) -> Self {
        Self {
            records: records.iter(),
            needle: term.to_lowercase(),
        }
    }
}

impl<'a> Iterator for DrawingRequestSearch<'a> {
    type Item = &'a ParticipantRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let needle = self.needle.as_str();
        self.records
            .by_ref()
            .find(|record| record.wants_drawing && name_matches(&record.name, needle))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.records.size_hint().1)
    }
}

/// Tests `name` against an already lowercased needle.
pub fn name_matches(name: &str, lowered_needle: &str) -> bool {
    lowered_needle.is_empty() || name.to_lowercase().contains(lowered_needle)
}
