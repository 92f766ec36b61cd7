//! Participant record store.
//!
//! # Responsibility
//! - Own the in-memory participant collection and its persisted slot.
//! - Be the single point of mutation; answer read-only queries.
//!
//! # Invariants
//! - Every successful mutation is followed by a full-slot write.
//! - Storage and decode failures never escape as errors from load/save;
//!   they surface as `LoadSource::Seeded` or a `false` persistence flag.
//! - Only logical outcomes (not found, validation, malformed import, id
//!   exhaustion) are returned as `StoreError`.

use crate::model::participant::{ParticipantId, ParticipantValidationError};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod record_store;
pub mod seed;

pub use record_store::RecordStore;

/// Slot name the browser build of the sign-up page used.
pub const DEFAULT_SLOT_KEY: &str = "artGalleryData";

pub type StoreResult<T> = Result<T, StoreError>;

/// Logical failure of a store operation.
#[derive(Debug)]
pub enum StoreError {
    Validation(ParticipantValidationError),
    NotFound(ParticipantId),
    /// Import payload is not a JSON array of valid participant records.
    MalformedImport(String),
    /// Collection could not be encoded as JSON.
    Encode(serde_json::Error),
    /// The highest stored id leaves no room for a successor.
    IdSpaceExhausted(ParticipantId),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "participant not found: {id}"),
            Self::MalformedImport(message) => write!(f, "malformed import payload: {message}"),
            Self::Encode(err) => write!(f, "failed to encode participants: {err}"),
            Self::IdSpaceExhausted(max_id) => {
                write!(f, "no participant id left after {max_id}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::NotFound(_) | Self::MalformedImport(_) | Self::IdSpaceExhausted(_) => None,
        }
    }
}

impl From<ParticipantValidationError> for StoreError {
    fn from(value: ParticipantValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Construction options for [`RecordStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Name of the slot the collection is persisted under.
    pub slot_key: String,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            slot_key: DEFAULT_SLOT_KEY.to_string(),
        }
    }
}

/// Where the current collection came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadSource {
    /// Decoded from the persisted slot.
    Persisted,
    /// Replaced by the seed dataset.
    Seeded(SeedReason),
    /// Replaced wholesale by `import_snapshot`.
    Imported,
}

/// Why the seed dataset was used instead of persisted state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedReason {
    /// Slot was never written.
    Missing,
    /// Slot holds an empty string.
    Empty,
    /// Storage read failed.
    Unavailable(String),
    /// Slot content does not decode to a valid collection.
    Malformed(String),
}

impl SeedReason {
    /// Stable short code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Empty => "empty",
            Self::Unavailable(_) => "unavailable",
            Self::Malformed(_) => "malformed",
        }
    }
}

/// Result of a mutating operation.
///
/// The in-memory mutation has always happened when a receipt is returned;
/// `persisted` reports whether the follow-up slot write succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReceipt<T> {
    pub value: T,
    pub persisted: bool,
}

/// Aggregate counts over the current collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryStats {
    pub total: usize,
    pub drawing_requests: usize,
    pub completed_info: usize,
    pub completed_drawings: usize,
}
