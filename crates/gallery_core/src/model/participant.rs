//! Participant domain model.
//!
//! # Responsibility
//! - Define the canonical sign-up record shared by registration, info
//!   collection and drawing delivery.
//! - Define the shallow-merge patch applied by `RecordStore::update`.
//!
//! # Invariants
//! - `id` is positive and never reused within one collection.
//! - `name` is non-empty.
//! - Descriptive fields are `None` until info has been collected.
//! - `drawing_path` is `None` until a drawing is completed.

use super::timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Identifier assigned by the record store as `max(existing) + 1`.
pub type ParticipantId = u64;

/// One gallery sign-up entry.
///
/// Serialized field names are the persisted slot layout; absent optional
/// fields are omitted rather than written as `null`. Keys this build does
/// not know are kept in `extra` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantRecord {
    pub id: ParticipantId,
    pub name: String,
    /// Free-form, never validated.
    pub phone: String,
    pub wants_drawing: bool,
    #[serde(default)]
    pub drawing_completed: bool,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub info_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hair_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eye_color: Option<String>,
    /// Usually a CSS hex color picked in the info form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorite_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skin_tone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hair_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clothing: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_notes: Option<String>,
    /// URI of the finished drawing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drawing_path: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Caller input for creating a participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewParticipant {
    pub name: String,
    pub phone: String,
    pub wants_drawing: bool,
}

impl NewParticipant {
    pub fn new(name: impl Into<String>, phone: impl Into<String>, wants_drawing: bool) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            wants_drawing,
        }
    }
}

/// Partial field set for `RecordStore::update`.
///
/// `None` preserves the stored value and `Some` overwrites it. Optional
/// record fields take `Some(None)` to clear them, which a decoded patch
/// spells as an explicit `null`. There is no field for `id` or
/// `created_at`, and unknown keys are rejected when a patch is decoded, so
/// neither can be changed through a merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParticipantPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wants_drawing: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drawing_completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info_completed: Option<bool>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub hair_color: Option<Option<String>>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub eye_color: Option<Option<String>>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub favorite_color: Option<Option<String>>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub skin_tone: Option<Option<String>>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub hair_style: Option<Option<String>>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub clothing: Option<Option<String>>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub additional_notes: Option<Option<String>>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub drawing_path: Option<Option<String>>,
}

/// Maps a key that is present, `null` included, to `Some`.
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl ParticipantPatch {
    /// Returns a copy of `record` with every present patch field overwritten.
    pub fn apply_to(&self, record: &ParticipantRecord) -> ParticipantRecord {
        fn pick<T: Clone>(patch: &Option<T>, current: &T) -> T {
            patch.as_ref().unwrap_or(current).clone()
        }

        ParticipantRecord {
            id: record.id,
            name: pick(&self.name, &record.name),
            phone: pick(&self.phone, &record.phone),
            wants_drawing: pick(&self.wants_drawing, &record.wants_drawing),
            drawing_completed: pick(&self.drawing_completed, &record.drawing_completed),
            created_at: record.created_at,
            info_completed: pick(&self.info_completed, &record.info_completed),
            hair_color: pick(&self.hair_color, &record.hair_color),
            eye_color: pick(&self.eye_color, &record.eye_color),
            favorite_color: pick(&self.favorite_color, &record.favorite_color),
            skin_tone: pick(&self.skin_tone, &record.skin_tone),
            hair_style: pick(&self.hair_style, &record.hair_style),
            clothing: pick(&self.clothing, &record.clothing),
            additional_notes: pick(&self.additional_notes, &record.additional_notes),
            drawing_path: pick(&self.drawing_path, &record.drawing_path),
            extra: record.extra.clone(),
        }
    }
}

/// Descriptive details gathered from a participant who asked for a drawing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticipantInfo {
    pub hair_color: String,
    pub eye_color: String,
    pub favorite_color: String,
    pub skin_tone: String,
    pub hair_style: String,
    pub clothing: String,
    pub additional_notes: Option<String>,
}

impl ParticipantInfo {
    /// Converts the form values into a patch that also marks info complete.
    ///
    /// Blank values leave the stored field untouched.
    pub fn into_patch(self) -> ParticipantPatch {
        ParticipantPatch {
            info_completed: Some(true),
            hair_color: non_blank(self.hair_color).map(Some),
            eye_color: non_blank(self.eye_color).map(Some),
            favorite_color: non_blank(self.favorite_color).map(Some),
            skin_tone: non_blank(self.skin_tone).map(Some),
            hair_style: non_blank(self.hair_style).map(Some),
            clothing: non_blank(self.clothing).map(Some),
            additional_notes: self.additional_notes.and_then(non_blank).map(Some),
            ..ParticipantPatch::default()
        }
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl ParticipantRecord {
    /// Builds a freshly registered record.
    ///
    /// `info_completed` starts `true` only for participants who do not want
    /// a drawing, since nothing else needs to be collected from them.
    pub fn register(id: ParticipantId, input: NewParticipant, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: input.name,
            phone: input.phone,
            wants_drawing: input.wants_drawing,
            drawing_completed: false,
            created_at,
            info_completed: !input.wants_drawing,
            hair_color: None,
            eye_color: None,
            favorite_color: None,
            skin_tone: None,
            hair_style: None,
            clothing: None,
            additional_notes: None,
            drawing_path: None,
            extra: Map::new(),
        }
    }

    /// Checks single-record invariants.
    pub fn validate(&self) -> Result<(), ParticipantValidationError> {
        if self.id == 0 {
            return Err(ParticipantValidationError::ZeroId);
        }
        if self.name.trim().is_empty() {
            return Err(ParticipantValidationError::EmptyName(self.id));
        }
        Ok(())
    }

    /// Returns the ISO 8601 form of `created_at` as persisted.
    pub fn created_at_iso(&self) -> String {
        timestamp::format(&self.created_at)
    }

    /// Whether this participant is waiting on the artist.
    pub fn awaits_drawing(&self) -> bool {
        self.wants_drawing && self.info_completed && !self.drawing_completed
    }
}

/// Checks record invariants plus id uniqueness across a whole collection.
pub fn validate_collection(records: &[ParticipantRecord]) -> Result<(), ParticipantValidationError> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        record.validate()?;
        if !seen.insert(record.id) {
            return Err(ParticipantValidationError::DuplicateId(record.id));
        }
    }
    Ok(())
}

/// Invariant violations on a participant record or collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParticipantValidationError {
    ZeroId,
    /// Carries the offending id; `0` for records not yet assigned one.
    EmptyName(ParticipantId),
    DuplicateId(ParticipantId),
}

impl Display for ParticipantValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroId => write!(f, "participant id must be positive"),
            Self::EmptyName(id) => write!(f, "participant {id} has an empty name"),
            Self::DuplicateId(id) => write!(f, "participant id {id} appears more than once"),
        }
    }
}

impl Error for ParticipantValidationError {}
