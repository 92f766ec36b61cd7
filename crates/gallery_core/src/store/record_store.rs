//! `RecordStore` implementation.
//!
//! The store is single-threaded: mutations take `&mut self`, and the
//! bundled storage backends are not `Sync`. A multi-threaded host must put
//! the store behind its own lock.

use super::seed::seed_records;
use super::{
    GalleryStats, LoadSource, SeedReason, StoreError, StoreOptions, StoreResult, WriteReceipt,
};
use crate::model::participant::{
    validate_collection, NewParticipant, ParticipantId, ParticipantPatch, ParticipantRecord,
    ParticipantValidationError,
};
use crate::search::requests::DrawingRequestSearch;
use crate::storage::SlotStorage;
use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};

/// Source of `created_at` values for new registrations.
pub type Clock = fn() -> DateTime<Utc>;

/// Sole owner of the participant collection and its persisted slot.
pub struct RecordStore<S: SlotStorage> {
    storage: S,
    options: StoreOptions,
    records: Vec<ParticipantRecord>,
    load_source: LoadSource,
    clock: Clock,
}

impl<S: SlotStorage> RecordStore<S> {
    /// Loads the collection from the default slot.
    pub fn open(storage: S) -> Self {
        Self::open_with(storage, StoreOptions::default())
    }

    /// Loads the collection from `options.slot_key`.
    ///
    /// Never fails: absent, empty, unreadable or malformed slots yield the
    /// seed dataset, reported through [`RecordStore::load_source`].
    pub fn open_with(storage: S, options: StoreOptions) -> Self {
        let (records, load_source) = load_collection(&storage, &options.slot_key);
        Self {
            storage,
            options,
            records,
            load_source,
            clock: Utc::now,
        }
    }

    /// Replaces the timestamp source used by [`RecordStore::add`].
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Discards in-memory state and loads the slot again.
    pub fn reload(&mut self) -> &LoadSource {
        let (records, load_source) = load_collection(&self.storage, &self.options.slot_key);
        self.records = records;
        self.load_source = load_source;
        &self.load_source
    }

    pub fn load_source(&self) -> &LoadSource {
        &self.load_source
    }

    pub fn slot_key(&self) -> &str {
        &self.options.slot_key
    }

    /// Writes the full collection to the slot.
    ///
    /// Returns `false` on encode or storage failure; the in-memory
    /// collection is left as is either way.
    pub fn save(&self) -> bool {
        let payload = match serde_json::to_string(&self.records) {
            Ok(payload) => payload,
            Err(err) => {
                error!(
                    "event=store_save module=store status=error error_code=encode_failed error={err}"
                );
                return false;
            }
        };

        match self.storage.write(&self.options.slot_key, &payload) {
            Ok(()) => {
                debug!(
                    "event=store_save module=store status=ok records={} bytes={}",
                    self.records.len(),
                    payload.len()
                );
                true
            }
            Err(err) => {
                error!(
                    "event=store_save module=store status=error error_code={} error={err}",
                    err.code()
                );
                false
            }
        }
    }

    /// Registers a participant and persists.
    ///
    /// # Contract
    /// - `id = max(existing ids ∪ {0}) + 1`.
    /// - `drawing_completed = false`, `info_completed = !wants_drawing`.
    /// - Appended at the end of the collection.
    ///
    /// # Errors
    /// - `Validation` when `name` is blank.
    /// - `IdSpaceExhausted` when the collection already holds `u64::MAX`.
    pub fn add(&mut self, input: NewParticipant) -> StoreResult<WriteReceipt<ParticipantRecord>> {
        if input.name.trim().is_empty() {
            return Err(ParticipantValidationError::EmptyName(0).into());
        }

        let id = self.next_id()?;
        let record = ParticipantRecord::register(id, input, (self.clock)());
        self.records.push(record.clone());
        let persisted = self.save();
        info!(
            "event=participant_add module=store status=ok id={} wants_drawing={} persisted={persisted}",
            record.id, record.wants_drawing
        );

        Ok(WriteReceipt {
            value: record,
            persisted,
        })
    }

    /// Shallow-merges `patch` into the record with `id` and persists.
    ///
    /// # Errors
    /// - `NotFound` when no record has `id`; nothing is written.
    /// - `Validation` when the merge would blank the name; nothing is written.
    pub fn update(
        &mut self,
        id: ParticipantId,
        patch: &ParticipantPatch,
    ) -> StoreResult<WriteReceipt<ParticipantRecord>> {
        let Some(index) = self.records.iter().position(|record| record.id == id) else {
            debug!("event=participant_update module=store status=not_found id={id}");
            return Err(StoreError::NotFound(id));
        };

        let merged = patch.apply_to(&self.records[index]);
        merged.validate()?;
        self.records[index] = merged.clone();
        let persisted = self.save();
        info!("event=participant_update module=store status=ok id={id} persisted={persisted}");

        Ok(WriteReceipt {
            value: merged,
            persisted,
        })
    }

    /// Drawing requests whose name contains `term`, ignoring case.
    ///
    /// Lazy and recomputed on every call; an empty term yields every
    /// drawing request.
    pub fn search<'a>(&'a self, term: &str) -> DrawingRequestSearch<'a> {
        DrawingRequestSearch::new(&self.records, term)
    }

    /// The whole collection in display order.
    pub fn get_all(&self) -> &[ParticipantRecord] {
        &self.records
    }

    pub fn get_by_id(&self, id: ParticipantId) -> Option<&ParticipantRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn stats(&self) -> GalleryStats {
        self.records
            .iter()
            .fold(GalleryStats::default(), |mut stats, record| {
                stats.total += 1;
                stats.drawing_requests += usize::from(record.wants_drawing);
                stats.completed_info += usize::from(record.info_completed);
                stats.completed_drawings += usize::from(record.drawing_completed);
                stats
            })
    }

    /// Pretty-printed JSON of the collection, for external backup.
    pub fn export_snapshot(&self) -> StoreResult<String> {
        serde_json::to_string_pretty(&self.records).map_err(StoreError::Encode)
    }

    /// Replaces the collection with a snapshot and persists.
    ///
    /// Returns the number of imported records.
    ///
    /// # Errors
    /// - `MalformedImport` when `text` is not a JSON array of valid records;
    ///   the collection is left untouched.
    pub fn import_snapshot(&mut self, text: &str) -> StoreResult<WriteReceipt<usize>> {
        let records = decode_collection(text).map_err(|message| {
            warn!("event=store_import module=store status=rejected error_code=malformed_import");
            StoreError::MalformedImport(message)
        })?;

        let count = records.len();
        self.records = records;
        self.load_source = LoadSource::Imported;
        let persisted = self.save();
        info!("event=store_import module=store status=ok records={count} persisted={persisted}");

        Ok(WriteReceipt {
            value: count,
            persisted,
        })
    }

    /// Flushes the collection and hands the storage back.
    ///
    /// Returns the storage and whether the final write succeeded.
    pub fn close(self) -> (S, bool) {
        let persisted = self.save();
        (self.storage, persisted)
    }

    fn next_id(&self) -> StoreResult<ParticipantId> {
        let max_id = self.records.iter().map(|record| record.id).max().unwrap_or(0);
        max_id.checked_add(1).ok_or_else(|| {
            warn!(
                "event=participant_add module=store status=rejected error_code=id_space_exhausted"
            );
            StoreError::IdSpaceExhausted(max_id)
        })
    }
}

fn load_collection<S: SlotStorage>(
    storage: &S,
    slot_key: &str,
) -> (Vec<ParticipantRecord>, LoadSource) {
    let reason = match storage.read(slot_key) {
        Ok(Some(raw)) if raw.is_empty() => SeedReason::Empty,
        Ok(Some(raw)) => match decode_collection(&raw) {
            Ok(records) => {
                info!(
                    "event=store_load module=store status=ok source=persisted records={}",
                    records.len()
                );
                return (records, LoadSource::Persisted);
            }
            Err(message) => SeedReason::Malformed(message),
        },
        Ok(None) => SeedReason::Missing,
        Err(err) => SeedReason::Unavailable(err.to_string()),
    };

    let records = seed_records();
    match reason {
        SeedReason::Missing | SeedReason::Empty => info!(
            "event=store_load module=store status=ok source=seed reason={} records={}",
            reason.code(),
            records.len()
        ),
        SeedReason::Unavailable(_) | SeedReason::Malformed(_) => warn!(
            "event=store_load module=store status=fallback source=seed reason={} records={}",
            reason.code(),
            records.len()
        ),
    }
    (records, LoadSource::Seeded(reason))
}

/// Decodes a JSON array of records and checks collection invariants.
fn decode_collection(text: &str) -> Result<Vec<ParticipantRecord>, String> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|err| format!("invalid JSON: {err}"))?;
    if !value.is_array() {
        return Err("expected a JSON array of participants".to_string());
    }

    let records: Vec<ParticipantRecord> =
        serde_json::from_value(value).map_err(|err| format!("invalid participant: {err}"))?;
    validate_collection(&records).map_err(|err| err.to_string())?;
    Ok(records)
}
