//! Sign-up workflow service.
//!
//! # Responsibility
//! - Map the three workflow steps (register, collect info, deliver drawing)
//!   onto record store mutations.
//! - Normalize form input before it reaches the store.
//!
//! # Invariants
//! - Service APIs never bypass the store; every write goes through
//!   `RecordStore::add`/`update`/`import_snapshot`.
//! - The service borrows the store, so the caller decides its lifetime.

use crate::model::participant::{
    NewParticipant, ParticipantId, ParticipantInfo, ParticipantPatch, ParticipantRecord,
};
use crate::search::requests::DrawingRequestSearch;
use crate::storage::SlotStorage;
use crate::store::{GalleryStats, RecordStore, StoreError, StoreResult, WriteReceipt};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for workflow use-cases.
#[derive(Debug)]
pub enum GalleryServiceError {
    /// A drawing was recorded without a location.
    EmptyDrawingPath,
    /// Info or a drawing was submitted for someone who never asked for one.
    DrawingNotRequested(ParticipantId),
    Store(StoreError),
}

impl Display for GalleryServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDrawingPath => write!(f, "drawing path cannot be empty"),
            Self::DrawingNotRequested(id) => {
                write!(f, "participant {id} did not request a drawing")
            }
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for GalleryServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for GalleryServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

pub type GalleryServiceResult<T> = Result<T, GalleryServiceError>;

/// Use-case wrapper over a borrowed [`RecordStore`].
pub struct GalleryService<'store, S: SlotStorage> {
    store: &'store mut RecordStore<S>,
}

impl<'store, S: SlotStorage> GalleryService<'store, S> {
    pub fn new(store: &'store mut RecordStore<S>) -> Self {
        Self { store }
    }

    /// Registers a participant from the sign-up form.
    ///
    /// Name and phone are trimmed; phone is otherwise taken as given.
    pub fn register(
        &mut self,
        name: &str,
        phone: &str,
        wants_drawing: bool,
    ) -> GalleryServiceResult<WriteReceipt<ParticipantRecord>> {
        let input = NewParticipant::new(name.trim(), phone.trim(), wants_drawing);
        Ok(self.store.add(input)?)
    }

    /// Stores descriptive info and marks it complete.
    pub fn complete_info(
        &mut self,
        id: ParticipantId,
        info: ParticipantInfo,
    ) -> GalleryServiceResult<WriteReceipt<ParticipantRecord>> {
        self.ensure_drawing_requested(id)?;
        Ok(self.store.update(id, &info.into_patch())?)
    }

    /// Attaches a finished drawing and marks it complete.
    pub fn record_drawing(
        &mut self,
        id: ParticipantId,
        drawing_path: &str,
    ) -> GalleryServiceResult<WriteReceipt<ParticipantRecord>> {
        let drawing_path = drawing_path.trim();
        if drawing_path.is_empty() {
            return Err(GalleryServiceError::EmptyDrawingPath);
        }
        self.ensure_drawing_requested(id)?;

        let patch = ParticipantPatch {
            drawing_completed: Some(true),
            drawing_path: Some(Some(drawing_path.to_string())),
            ..ParticipantPatch::default()
        };
        Ok(self.store.update(id, &patch)?)
    }

    /// Participants with complete info still waiting for their drawing.
    pub fn pending_drawings(&self) -> Vec<&ParticipantRecord> {
        self.store
            .get_all()
            .iter()
            .filter(|record| record.awaits_drawing())
            .collect()
    }

    pub fn search(&self, term: &str) -> DrawingRequestSearch<'_> {
        self.store.search(term.trim())
    }

    pub fn get(&self, id: ParticipantId) -> Option<&ParticipantRecord> {
        self.store.get_by_id(id)
    }

    pub fn stats(&self) -> GalleryStats {
        self.store.stats()
    }

    pub fn export(&self) -> StoreResult<String> {
        self.store.export_snapshot()
    }

    pub fn import(&mut self, text: &str) -> StoreResult<WriteReceipt<usize>> {
        self.store.import_snapshot(text)
    }

    fn ensure_drawing_requested(&self, id: ParticipantId) -> GalleryServiceResult<()> {
        match self.store.get_by_id(id) {
            None => Err(StoreError::NotFound(id).into()),
            Some(record) if !record.wants_drawing => {
                Err(GalleryServiceError::DrawingNotRequested(id))
            }
            Some(_) => Ok(()),
        }
    }
}
