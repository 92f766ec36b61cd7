//! Core domain logic for the gallery sign-up record store.
//! This crate is the single source of truth for participant invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod search;
pub mod service;
pub mod storage;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status, LogLevel};
pub use model::participant::{
    validate_collection, NewParticipant, ParticipantId, ParticipantInfo, ParticipantPatch,
    ParticipantRecord, ParticipantValidationError,
};
pub use search::requests::DrawingRequestSearch;
pub use service::gallery_service::{GalleryService, GalleryServiceError, GalleryServiceResult};
pub use storage::{
    MemorySlotStorage, SlotStorage, SqliteSlotStorage, StorageError, StorageResult,
    DEFAULT_QUOTA_BYTES,
};
pub use store::seed::seed_records;
pub use store::{
    GalleryStats, LoadSource, RecordStore, SeedReason, StoreError, StoreOptions, StoreResult,
    WriteReceipt, DEFAULT_SLOT_KEY,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
