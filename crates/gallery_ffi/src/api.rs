//! FFI use-case API for the sign-up UI.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Turn store outcomes into the human-readable messages the UI shows.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every call opens the store, runs one use-case, and drops it; calls are
//!   serialized by a process-wide lock because each write replaces the
//!   whole slot.
//! - A mutation whose slot write failed is reported as `ok = false`: the
//!   per-call store is dropped, so nothing of it outlives the call.

use crate::upload::upload_problems;
use gallery_core::db::open_db;
use gallery_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    GalleryService, ParticipantInfo, ParticipantRecord, RecordStore, SqliteSlotStorage,
    WriteReceipt,
};
use log::warn;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock, PoisonError};

const STORE_DB_FILE_NAME: &str = "gallery_store.sqlite3";
const STORE_DB_PATH_ENV: &str = "GALLERY_DB_PATH";

static STORE_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static STORE_LOCK: Mutex<()> = Mutex::new(());

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Outcome of a mutating gallery call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryActionResponse {
    /// Whether the operation was applied and saved.
    pub ok: bool,
    /// Affected participant, when the call targets one.
    pub participant_id: Option<u64>,
    /// Message for the notification surface.
    pub message: String,
}

impl GalleryActionResponse {
    fn from_receipt<T>(
        receipt: &WriteReceipt<T>,
        operation: &str,
        participant_id: Option<u64>,
        done: &str,
    ) -> Self {
        if !receipt.persisted {
            warn!("event={operation} module=ffi status=error error_code=save_failed");
            return Self::failure(format!(
                "{operation} failed: changes could not be saved to storage"
            ));
        }
        Self {
            ok: true,
            participant_id,
            message: done.to_string(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            participant_id: None,
            message: message.into(),
        }
    }
}

/// One row in the drawing request list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GallerySearchItem {
    pub participant_id: u64,
    pub name: String,
    pub info_completed: bool,
    pub drawing_completed: bool,
    pub drawing_path: Option<String>,
}

/// Search response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GallerySearchResponse {
    pub items: Vec<GallerySearchItem>,
    pub message: String,
}

/// Dashboard counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryStatsResponse {
    pub ok: bool,
    pub total: u64,
    pub drawing_requests: u64,
    pub completed_info: u64,
    pub completed_drawings: u64,
    pub message: String,
}

/// Backup export envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryExportResponse {
    pub ok: bool,
    /// Pretty-printed JSON array when `ok`.
    pub snapshot: Option<String>,
    pub message: String,
}

/// Result of checking a drawing file before upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCheckResponse {
    pub ok: bool,
    /// One message per failed check.
    pub problems: Vec<String>,
}

/// Registers a participant from the sign-up form.
#[flutter_rust_bridge::frb(sync)]
pub fn gallery_register(name: String, phone: String, wants_drawing: bool) -> GalleryActionResponse {
    register_in(&resolve_store_db_path(), &name, &phone, wants_drawing)
}

/// Saves descriptive info for a drawing request.
#[allow(clippy::too_many_arguments)]
#[flutter_rust_bridge::frb(sync)]
pub fn gallery_update_info(
    participant_id: u64,
    hair_color: String,
    eye_color: String,
    favorite_color: String,
    skin_tone: String,
    hair_style: String,
    clothing: String,
    additional_notes: Option<String>,
) -> GalleryActionResponse {
    let info = ParticipantInfo {
        hair_color,
        eye_color,
        favorite_color,
        skin_tone,
        hair_style,
        clothing,
        additional_notes,
    };
    update_info_in(&resolve_store_db_path(), participant_id, info)
}

/// Attaches a finished drawing to a participant.
#[flutter_rust_bridge::frb(sync)]
pub fn gallery_record_drawing(participant_id: u64, drawing_path: String) -> GalleryActionResponse {
    record_drawing_in(&resolve_store_db_path(), participant_id, &drawing_path)
}

/// Lists drawing requests whose name contains `text`.
#[flutter_rust_bridge::frb(sync)]
pub fn gallery_search(text: String) -> GallerySearchResponse {
    search_in(&resolve_store_db_path(), &text)
}

#[flutter_rust_bridge::frb(sync)]
pub fn gallery_stats() -> GalleryStatsResponse {
    stats_in(&resolve_store_db_path())
}

#[flutter_rust_bridge::frb(sync)]
pub fn gallery_export() -> GalleryExportResponse {
    export_in(&resolve_store_db_path())
}

/// Replaces all participants with a previously exported snapshot.
#[flutter_rust_bridge::frb(sync)]
pub fn gallery_import(snapshot: String) -> GalleryActionResponse {
    import_in(&resolve_store_db_path(), &snapshot)
}

/// Checks a drawing file's MIME type and size.
#[flutter_rust_bridge::frb(sync)]
pub fn validate_drawing_upload(mime_type: String, size_bytes: u64) -> UploadCheckResponse {
    let problems = upload_problems(&mime_type, size_bytes)
        .into_iter()
        .map(str::to_string)
        .collect::<Vec<_>>();
    UploadCheckResponse {
        ok: problems.is_empty(),
        problems,
    }
}

fn register_in(
    db_path: &Path,
    name: &str,
    phone: &str,
    wants_drawing: bool,
) -> GalleryActionResponse {
    let result = with_gallery_service(db_path, |service| {
        service
            .register(name, phone, wants_drawing)
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(receipt) => GalleryActionResponse::from_receipt(
            &receipt,
            "gallery_register",
            Some(receipt.value.id),
            "Registration saved.",
        ),
        Err(err) => GalleryActionResponse::failure(format!("gallery_register failed: {err}")),
    }
}

fn update_info_in(db_path: &Path, participant_id: u64, info: ParticipantInfo) -> GalleryActionResponse {
    let result = with_gallery_service(db_path, |service| {
        service
            .complete_info(participant_id, info)
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(receipt) => GalleryActionResponse::from_receipt(
            &receipt,
            "gallery_update_info",
            Some(participant_id),
            "Info saved.",
        ),
        Err(err) => GalleryActionResponse::failure(format!("gallery_update_info failed: {err}")),
    }
}

fn record_drawing_in(db_path: &Path, participant_id: u64, drawing_path: &str) -> GalleryActionResponse {
    let result = with_gallery_service(db_path, |service| {
        service
            .record_drawing(participant_id, drawing_path)
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(receipt) => GalleryActionResponse::from_receipt(
            &receipt,
            "gallery_record_drawing",
            Some(participant_id),
            "Drawing recorded.",
        ),
        Err(err) => {
            GalleryActionResponse::failure(format!("gallery_record_drawing failed: {err}"))
        }
    }
}

fn search_in(db_path: &Path, text: &str) -> GallerySearchResponse {
    let result = with_gallery_service(db_path, |service| {
        Ok(service.search(text).map(to_search_item).collect::<Vec<_>>())
    });
    match result {
        Ok(items) => {
            let message = if items.is_empty() {
                "No results.".to_string()
            } else {
                format!("Found {} result(s).", items.len())
            };
            GallerySearchResponse { items, message }
        }
        Err(err) => GallerySearchResponse {
            items: Vec::new(),
            message: format!("gallery_search failed: {err}"),
        },
    }
}

fn stats_in(db_path: &Path) -> GalleryStatsResponse {
    match with_gallery_service(db_path, |service| Ok(service.stats())) {
        Ok(stats) => GalleryStatsResponse {
            ok: true,
            total: stats.total as u64,
            drawing_requests: stats.drawing_requests as u64,
            completed_info: stats.completed_info as u64,
            completed_drawings: stats.completed_drawings as u64,
            message: String::new(),
        },
        Err(err) => GalleryStatsResponse {
            ok: false,
            total: 0,
            drawing_requests: 0,
            completed_info: 0,
            completed_drawings: 0,
            message: format!("gallery_stats failed: {err}"),
        },
    }
}

fn export_in(db_path: &Path) -> GalleryExportResponse {
    match with_gallery_service(db_path, |service| service.export().map_err(|err| err.to_string())) {
        Ok(snapshot) => GalleryExportResponse {
            ok: true,
            snapshot: Some(snapshot),
            message: "Export ready.".to_string(),
        },
        Err(err) => GalleryExportResponse {
            ok: false,
            snapshot: None,
            message: format!("gallery_export failed: {err}"),
        },
    }
}

fn import_in(db_path: &Path, snapshot: &str) -> GalleryActionResponse {
    let result = with_gallery_service(db_path, |service| {
        service.import(snapshot).map_err(|err| err.to_string())
    });
    match result {
        Ok(receipt) => {
            let done = format!("Imported {} participant(s).", receipt.value);
            GalleryActionResponse::from_receipt(&receipt, "gallery_import", None, &done)
        }
        Err(err) => GalleryActionResponse::failure(format!("gallery_import failed: {err}")),
    }
}

fn resolve_store_db_path() -> PathBuf {
    STORE_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(STORE_DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(STORE_DB_FILE_NAME)
        })
        .clone()
}

fn with_gallery_service<T>(
    db_path: &Path,
    f: impl FnOnce(&mut GalleryService<'_, SqliteSlotStorage<'_>>) -> Result<T, String>,
) -> Result<T, String> {
    let _guard = STORE_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let conn = open_db(db_path).map_err(|err| format!("store DB open failed: {err}"))?;
    let storage = SqliteSlotStorage::try_new(&conn)
        .map_err(|err| format!("slot storage init failed: {err}"))?;
    let mut store = RecordStore::open(storage);
    if let gallery_core::LoadSource::Seeded(reason) = store.load_source() {
        warn!(
            "event=ffi_store_open module=ffi status=seeded reason={}",
            reason.code()
        );
    }
    let mut service = GalleryService::new(&mut store);
    f(&mut service)
}

fn to_search_item(record: &ParticipantRecord) -> GallerySearchItem {
    GallerySearchItem {
        participant_id: record.id,
        name: record.name.clone(),
        info_completed: record.info_completed,
        drawing_completed: record.drawing_completed,
        drawing_path: record.drawing_path.clone(),
    }
}
