//! Key-value slot storage used to persist the participant collection.
//!
//! # Responsibility
//! - Define the synchronous read/write primitive the record store persists
//!   through.
//! - Provide in-memory and SQLite-backed implementations.
//!
//! # Invariants
//! - A write replaces the whole slot value; there is no partial write.
//! - A failed write leaves the previously stored value in place.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::{MemorySlotStorage, DEFAULT_QUOTA_BYTES};
pub use sqlite::SqliteSlotStorage;

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure raised by a slot read or write.
#[derive(Debug)]
pub enum StorageError {
    /// Backend could not be reached or rejected the operation.
    Unavailable(DbError),
    /// Writing would exceed the backend's size budget.
    QuotaExceeded { required: usize, quota: usize },
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl StorageError {
    /// Stable short code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unavailable(err) => err.code(),
            Self::QuotaExceeded { .. } => "storage_quota_exceeded",
            Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. } => "storage_schema_mismatch",
        }
    }
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(err) => write!(f, "storage unavailable: {err}"),
            Self::QuotaExceeded { required, quota } => write!(
                f,
                "storage quota exceeded: {required} bytes required, {quota} bytes allowed"
            ),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "slot storage requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "slot storage requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "slot storage requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Unavailable(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Unavailable(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Unavailable(DbError::Sqlite(value))
    }
}

/// Synchronous named-slot storage.
///
/// Implementations are free to be `!Sync`; callers on a multi-threaded host
/// must serialize access themselves.
pub trait SlotStorage {
    /// Returns the stored value, or `None` when the slot was never written.
    fn read(&self, key: &str) -> StorageResult<Option<String>>;
    /// Replaces the slot value in full.
    fn write(&self, key: &str, value: &str) -> StorageResult<()>;
}

impl<S: SlotStorage + ?Sized> SlotStorage for &S {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).write(key, value)
    }
}
