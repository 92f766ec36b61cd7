//! SQLite-backed slot storage.
//!
//! # Invariants
//! - One row per slot key in `storage_slots`.
//! - Writes are upserts; `updated_at` tracks the last write in epoch ms.

use super::{SlotStorage, StorageError, StorageResult};
use crate::db::migrations::{current_user_version, latest_version};
use rusqlite::{params, Connection, OptionalExtension};

const SLOT_TABLE: &str = "storage_slots";
const SLOT_COLUMNS: [&str; 3] = ["slot_key", "slot_value", "updated_at"];

/// Slot storage over a migrated connection.
pub struct SqliteSlotStorage<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSlotStorage<'conn> {
    /// Constructs storage from a migrated/ready connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version does not match.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` on a foreign schema.
    pub fn try_new(conn: &'conn Connection) -> StorageResult<Self> {
        ensure_slot_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl SlotStorage for SqliteSlotStorage<'_> {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT slot_value FROM storage_slots WHERE slot_key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO storage_slots (slot_key, slot_value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(slot_key) DO UPDATE SET
                slot_value = excluded.slot_value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }
}

fn ensure_slot_connection_ready(conn: &Connection) -> StorageResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(StorageError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, SLOT_TABLE)? {
        return Err(StorageError::MissingRequiredTable(SLOT_TABLE));
    }

    for column in SLOT_COLUMNS {
        if !table_has_column(conn, SLOT_TABLE, column)? {
            return Err(StorageError::MissingRequiredColumn {
                table: SLOT_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> StorageResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> StorageResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
