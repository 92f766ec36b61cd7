//! In-process slot storage with a byte quota.

use super::{SlotStorage, StorageError, StorageResult};
use std::cell::RefCell;
use std::collections::HashMap;

/// Same budget browsers give a page's local storage.
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// `HashMap`-backed slots, sized by the UTF-8 length of keys plus values.
#[derive(Debug)]
pub struct MemorySlotStorage {
    slots: RefCell<HashMap<String, String>>,
    quota: Option<usize>,
}

impl Default for MemorySlotStorage {
    fn default() -> Self {
        Self::with_quota(DEFAULT_QUOTA_BYTES)
    }
}

impl MemorySlotStorage {
    /// Storage capped at `quota` bytes.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            slots: RefCell::new(HashMap::new()),
            quota: Some(quota),
        }
    }

    /// Storage without a size cap.
    pub fn unbounded() -> Self {
        Self {
            slots: RefCell::new(HashMap::new()),
            quota: None,
        }
    }

    /// Seeds a slot directly, bypassing the quota.
    pub fn preset(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.slots.borrow_mut().insert(key.into(), value.into());
        self
    }

    /// Bytes currently used across all slots.
    pub fn used_bytes(&self) -> usize {
        self.slots
            .borrow()
            .iter()
            .map(|(key, value)| key.len() + value.len())
            .sum()
    }
}

impl SlotStorage for MemorySlotStorage {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut slots = self.slots.borrow_mut();
        if let Some(quota) = self.quota {
            let others: usize = slots
                .iter()
                .filter(|(existing, _)| existing.as_str() != key)
                .map(|(existing, stored)| existing.len() + stored.len())
                .sum();
            let required = others + key.len() + value.len();
            if required > quota {
                return Err(StorageError::QuotaExceeded { required, quota });
            }
        }
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
