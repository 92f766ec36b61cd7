//! Domain model for gallery sign-ups.
//!
//! # Responsibility
//! - Define the participant record persisted in the storage slot.
//! - Define the partial-update shape used by the record store.
//!
//! # Invariants
//! - Every participant is identified by a positive, collection-unique id.
//! - `id` and `created_at` are fixed at creation and have no patch field.

pub mod participant;
mod timestamp;
