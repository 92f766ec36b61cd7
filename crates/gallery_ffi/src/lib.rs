//! Presentation-facing bindings for the gallery record store.

pub mod api;
mod upload;
