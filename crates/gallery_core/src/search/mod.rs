//! Search entry points.
//!
//! # Responsibility
//! - Expose lazy, allocation-free filters over the participant collection.

pub mod requests;
