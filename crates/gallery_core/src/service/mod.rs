//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate record store calls into workflow-level APIs.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod gallery_service;
