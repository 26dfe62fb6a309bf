//! Domain layer for the sheetwright session core
//!
//! This module contains the session data model, error taxonomy and the
//! port traits through which external collaborators are reached.

pub mod errors;
pub mod models;
pub mod ports;

// Re-export error types for convenient access
pub use errors::{ErrorKind, SessionError, SessionResult};
