//! Infrastructure layer module
//!
//! Adapters that satisfy the domain ports, plus process-level concerns:
//! - Scripted assistant backend
//! - System and manual clocks, id generators
//! - Configuration management
//! - Logging infrastructure

pub mod backend;
pub mod clock;
pub mod config;
pub mod logging;
