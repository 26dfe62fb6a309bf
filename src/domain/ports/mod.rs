//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines the interfaces that infrastructure adapters implement:
//! - Clock: wall-clock and monotonic time
//! - IdGenerator: unique identifiers
//! - AssistantBackend: plans, audit trails, insights and turn text
//!
//! These traits keep the session core independent of concrete
//! implementations so tests can inject deterministic fakes.

pub mod assistant_backend;
pub mod clock;

pub use assistant_backend::AssistantBackend;
pub use clock::{Clock, IdGenerator};
