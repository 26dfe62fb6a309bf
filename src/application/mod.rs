//! Application layer
//!
//! Wires the session core to the runtime: event fan-out and timer-driven
//! turn progression.

pub mod event_bus;
pub mod turn_driver;

pub use event_bus::EventBus;
pub use turn_driver::{SharedController, TurnDriver, TurnHandle};
