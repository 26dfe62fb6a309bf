//! Assistant backend adapters.

pub mod scripted;

pub use scripted::ScriptedBackend;
