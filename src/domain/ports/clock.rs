/// Clock and identity source ports.
///
/// The session core never reads the system clock or generates ids on its
/// own; both are injected so tests can drive time deterministically.
use chrono::{DateTime, Utc};

/// Source of timestamps.
pub trait Clock: Send + Sync {
    /// Wall-clock time used for creation timestamps.
    fn now(&self) -> DateTime<Utc>;

    /// Monotonic milliseconds since an arbitrary fixed origin.
    ///
    /// Durations are always computed from two readings of this value.
    fn monotonic_ms(&self) -> u64;
}

/// Source of unique identifiers.
pub trait IdGenerator: Send + Sync {
    /// Returns a fresh id starting with `prefix`.
    fn next_id(&self, prefix: &str) -> String;
}
