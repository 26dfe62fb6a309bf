//! Append-only version ledger.
//!
//! Snapshots are markers for audit purposes; the ledger never removes or
//! reorders entries and does not roll document state back. The active
//! pointer only selects which entry the host displays.

use chrono::{DateTime, TimeZone, Utc};
use tracing::info;

use crate::domain::models::{SnapshotId, VersionSnapshot, BASELINE_LABEL};
use crate::domain::{SessionError, SessionResult};

/// Label used by [`VersionLedger::commit`].
pub const COMMIT_LABEL: &str = "Committed changes";

/// Label used for snapshots taken by hand from the panel.
pub const MANUAL_SNAPSHOT_LABEL: &str = "Manual snapshot";

#[derive(Debug)]
pub struct VersionLedger {
    entries: Vec<VersionSnapshot>,
    active: usize,
}

impl Default for VersionLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionLedger {
    /// A ledger holding only the baseline entry `v1`.
    pub fn new() -> Self {
        Self {
            entries: vec![VersionSnapshot {
                id: SnapshotId::from("v1"),
                label: BASELINE_LABEL.to_string(),
                created_at: Utc.timestamp_opt(0, 0).single().unwrap_or_default(),
            }],
            active: 0,
        }
    }

    /// Append a snapshot and make it active.
    pub fn snapshot(
        &mut self,
        id: SnapshotId,
        label: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> &VersionSnapshot {
        let snapshot = VersionSnapshot {
            id,
            label: label.into(),
            created_at,
        };
        info!(snapshot_id = %snapshot.id, label = %snapshot.label, "snapshot created");
        self.entries.push(snapshot);
        self.active = self.entries.len() - 1;
        &self.entries[self.active]
    }

    /// Point the display at an existing entry.
    pub fn set_active(&mut self, id: &SnapshotId) -> SessionResult<()> {
        let index = self
            .entries
            .iter()
            .position(|s| &s.id == id)
            .ok_or_else(|| SessionError::not_found("Snapshot", id.as_str()))?;
        self.active = index;
        Ok(())
    }

    pub fn entries(&self) -> &[VersionSnapshot] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn active(&self) -> &VersionSnapshot {
        &self.entries[self.active]
    }
}
