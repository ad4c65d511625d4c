//! History log entry — the single-step undo record.

use crate::RecordKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One persisted change, created before the external write is applied and
/// consumed by the next undo. Never updated in place.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Store-assigned, strictly increasing. Never client-supplied, so
    /// `latest()` is deterministic under concurrent appends.
    pub seq: i64,
    pub project_id: String,
    pub data_type: RecordKind,
    pub data_id: String,
    /// Full value of the record before the change.
    pub original_value: serde_json::Value,
    /// The merge-patch that was requested.
    pub new_value: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

/// A history entry as handed to the store; `seq` and `timestamp` are
/// assigned at append time.
#[derive(Clone, Debug)]
pub struct NewHistoryEntry {
    pub project_id: String,
    pub data_type: RecordKind,
    pub data_id: String,
    pub original_value: serde_json::Value,
    pub new_value: serde_json::Value,
}
