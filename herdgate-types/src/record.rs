//! Aggregated record shape returned by the fan-out read.

use crate::RecordKind;
use serde::{Deserialize, Serialize};

/// One external record tagged with the project it came from.
///
/// Field names match the wire shape of `GET /api/data/all`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaggedRecord {
    pub source_project_id: String,
    pub data_type: RecordKind,
    pub id: String,
    /// Opaque payload; the external store owns its schema.
    pub data: serde_json::Value,
}
