//! Record kind discriminator and path locator.
//!
//! Every externally stored record lives in one of exactly two collections,
//! `Cow` or `Milk`. Once a kind is parsed it is always valid, so path
//! construction is infallible; the "invalid kind" case of the contract is
//! surfaced at the parse/inference boundary instead.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The two supported record collections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    Cow,
    Milk,
}

/// A kind string that is neither `Cow` nor `Milk`.
#[derive(Debug, Error)]
#[error("unknown record kind: {0}")]
pub struct UnknownKind(pub String);

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Cow => "Cow",
            RecordKind::Milk => "Milk",
        }
    }

    /// Path of the whole collection in the external store.
    pub fn collection_path(&self) -> &'static str {
        self.as_str()
    }

    /// Path of a single record in the external store (`Cow/<id>` / `Milk/<id>`).
    pub fn record_path(&self, record_id: &str) -> String {
        format!("{}/{record_id}", self.as_str())
    }

    /// Legacy compatibility: infers the kind from payload shape when the
    /// request carries no explicit `dataType`. A `mobile` field marks a
    /// `Cow` record, a `mobileNumber` field marks a `Milk` record. An empty
    /// or zero marker counts as absent, so `{"mobile": ""}` falls through
    /// to the `mobileNumber` check. Not the primary contract; new clients
    /// should always send `dataType`.
    pub fn infer(payload: &serde_json::Value) -> Option<RecordKind> {
        if marker_present(payload.get("mobile")) {
            Some(RecordKind::Cow)
        } else if marker_present(payload.get("mobileNumber")) {
            Some(RecordKind::Milk)
        } else {
            None
        }
    }

    pub fn both() -> [RecordKind; 2] {
        [RecordKind::Cow, RecordKind::Milk]
    }
}

/// A marker field only counts when it carries a usable value: null, `false`,
/// empty string, and numeric zero are all treated as absent.
fn marker_present(value: Option<&serde_json::Value>) -> bool {
    match value {
        None | Some(serde_json::Value::Null) => false,
        Some(serde_json::Value::Bool(b)) => *b,
        Some(serde_json::Value::String(s)) => !s.is_empty(),
        Some(serde_json::Value::Number(n)) => n.as_f64() != Some(0.0),
        Some(_) => true,
    }
}

impl FromStr for RecordKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Cow" => Ok(RecordKind::Cow),
            "Milk" => Ok(RecordKind::Milk),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
