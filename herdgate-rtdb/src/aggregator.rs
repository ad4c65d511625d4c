//! Aggregation service — fan-out reads/writes across every registered
//! project plus the history-backed single-step undo.
//!
//! Fan-out is fire-and-wait-all: sub-operations for all projects are issued
//! concurrently and the first failure fails the whole call. There is no
//! rollback of writes that already landed on other projects, and no silent
//! partial result on reads. Within one modify or undo the
//! pre-read → history-append → mutate sequence is strictly ordered.

use crate::error::{RtdbError, RtdbResult};
use crate::registry::ProjectRegistry;
use futures::future::try_join_all;
use herdgate_store::HistoryStore;
use herdgate_types::{NewHistoryEntry, RecordKind, TaggedRecord};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// Fans operations out across the project registry.
#[derive(Clone)]
pub struct Aggregator {
    registry: Arc<ProjectRegistry>,
    history: HistoryStore,
}

impl Aggregator {
    pub fn new(registry: Arc<ProjectRegistry>, history: HistoryStore) -> Self {
        Self { registry, history }
    }

    pub fn registry(&self) -> &ProjectRegistry {
        &self.registry
    }

    /// Reads both collections of every registered project concurrently and
    /// flattens the results in project order, each record tagged with its
    /// source project. An empty registry yields an empty result; one failing
    /// project fails the whole read.
    pub async fn read_all(&self) -> RtdbResult<Vec<TaggedRecord>> {
        let per_project = try_join_all(self.registry.all().map(|(project_id, client)| async move {
            let (cows, milks) = tokio::try_join!(
                client.fetch(RecordKind::Cow.collection_path()),
                client.fetch(RecordKind::Milk.collection_path()),
            )?;

            let mut records = Vec::new();
            collect_children(project_id, RecordKind::Cow, cows, &mut records);
            collect_children(project_id, RecordKind::Milk, milks, &mut records);
            Ok::<_, RtdbError>(records)
        }))
        .await?;

        let all: Vec<TaggedRecord> = per_project.into_iter().flatten().collect();
        info!(
            "fetched {} records from {} projects",
            all.len(),
            self.registry.len()
        );
        Ok(all)
    }

    /// Merge-patches one record, recording a history entry first.
    ///
    /// The record kind comes from `explicit_kind` when the caller supplied
    /// one, otherwise from the legacy payload-shape inference. The pre-read
    /// both confirms the record exists (a blind update must not happen) and
    /// captures the value the next undo restores. Concurrent modifies of the
    /// same record are not serialized; the external store's last write wins,
    /// but every call appends its own history entry.
    pub async fn modify(
        &self,
        project_id: &str,
        data_id: &str,
        new_data: Value,
        explicit_kind: Option<RecordKind>,
    ) -> RtdbResult<()> {
        let kind = explicit_kind
            .or_else(|| RecordKind::infer(&new_data))
            .ok_or(RtdbError::KindUndetermined)?;

        let client = self
            .registry
            .get(project_id)
            .ok_or_else(|| RtdbError::ProjectNotFound(project_id.to_string()))?;

        let path = kind.record_path(data_id);
        let original = client
            .fetch(&path)
            .await?
            .ok_or_else(|| RtdbError::RecordNotFound(path.clone()))?;

        // Write-ahead: the history entry lands before the external store is
        // touched, so a crash in between leaves an undoable entry rather
        // than an untracked mutation.
        self.history.append(&NewHistoryEntry {
            project_id: project_id.to_string(),
            data_type: kind,
            data_id: data_id.to_string(),
            original_value: original,
            new_value: new_data.clone(),
        })?;

        client.merge(&path, &new_data).await?;
        info!("modified {path} in project {project_id}");
        Ok(())
    }

    /// Sets the `forward` field on both collections of every project. All
    /// sub-operations run concurrently; on failure some projects may
    /// already have been updated.
    pub async fn update_all_forward(&self, new_forward_number: &Value) -> RtdbResult<()> {
        let patch = serde_json::json!({ "forward": new_forward_number });
        let patch = &patch;

        try_join_all(self.registry.all().flat_map(|(_, client)| {
            RecordKind::both()
                .into_iter()
                .map(move |kind| client.merge(kind.collection_path(), patch))
        }))
        .await?;

        info!(
            "updated forward number in {} projects",
            self.registry.len()
        );
        Ok(())
    }

    /// Reverts the globally most recent change: full replace of the target
    /// with the recorded original value, then removal of the history entry.
    /// The entry is deleted only after the replace succeeds.
    pub async fn undo(&self) -> RtdbResult<()> {
        let entry = self.history.latest()?.ok_or(RtdbError::NoHistory)?;

        let client = self.registry.get(&entry.project_id).ok_or_else(|| {
            warn!(
                "undo target project {} is no longer registered",
                entry.project_id
            );
            RtdbError::ProjectNotFound(entry.project_id.clone())
        })?;

        let path = entry.data_type.record_path(&entry.data_id);
        client.replace(&path, &entry.original_value).await?;
        self.history.remove(entry.seq)?;

        info!(
            "undo successful: reverted {path} in project {}",
            entry.project_id
        );
        Ok(())
    }
}

/// Flattens one collection snapshot into tagged records. The snapshot is a
/// map of child id to child value; anything else (including a scalar left
/// by a stray write) is skipped.
fn collect_children(
    project_id: &str,
    kind: RecordKind,
    snapshot: Option<Value>,
    out: &mut Vec<TaggedRecord>,
) {
    let Some(Value::Object(children)) = snapshot else {
        return;
    };
    for (id, data) in children {
        out.push(TaggedRecord {
            source_project_id: project_id.to_string(),
            data_type: kind,
            id,
            data,
        });
    }
}
