//! Data aggregation endpoints: fan-out read, modify, forward update, undo.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{Json, extract::State};
use herdgate_rtdb::RtdbError;
use herdgate_types::{RecordKind, TaggedRecord};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyRequest {
    pub project_id: Option<String>,
    pub data_id: Option<String>,
    pub new_data: Option<Value>,
    /// Optional; when absent the kind is inferred from the payload shape
    /// (legacy clients).
    pub data_type: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAllForwardRequest {
    pub new_forward_number: Option<Value>,
}

/// `GET /api/data/all` — every record of every active project, tagged with
/// its source.
pub async fn all_data(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TaggedRecord>>, ApiError> {
    Ok(Json(state.aggregator.read_all().await?))
}

/// `POST /api/data/modify` — merge-patch one record, recording an undoable
/// history entry first.
pub async fn modify(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ModifyRequest>,
) -> Result<Json<Value>, ApiError> {
    let project_id = body
        .project_id
        .ok_or(RtdbError::MissingField("projectId"))?;
    let data_id = body.data_id.ok_or(RtdbError::MissingField("dataId"))?;
    let new_data = body.new_data.ok_or(RtdbError::MissingField("newData"))?;

    let explicit_kind = match body.data_type {
        Some(raw) => Some(
            raw.parse::<RecordKind>()
                .map_err(|_| RtdbError::InvalidKind(raw))?,
        ),
        None => None,
    };

    state
        .aggregator
        .modify(&project_id, &data_id, new_data, explicit_kind)
        .await?;
    Ok(Json(json!({ "message": "Data updated successfully" })))
}

/// `POST /api/data/update-all-forward` — set the forward number on both
/// collections of every project.
pub async fn update_all_forward(
    State(state): State<Arc<AppState>>,
    Json(body): Json<UpdateAllForwardRequest>,
) -> Result<Json<Value>, ApiError> {
    let new_forward_number = body
        .new_forward_number
        .filter(|v| !v.is_null())
        .ok_or(RtdbError::MissingField("newForwardNumber"))?;

    state.aggregator.update_all_forward(&new_forward_number).await?;
    Ok(Json(json!({
        "message": "Forward number updated successfully in all projects"
    })))
}

/// `POST /api/data/undo` — revert the most recent modify.
pub async fn undo(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    state.aggregator.undo().await?;
    Ok(Json(json!({
        "message": "Undo successful. Data reverted to previous state."
    })))
}
