//! Credential management CRUD.
//!
//! Plain pass-through persistence; the only invariant is project-id
//! uniqueness. Secret material is accepted on create/update and never
//! included in any response. Changes take effect in the project registry at
//! the next process start.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Json, response::IntoResponse};
use herdgate_types::{CredentialUpdate, NewCredential};
use serde_json::{Value, json};
use std::sync::Arc;

/// `GET /api/firebase-credentials`
pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let data = state.credentials.list()?;
    Ok(Json(json!({ "success": true, "data": data })))
}

/// `POST /api/firebase-credentials`
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewCredential>,
) -> Result<impl IntoResponse, ApiError> {
    let created = state.credentials.insert(&body).map_err(|e| {
        if matches!(e, herdgate_store::StoreError::Conflict(_)) {
            ApiError::Conflict("Project ID already exists".to_string())
        } else {
            e.into()
        }
    })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Firebase credentials added successfully",
            "data": {
                "projectId": created.project_id,
                "projectName": created.project_name,
                "isActive": created.is_active,
            },
        })),
    ))
}

/// `PUT /api/firebase-credentials/{project_id}`
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<String>,
    Json(changes): Json<CredentialUpdate>,
) -> Result<Json<Value>, ApiError> {
    let updated = state.credentials.update(&project_id, &changes)?;
    Ok(Json(json!({
        "success": true,
        "message": "Firebase credentials updated successfully",
        "data": updated,
    })))
}

/// `DELETE /api/firebase-credentials/{project_id}`
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.credentials.delete(&project_id)?;
    Ok(Json(json!({
        "success": true,
        "message": "Firebase credentials deleted successfully",
    })))
}

/// `PATCH /api/firebase-credentials/{project_id}/toggle`
pub async fn toggle(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let is_active = state.credentials.toggle(&project_id)?;
    let verb = if is_active { "activated" } else { "deactivated" };
    Ok(Json(json!({
        "success": true,
        "message": format!("Firebase credentials {verb} successfully"),
        "data": { "projectId": project_id, "isActive": is_active },
    })))
}
