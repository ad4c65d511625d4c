//! Router assembly and the health probe.

use crate::state::AppState;
use axum::http::{Method, header::CONTENT_TYPE};
use axum::routing::{get, patch, post, put};
use axum::{Json, Router, extract::State};
use chrono::Utc;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};

pub mod credentials;
pub mod data;

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/health", get(health))
        .route("/api/data/all", get(data::all_data))
        .route("/api/data/modify", post(data::modify))
        .route("/api/data/update-all-forward", post(data::update_all_forward))
        .route("/api/data/undo", post(data::undo))
        .route(
            "/api/firebase-credentials",
            get(credentials::list).post(credentials::create),
        )
        .route(
            "/api/firebase-credentials/{project_id}",
            put(credentials::update).delete(credentials::remove),
        )
        .route(
            "/api/firebase-credentials/{project_id}/toggle",
            patch(credentials::toggle),
        )
        .layer(cors)
        .with_state(state)
}

async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "environment": state.config.environment,
    }))
}
