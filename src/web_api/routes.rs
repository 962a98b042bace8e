//! API Routes

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::json;

use crate::camera_registry::NewCamera;
use crate::detection_event::{EventQuery, NewDetectionEvent};
use crate::models::ApiResponse;
use crate::state::AppState;

/// Create API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(super::health_check))
        // Cameras
        .route("/api/cameras", get(list_cameras))
        .route("/api/cameras", post(create_camera))
        .route("/api/cameras/:id", get(get_camera))
        .route("/api/cameras/:id", delete(delete_camera))
        // Detection events
        .route("/api/events", get(list_events))
        .route("/api/events", post(create_event))
        // Dataset export
        .route("/api/export/datumaro", get(export_datumaro))
        .with_state(state)
}

// ========================================
// Camera Handlers
// ========================================

async fn list_cameras(State(state): State<AppState>) -> impl IntoResponse {
    match state.cameras.list().await {
        Ok(cameras) => Json(ApiResponse::success(cameras)).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn create_camera(
    State(state): State<AppState>,
    Json(req): Json<NewCamera>,
) -> impl IntoResponse {
    match state.cameras.create(req).await {
        Ok(camera) => (StatusCode::CREATED, Json(ApiResponse::success(camera))).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn get_camera(State(state): State<AppState>, Path(id): Path<u64>) -> impl IntoResponse {
    match state.cameras.get(id).await {
        Ok(Some(camera)) => Json(ApiResponse::success(camera)).into_response(),
        Ok(None) => crate::error::Error::NotFound(format!("camera {id}")).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn delete_camera(State(state): State<AppState>, Path(id): Path<u64>) -> impl IntoResponse {
    match state.cameras.delete(id).await {
        Ok(()) => Json(json!({"ok": true})).into_response(),
        Err(e) => e.into_response(),
    }
}

// ========================================
// Detection Event Handlers
// ========================================

async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventQuery>,
) -> impl IntoResponse {
    match state.events.query(&query).await {
        Ok(events) => Json(ApiResponse::success(events)).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn create_event(
    State(state): State<AppState>,
    Json(req): Json<NewDetectionEvent>,
) -> impl IntoResponse {
    match state.events.add_event(req).await {
        Ok(event) => (StatusCode::CREATED, Json(ApiResponse::success(event))).into_response(),
        Err(e) => e.into_response(),
    }
}

// ========================================
// Dataset Export
// ========================================

/// Export the (optionally filtered) events as a zipped Datumaro bundle.
async fn export_datumaro(
    State(state): State<AppState>,
    Query(query): Query<EventQuery>,
) -> impl IntoResponse {
    match state.exporter.export(&query).await {
        Ok(archive) => {
            let disposition = format!("attachment; filename=\"{}\"", archive.file_name);
            (
                [
                    (header::CONTENT_TYPE, archive.content_type.to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                archive.bytes,
            )
                .into_response()
        }
        Err(e) => e.into_response(),
    }
}
