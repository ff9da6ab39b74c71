use crate::infra::AppState;
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::path::{Component, Path as FsPath, PathBuf};
use std::sync::Arc;
use talent_directory::talents::{
    talents_router, AdminGate, CollaborationRepository, FileStore, ProfileRepository,
    TalentDirectoryService,
};
use tracing::warn;

pub(crate) fn with_talent_routes<P, C, F>(
    service: Arc<TalentDirectoryService<P, C, F>>,
    admin: AdminGate,
    media_url_prefix: &str,
) -> axum::Router
where
    P: ProfileRepository + 'static,
    C: CollaborationRepository + 'static,
    F: FileStore + 'static,
{
    talents_router(service, admin)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            &format!("{media_url_prefix}*path"),
            axum::routing::get(media_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Serve a stored upload from the media root.
pub(crate) async fn media_endpoint(
    Extension(state): Extension<AppState>,
    Path(requested): Path<String>,
) -> Response {
    let Some(relative) = media_relative_path(&requested) else {
        warn!(path = %requested, "refused media path outside the media root");
        return (StatusCode::NOT_FOUND, Json(json!({ "error": "file not found" }))).into_response();
    };

    match tokio::fs::read(state.media_root.join(&relative)).await {
        Ok(bytes) => {
            let content_type = mime_guess::from_path(&relative)
                .first_or_octet_stream()
                .to_string();
            (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], bytes).into_response()
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            (StatusCode::NOT_FOUND, Json(json!({ "error": "file not found" }))).into_response()
        }
        Err(err) => {
            warn!(path = %requested, error = %err, "failed to read media file");
            let payload = json!({ "error": "failed to read file" });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

/// Relative path below the media root, or `None` when the request tries to leave it.
fn media_relative_path(requested: &str) -> Option<PathBuf> {
    let candidate = FsPath::new(requested.trim_start_matches('/'));
    let mut relative = PathBuf::new();
    for component in candidate.components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }
    (!relative.as_os_str().is_empty()).then_some(relative)
}
