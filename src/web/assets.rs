use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;

use super::server::AppState;

async fn read_asset(dir: &Path, name: &str) -> Option<Vec<u8>> {
    let path = dir.join(name);
    match tokio::fs::read(&path).await {
        Ok(contents) => Some(contents),
        Err(e) => {
            log::error!("Error serving {}: {}", path.display(), e);
            None
        }
    }
}

/// Landing page
pub async fn index_page(State(state): State<Arc<AppState>>) -> Response {
    match read_asset(&state.static_dir, "index.html").await {
        Some(contents) => Html(contents).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "Frontend files not found",
                "message": "Please ensure index.html, styles.css, and script.js are in the static directory",
                "api_status": "healthy"
            })),
        )
            .into_response(),
    }
}

pub async fn stylesheet(State(state): State<Arc<AppState>>) -> Response {
    match read_asset(&state.static_dir, "styles.css").await {
        Some(contents) => ([(header::CONTENT_TYPE, "text/css")], contents).into_response(),
        None => (StatusCode::NOT_FOUND, "/* styles.css not found */").into_response(),
    }
}

pub async fn script(State(state): State<Arc<AppState>>) -> Response {
    match read_asset(&state.static_dir, "script.js").await {
        Some(contents) => {
            ([(header::CONTENT_TYPE, "application/javascript")], contents).into_response()
        }
        None => (StatusCode::NOT_FOUND, "// script.js not found").into_response(),
    }
}
