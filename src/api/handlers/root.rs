use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::api::state::AppState;

pub async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "Memoriam API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Funeral announcement and memorial platform",
        "status": "operational",
        "endpoints": {
            "health": "/health",
            "funerals": "/api/funerals",
            "featured": "/api/funerals/featured",
            "condolences": "/api/condolences",
            "donations": "/api/donations",
            "admin": "/admin"
        }
    }))
}

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "storage": &*state.storage,
        })),
    )
}
