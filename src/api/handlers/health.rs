use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;

use crate::api::ServiceInfo;

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "success": true,
        "message": "API is healthy",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

pub async fn info(State(info): State<Arc<ServiceInfo>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "success": true,
        "name": info.name,
        "version": info.version,
        "environment": info.environment,
    }))
}
