use crate::AppState;
use axum::{Json, extract::State, http::header, response::IntoResponse};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Connected,
    Disconnected,
}

impl From<bool> for ComponentStatus {
    fn from(up: bool) -> Self {
        if up { Self::Connected } else { Self::Disconnected }
    }
}

/// `status` is "ok" only when every component is connected.
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub database: ComponentStatus,
    pub storage: ComponentStatus,
    pub version: String,
}

#[utoipa::path(
    get,
    path = "/index/",
    responses((status = 200, description = "Liveness text", body = String, content_type = "text/plain")),
    tag = "system"
)]
pub async fn index() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        "hello, world.",
    )
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Database and image storage status", body = HealthResponse)),
    tag = "system"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = ComponentStatus::from(state.db.ping().await.is_ok());
    let storage = ComponentStatus::from(state.images.storage_reachable().await);

    let status = match (database, storage) {
        (ComponentStatus::Connected, ComponentStatus::Connected) => "ok",
        _ => "degraded",
    };

    Json(HealthResponse {
        status: status.to_string(),
        database,
        storage,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
