use crate::AppState;
use crate::api::error::AppError;
use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};

/// Serves stored image payloads under the media URL.
#[utoipa::path(
    get,
    path = "/media/{key}",
    params(("key" = String, Path, description = "Storage key, e.g. facilities/images/<uuid>.png")),
    responses(
        (status = 200, description = "Image payload"),
        (status = 404, description = "File not found")
    ),
    tag = "images"
)]
pub async fn serve_media(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let (content_type, data) = state.images.open(&key).await?;
    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        data,
    ))
}
