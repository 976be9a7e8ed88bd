use crate::AppState;
use crate::api::error::AppError;
use crate::api::handlers::resource_id;
use crate::models::{AmenityView, AmenityWrite};
use axum::{
    Json,
    extract::{Path, State, rejection::{JsonRejection, PathRejection}},
    http::StatusCode,
};
use serde_json::Value;

#[utoipa::path(
    get,
    path = "/amenities/",
    responses((status = 200, description = "All amenities", body = [AmenityView])),
    tag = "amenities"
)]
pub async fn list_amenities(
    State(state): State<AppState>,
) -> Result<Json<Vec<AmenityView>>, AppError> {
    Ok(Json(state.amenities.list().await?))
}

#[utoipa::path(
    post,
    path = "/amenities/",
    request_body = crate::models::AmenityWrite,
    responses(
        (status = 201, description = "Amenity created", body = AmenityView),
        (status = 400, description = "Validation failed or duplicate name")
    ),
    tag = "amenities"
)]
pub async fn create_amenity(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<AmenityView>), AppError> {
    let Json(body) = payload?;
    let payload = AmenityWrite::from_json(body)?;
    let model = state.amenities.create(payload).await?;
    Ok((StatusCode::CREATED, Json(model.into())))
}

#[utoipa::path(
    get,
    path = "/amenities/{id}/",
    params(("id" = i32, Path, description = "Amenity id")),
    responses(
        (status = 200, description = "Amenity detail", body = AmenityView),
        (status = 404, description = "Amenity not found")
    ),
    tag = "amenities"
)]
pub async fn retrieve_amenity(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<AmenityView>, AppError> {
    let model = state.amenities.get(resource_id(path)?).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    put,
    path = "/amenities/{id}/",
    params(("id" = i32, Path, description = "Amenity id")),
    request_body = crate::models::AmenityWrite,
    responses(
        (status = 200, description = "Amenity updated", body = AmenityView),
        (status = 400, description = "Validation failed or duplicate name"),
        (status = 404, description = "Amenity not found")
    ),
    tag = "amenities"
)]
pub async fn update_amenity(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<AmenityView>, AppError> {
    let id = resource_id(path)?;
    let Json(body) = payload?;
    let payload = AmenityWrite::from_json(body)?;
    let model = state.amenities.update(id, payload, false).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    patch,
    path = "/amenities/{id}/",
    params(("id" = i32, Path, description = "Amenity id")),
    request_body = crate::models::AmenityWrite,
    responses(
        (status = 200, description = "Amenity updated", body = AmenityView),
        (status = 400, description = "Validation failed or duplicate name"),
        (status = 404, description = "Amenity not found")
    ),
    tag = "amenities"
)]
pub async fn partial_update_amenity(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<AmenityView>, AppError> {
    let id = resource_id(path)?;
    let Json(body) = payload?;
    let payload = AmenityWrite::from_json(body)?;
    let model = state.amenities.update(id, payload, true).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/amenities/{id}/",
    params(("id" = i32, Path, description = "Amenity id")),
    responses(
        (status = 204, description = "Amenity deleted; facilities keep their other amenities"),
        (status = 404, description = "Amenity not found")
    ),
    tag = "amenities"
)]
pub async fn delete_amenity(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, AppError> {
    state.amenities.delete(resource_id(path)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
