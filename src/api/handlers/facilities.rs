use crate::AppState;
use crate::api::error::AppError;
use crate::api::handlers::resource_id;
use crate::models::{FacilityAction, FacilityView, FacilityWrite};
use axum::{
    Json,
    extract::{Path, State, rejection::{JsonRejection, PathRejection}},
    http::StatusCode,
};
use serde_json::Value;
use tracing::error;

#[utoipa::path(
    get,
    path = "/facilities/",
    responses(
        (status = 200, description = "All facilities, amenities and images expanded", body = [crate::models::FacilityRead])
    ),
    tag = "facilities"
)]
pub async fn list_facilities(
    State(state): State<AppState>,
) -> Result<Json<Vec<FacilityView>>, AppError> {
    Ok(Json(state.facilities.list().await?))
}

#[utoipa::path(
    post,
    path = "/facilities/",
    request_body = crate::models::FacilityWrite,
    responses(
        (status = 201, description = "Facility created", body = crate::models::FacilityWriteView),
        (status = 400, description = "Validation failed")
    ),
    tag = "facilities"
)]
pub async fn create_facility(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<FacilityView>), AppError> {
    let Json(body) = payload?;
    let payload = FacilityWrite::from_json(body)?;
    let view = state.facilities.create(payload).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

#[utoipa::path(
    get,
    path = "/facilities/{id}/",
    params(("id" = i32, Path, description = "Facility id")),
    responses(
        (status = 200, description = "Facility detail", body = crate::models::FacilityRead),
        (status = 404, description = "Facility not found")
    ),
    tag = "facilities"
)]
pub async fn retrieve_facility(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<FacilityView>, AppError> {
    let facility = state.facilities.get(resource_id(path)?).await?;
    let view = state
        .facilities
        .render(FacilityAction::Retrieve, facility)
        .await?;
    Ok(Json(view))
}

#[utoipa::path(
    put,
    path = "/facilities/{id}/",
    params(("id" = i32, Path, description = "Facility id")),
    request_body = crate::models::FacilityWrite,
    responses(
        (status = 200, description = "Facility updated", body = crate::models::FacilityWriteView),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Facility not found")
    ),
    tag = "facilities"
)]
pub async fn update_facility(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<FacilityView>, AppError> {
    let id = resource_id(path)?;
    let Json(body) = payload?;
    let payload = FacilityWrite::from_json(body)?;
    let view = state
        .facilities
        .update(id, payload, FacilityAction::Update)
        .await?;
    Ok(Json(view))
}

#[utoipa::path(
    patch,
    path = "/facilities/{id}/",
    params(("id" = i32, Path, description = "Facility id")),
    request_body = crate::models::FacilityWrite,
    responses(
        (status = 200, description = "Facility updated", body = crate::models::FacilityWriteView),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Facility not found")
    ),
    tag = "facilities"
)]
pub async fn partial_update_facility(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<FacilityView>, AppError> {
    let id = resource_id(path)?;
    let Json(body) = payload?;
    let payload = FacilityWrite::from_json(body)?;
    let view = state
        .facilities
        .update(id, payload, FacilityAction::PartialUpdate)
        .await?;
    Ok(Json(view))
}

/// Any failure past the lookup is reported as `{"detail": "Error during deletion: ..."}`.
#[utoipa::path(
    delete,
    path = "/facilities/{id}/",
    params(("id" = i32, Path, description = "Facility id")),
    responses(
        (status = 204, description = "Facility, its images and amenity links deleted"),
        (status = 404, description = "Facility not found"),
        (status = 500, description = "Deletion failed")
    ),
    tag = "facilities"
)]
pub async fn delete_facility(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let facility = state.facilities.get(resource_id(path)?).await?;

    match state.facilities.delete(&facility).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            error!(
                facility_id = facility.id,
                facility_name = %facility.facility_name,
                "❌ Error deleting facility: {}",
                e
            );
            Err(AppError::DeletionFailed(e.to_string()))
        }
    }
}
