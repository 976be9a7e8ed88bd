use crate::AppState;
use crate::api::error::AppError;
use crate::api::handlers::resource_id;
use crate::models::{ImageForm, ImageListQuery, ImageView};
use axum::{
    Json,
    extract::{Multipart, Path, Query, State, rejection::PathRejection},
    http::StatusCode,
};

#[utoipa::path(
    get,
    path = "/images/",
    params(ImageListQuery),
    responses((status = 200, description = "Facility images", body = [ImageView])),
    tag = "images"
)]
pub async fn list_images(
    State(state): State<AppState>,
    Query(query): Query<ImageListQuery>,
) -> Result<Json<Vec<ImageView>>, AppError> {
    Ok(Json(state.images.list(query).await?))
}

#[utoipa::path(
    post,
    path = "/images/",
    request_body(content = String, description = "Fields: facility (id), image (file), caption", content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Image uploaded", body = ImageView),
        (status = 400, description = "Missing facility, invalid image or caption too long")
    ),
    tag = "images"
)]
pub async fn create_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ImageView>), AppError> {
    let form = ImageForm::from_multipart(multipart).await?;
    let model = state.images.create(form).await?;
    Ok((StatusCode::CREATED, Json(state.images.view(model))))
}

#[utoipa::path(
    get,
    path = "/images/{id}/",
    params(("id" = i32, Path, description = "Image id")),
    responses(
        (status = 200, description = "Image detail", body = ImageView),
        (status = 404, description = "Image not found")
    ),
    tag = "images"
)]
pub async fn retrieve_image(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<ImageView>, AppError> {
    let model = state.images.get(resource_id(path)?).await?;
    Ok(Json(state.images.view(model)))
}

#[utoipa::path(
    put,
    path = "/images/{id}/",
    params(("id" = i32, Path, description = "Image id")),
    request_body(content = String, description = "Fields: facility (id), image (file), caption", content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image replaced", body = ImageView),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Image not found")
    ),
    tag = "images"
)]
pub async fn update_image(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    multipart: Multipart,
) -> Result<Json<ImageView>, AppError> {
    let id = resource_id(path)?;
    let form = ImageForm::from_multipart(multipart).await?;
    let model = state.images.update(id, form, false).await?;
    Ok(Json(state.images.view(model)))
}

#[utoipa::path(
    patch,
    path = "/images/{id}/",
    params(("id" = i32, Path, description = "Image id")),
    request_body(content = String, description = "Any of: facility (id), image (file), caption", content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image updated", body = ImageView),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Image not found")
    ),
    tag = "images"
)]
pub async fn partial_update_image(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    multipart: Multipart,
) -> Result<Json<ImageView>, AppError> {
    let id = resource_id(path)?;
    let form = ImageForm::from_multipart(multipart).await?;
    let model = state.images.update(id, form, true).await?;
    Ok(Json(state.images.view(model)))
}

#[utoipa::path(
    delete,
    path = "/images/{id}/",
    params(("id" = i32, Path, description = "Image id")),
    responses(
        (status = 204, description = "Image and stored payload deleted"),
        (status = 404, description = "Image not found")
    ),
    tag = "images"
)]
pub async fn delete_image(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, AppError> {
    state.images.delete(resource_id(path)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
