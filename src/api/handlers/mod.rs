pub mod amenities;
pub mod facilities;
pub mod health;
pub mod images;
pub mod media;

use crate::api::error::AppError;
use axum::extract::{Path, rejection::PathRejection};

/// Ids that do not parse as a primary key simply match nothing.
pub(crate) fn resource_id(path: Result<Path<i32>, PathRejection>) -> Result<i32, AppError> {
    path.map(|Path(id)| id).map_err(|_| AppError::not_found())
}
