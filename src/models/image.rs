use axum::extract::{Multipart, multipart::MultipartError};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::api::error::{AppError, FieldErrors};
use crate::config::AppConfig;
use crate::entities::facility_images;

pub const CAPTION_MAX_CHARS: usize = 50;

/// Image representation; `image` is the URL the payload is served from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ImageView {
    pub id: i32,
    pub image: String,
    pub caption: String,
}

impl ImageView {
    pub fn new(model: facility_images::Model, config: &AppConfig) -> Self {
        Self {
            id: model.id,
            image: config.media_url_for(&model.image),
            caption: model.caption,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ImageListQuery {
    /// Only images owned by this facility
    pub facility: Option<i32>,
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::BadRequest(e.body_text())
    }
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: Option<String>,
    pub data: Vec<u8>,
}

/// Multipart body for image create/update: `facility`, `image` (file) and `caption`.
#[derive(Debug, Default)]
pub struct ImageForm {
    pub facility: Option<String>,
    pub image: Option<UploadedFile>,
    pub caption: Option<String>,
}

impl ImageForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = ImageForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(multipart_error)?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "image" => {
                    let filename = field.file_name().map(|f| f.to_string());
                    let data = field
                        .bytes()
                        .await
                        .map_err(multipart_error)?
                        .to_vec();
                    form.image = Some(UploadedFile { filename, data });
                }
                "facility" => {
                    form.facility = Some(
                        field
                            .text()
                            .await
                            .map_err(multipart_error)?,
                    );
                }
                "caption" => {
                    form.caption = Some(
                        field
                            .text()
                            .await
                            .map_err(multipart_error)?,
                    );
                }
                other => {
                    tracing::debug!("Ignoring unknown multipart field '{}'", other);
                }
            }
        }

        Ok(form)
    }

    /// Parses the facility reference, recording a field error if it is malformed.
    pub fn facility_id(&self, errors: &mut FieldErrors) -> Option<i32> {
        let raw = self.facility.as_deref()?.trim();
        match raw.parse::<i32>() {
            Ok(id) => Some(id),
            Err(_) => {
                errors.add(
                    "facility",
                    format!("Incorrect type. Expected pk value, received {}.", raw),
                );
                None
            }
        }
    }

    /// Checks that need no database access. `partial` skips the required checks.
    pub fn check(&self, partial: bool) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if !partial {
            errors.require("facility", &self.facility);
            if self.image.is_none() {
                errors.add("image", "No file was submitted.");
            }
        }

        if let Some(file) = &self.image
            && file.data.is_empty()
        {
            errors.add("image", "The submitted file is empty.");
        }

        if let Some(caption) = &self.caption
            && caption.chars().count() > CAPTION_MAX_CHARS
        {
            errors.add(
                "caption",
                format!(
                    "Ensure this field has no more than {} characters.",
                    CAPTION_MAX_CHARS
                ),
            );
        }

        errors
    }
}
