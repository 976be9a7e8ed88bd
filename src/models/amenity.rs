use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::{parse_json_body, reject_nulls};
use crate::api::error::{AppError, FieldErrors};
use crate::entities::amenities;

/// Amenity representation, identical for reads and writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AmenityView {
    pub id: i32,
    pub name: String,
}

impl From<amenities::Model> for AmenityView {
    fn from(model: amenities::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct AmenityWrite {
    #[validate(
        length(max = 100, message = "Ensure this field has no more than 100 characters."),
        custom(function = "crate::utils::validation::validate_not_blank")
    )]
    pub name: Option<String>,
    #[serde(skip)]
    pub null_fields: Vec<String>,
}

impl AmenityWrite {
    pub fn from_json(body: serde_json::Value) -> Result<Self, AppError> {
        let (mut payload, nulls): (Self, _) = parse_json_body(body, &["name"])?;
        payload.null_fields = nulls;
        Ok(payload)
    }

    pub fn check(&self, partial: bool) -> Result<(), FieldErrors> {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => e.into(),
        };
        reject_nulls(&mut errors, &self.null_fields);
        if !partial && self.null_fields.is_empty() {
            errors.require("name", &self.name);
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Trimmed name, if one was sent
    pub fn name(&self) -> Option<String> {
        self.name.as_ref().map(|n| n.trim().to_string())
    }
}
