pub mod amenity;
pub mod facility;
pub mod image;

pub use amenity::{AmenityView, AmenityWrite};
pub use facility::{
    FacilityAction, FacilityRead, FacilityView, FacilityWrite, FacilityWriteView, SerializerShape,
};
pub use image::{ImageForm, ImageListQuery, ImageView};

use crate::api::error::{AppError, FieldErrors};
use serde::de::DeserializeOwned;
use serde_json::Value;

pub const NULL_NOT_ALLOWED: &str = "This field may not be null.";

/// Deserializes a JSON object body, returning the `fields` that were sent as explicit `null`.
/// Serde alone cannot tell a `null` from an omitted key once both land in `None`.
pub(crate) fn parse_json_body<T: DeserializeOwned>(
    body: Value,
    fields: &[&str],
) -> Result<(T, Vec<String>), AppError> {
    let nulls = match &body {
        Value::Object(map) => fields
            .iter()
            .filter(|f| map.get(**f).is_some_and(Value::is_null))
            .map(|f| f.to_string())
            .collect(),
        _ => Vec::new(),
    };
    let payload = serde_json::from_value(body)
        .map_err(|e| AppError::BadRequest(format!("JSON parse error - {}", e)))?;
    Ok((payload, nulls))
}

/// Records `NULL_NOT_ALLOWED` for every explicitly nulled field.
pub(crate) fn reject_nulls(errors: &mut FieldErrors, nulls: &[String]) {
    for field in nulls {
        errors.add(field.as_str(), NULL_NOT_ALLOWED);
    }
}
