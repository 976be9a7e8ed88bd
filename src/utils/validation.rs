use anyhow::{Result, anyhow};
use std::borrow::Cow;
use std::io::Cursor;
use validator::ValidationError;

/// Schemes accepted for `map_url`
const ALLOWED_URL_SCHEMES: &[&str] = &["http", "https", "ftp", "ftps"];

fn error_with_message(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Blank is allowed; anything else must be an absolute URL with a host.
pub fn validate_optional_url(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Ok(());
    }
    let parsed =
        url::Url::parse(value).map_err(|_| error_with_message("url", "Enter a valid URL."))?;
    if !ALLOWED_URL_SCHEMES.contains(&parsed.scheme()) || parsed.host_str().is_none() {
        return Err(error_with_message("url", "Enter a valid URL."));
    }
    Ok(())
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error_with_message("blank", "This field may not be blank."));
    }
    Ok(())
}

/// What an uploaded payload turned out to be
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedImage {
    pub mime_type: &'static str,
    pub extension: &'static str,
    pub width: u32,
    pub height: u32,
}

/// Verifies that `data` is a decodable image (PNG, JPEG, GIF or WebP).
pub fn inspect_image(data: &[u8]) -> Result<DetectedImage> {
    let kind = infer::get(data)
        .filter(|k| k.matcher_type() == infer::MatcherType::Image)
        .ok_or_else(|| anyhow!("not an image"))?;

    let reader = image::io::Reader::new(Cursor::new(data)).with_guessed_format()?;
    if reader.format().is_none() {
        return Err(anyhow!("unknown image format"));
    }
    // Decode fully so truncated pixel data is rejected.
    let img = reader.decode()?;
    let (width, height) = (img.width(), img.height());

    Ok(DetectedImage {
        mime_type: kind.mime_type(),
        extension: kind.extension(),
        width,
        height,
    })
}

/// Content type for serving a stored payload
pub fn content_type_for(data: &[u8]) -> &'static str {
    infer::get(data)
        .map(|k| k.mime_type())
        .unwrap_or("application/octet-stream")
}

/// Storage keys must be relative and must not climb out of the media root.
pub fn is_safe_storage_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('/')
        && !key.contains('\\')
        && !key.contains('\0')
        && key.split('/').all(|segment| !segment.is_empty() && segment != ".." && segment != ".")
}
