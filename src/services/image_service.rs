use crate::api::error::{AppError, FieldErrors};
use crate::config::AppConfig;
use crate::entities::{facility_images, prelude::*};
use crate::models::{ImageForm, ImageListQuery, ImageView};
use crate::services::storage::StorageService;
use crate::utils::validation::{DetectedImage, content_type_for, inspect_image, is_safe_storage_key};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Key prefix for stored facility images
pub const IMAGE_KEY_PREFIX: &str = "facilities/images/";

const INVALID_IMAGE: &str =
    "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";

pub struct ImageService {
    db: DatabaseConnection,
    storage: Arc<dyn StorageService>,
    config: AppConfig,
}

/// Validated parts of an image form
struct CheckedForm {
    facility_id: Option<i32>,
    detected: Option<DetectedImage>,
}

impl ImageService {
    pub fn new(db: DatabaseConnection, storage: Arc<dyn StorageService>, config: AppConfig) -> Self {
        Self {
            db,
            storage,
            config,
        }
    }

    pub fn view(&self, model: facility_images::Model) -> ImageView {
        ImageView::new(model, &self.config)
    }

    pub async fn list(&self, query: ImageListQuery) -> Result<Vec<ImageView>, AppError> {
        let mut select = FacilityImages::find().order_by_asc(facility_images::Column::Id);
        if let Some(facility_id) = query.facility {
            select = select.filter(facility_images::Column::FacilityId.eq(facility_id));
        }
        let rows = select.all(&self.db).await?;
        Ok(rows.into_iter().map(|m| self.view(m)).collect())
    }

    pub async fn get(&self, id: i32) -> Result<facility_images::Model, AppError> {
        FacilityImages::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(AppError::not_found)
    }

    pub async fn create(&self, mut form: ImageForm) -> Result<facility_images::Model, AppError> {
        let checked = self.check(&form, false).await?;
        let (Some(facility_id), Some(detected), Some(file)) =
            (checked.facility_id, checked.detected, form.image.take())
        else {
            return Err(AppError::Internal(
                "Image form passed validation without facility or image".to_string(),
            ));
        };

        let key = self.store(file.data, &detected, file.filename.as_deref()).await?;

        let active = facility_images::ActiveModel {
            facility_id: Set(facility_id),
            image: Set(key.clone()),
            caption: Set(form.caption.unwrap_or_default()),
            ..Default::default()
        };
        match active.insert(&self.db).await {
            Ok(model) => Ok(model),
            Err(e) => {
                self.discard(&key).await;
                Err(e.into())
            }
        }
    }

    /// Full update when `partial` is false. A new upload replaces the stored payload.
    pub async fn update(
        &self,
        id: i32,
        mut form: ImageForm,
        partial: bool,
    ) -> Result<facility_images::Model, AppError> {
        let existing = self.get(id).await?;
        let checked = self.check(&form, partial).await?;

        let mut active: facility_images::ActiveModel = existing.clone().into();
        if let Some(facility_id) = checked.facility_id {
            active.facility_id = Set(facility_id);
        }
        if let Some(caption) = form.caption.take() {
            active.caption = Set(caption);
        }

        let mut new_key = None;
        if let (Some(file), Some(detected)) = (form.image.take(), checked.detected) {
            let key = self.store(file.data, &detected, file.filename.as_deref()).await?;
            active.image = Set(key.clone());
            new_key = Some(key);
        }

        if !active.is_changed() {
            return Ok(existing);
        }

        match active.update(&self.db).await {
            Ok(model) => {
                if new_key.is_some() {
                    self.discard(&existing.image).await;
                }
                Ok(model)
            }
            Err(e) => {
                if let Some(key) = new_key {
                    self.discard(&key).await;
                }
                Err(e.into())
            }
        }
    }

    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        let existing = self.get(id).await?;
        FacilityImages::delete_by_id(id).exec(&self.db).await?;
        self.discard(&existing.image).await;
        info!("🗑️  Image deleted: {} (id={})", existing.image, id);
        Ok(())
    }

    /// Payload and content type of a stored image.
    pub async fn open(&self, key: &str) -> Result<(&'static str, Vec<u8>), AppError> {
        if !is_safe_storage_key(key) {
            return Err(AppError::NotFound("File not found".to_string()));
        }
        let data = self
            .storage
            .get_file(key)
            .await
            .map_err(|_| AppError::NotFound("File not found".to_string()))?;
        Ok((content_type_for(&data), data))
    }

    /// Whether the payload store answers a lookup under the image prefix.
    pub async fn storage_reachable(&self) -> bool {
        match self.storage.file_exists(IMAGE_KEY_PREFIX).await {
            Ok(_) => true,
            Err(e) => {
                warn!("⚠️ Image storage unreachable: {}", e);
                false
            }
        }
    }

    async fn check(&self, form: &ImageForm, partial: bool) -> Result<CheckedForm, AppError> {
        let mut errors: FieldErrors = form.check(partial);

        let facility_id = form.facility_id(&mut errors);
        if let Some(id) = facility_id
            && Facilities::find_by_id(id).one(&self.db).await?.is_none()
        {
            errors.add(
                "facility",
                format!("Invalid pk \"{}\" - object does not exist.", id),
            );
        }

        let detected = match &form.image {
            Some(file) if !file.data.is_empty() => match inspect_image(&file.data) {
                Ok(detected) => Some(detected),
                Err(e) => {
                    tracing::debug!("Rejected upload {:?}: {}", file.filename, e);
                    errors.add("image", INVALID_IMAGE);
                    None
                }
            },
            _ => None,
        };

        errors.into_result()?;
        Ok(CheckedForm {
            facility_id,
            detected,
        })
    }

    async fn store(
        &self,
        data: Vec<u8>,
        detected: &DetectedImage,
        filename: Option<&str>,
    ) -> Result<String, AppError> {
        let key = format!(
            "{}{}.{}",
            IMAGE_KEY_PREFIX,
            uuid::Uuid::new_v4().simple(),
            detected.extension
        );
        let size = data.len();
        self.storage.upload_file(&key, data).await?;
        info!(
            "🖼️  Image stored: {} ({} bytes, {}x{}, {}, from {:?})",
            key, size, detected.width, detected.height, detected.mime_type, filename
        );
        Ok(key)
    }

    async fn discard(&self, key: &str) {
        if let Err(e) = self.storage.delete_file(key).await {
            warn!("⚠️ Failed to remove stored image '{}': {}", key, e);
        }
    }
}
