use crate::api::error::{AppError, FieldErrors};
use crate::config::AppConfig;
use crate::entities::{amenities, facilities, facility_amenities, facility_images, prelude::*};
use crate::models::{
    AmenityView, FacilityAction, FacilityRead, FacilityView, FacilityWrite, FacilityWriteView,
    ImageView, SerializerShape,
};
use crate::services::storage::StorageService;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

pub struct FacilityService {
    db: DatabaseConnection,
    storage: Arc<dyn StorageService>,
    config: AppConfig,
}

impl FacilityService {
    pub fn new(db: DatabaseConnection, storage: Arc<dyn StorageService>, config: AppConfig) -> Self {
        Self {
            db,
            storage,
            config,
        }
    }

    pub async fn get(&self, id: i32) -> Result<facilities::Model, AppError> {
        Facilities::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(AppError::not_found)
    }

    pub async fn list(&self) -> Result<Vec<FacilityView>, AppError> {
        let rows = Facilities::find()
            .order_by_asc(facilities::Column::Id)
            .all(&self.db)
            .await?;
        let views = self.read_views(rows).await?;
        Ok(views.into_iter().map(FacilityView::Read).collect())
    }

    pub async fn create(&self, payload: FacilityWrite) -> Result<FacilityView, AppError> {
        let amenity_ids = self.validate(&payload, FacilityAction::Create).await?;

        let txn = self.db.begin().await?;
        let model = payload.new_active_model().insert(&txn).await?;
        if let Some(ids) = &amenity_ids {
            replace_amenities(&txn, model.id, ids).await?;
        }
        txn.commit().await?;

        info!(
            "🏠 Facility created: {} (id={}, {})",
            model.facility_name,
            model.id,
            model.management_entity.label()
        );
        self.render(FacilityAction::Create, model).await
    }

    /// `action` is either `Update` (required fields enforced) or `PartialUpdate`.
    pub async fn update(
        &self,
        id: i32,
        payload: FacilityWrite,
        action: FacilityAction,
    ) -> Result<FacilityView, AppError> {
        let existing = self.get(id).await?;
        let amenity_ids = self.validate(&payload, action).await?;

        let mut active: facilities::ActiveModel = existing.clone().into();
        payload.apply_to(&mut active);

        let txn = self.db.begin().await?;
        let model = if active.is_changed() {
            active.update(&txn).await?
        } else {
            existing
        };
        if let Some(ids) = &amenity_ids {
            replace_amenities(&txn, model.id, ids).await?;
        }
        txn.commit().await?;

        self.render(action, model).await
    }

    /// Deletes the facility, its images and its amenity links in one transaction.
    /// Stored image payloads are removed once the transaction has committed.
    pub async fn delete(&self, facility: &facilities::Model) -> Result<(), AppError> {
        let txn = self.db.begin().await?;

        let images = FacilityImages::find()
            .filter(facility_images::Column::FacilityId.eq(facility.id))
            .all(&txn)
            .await?;
        FacilityImages::delete_many()
            .filter(facility_images::Column::FacilityId.eq(facility.id))
            .exec(&txn)
            .await?;
        FacilityAmenities::delete_many()
            .filter(facility_amenities::Column::FacilityId.eq(facility.id))
            .exec(&txn)
            .await?;
        let res = Facilities::delete_by_id(facility.id).exec(&txn).await?;
        if res.rows_affected == 0 {
            return Err(AppError::not_found());
        }

        txn.commit().await?;

        for image in &images {
            if let Err(e) = self.storage.delete_file(&image.image).await {
                warn!("⚠️ Failed to remove stored image '{}': {}", image.image, e);
            }
        }

        info!(
            "🗑️  Facility deleted: {} (id={}, {} images)",
            facility.facility_name,
            facility.id,
            images.len()
        );
        Ok(())
    }

    /// Replaces the whole amenity set of a facility.
    pub async fn set_amenities(&self, facility_id: i32, ids: &[i32]) -> Result<(), AppError> {
        self.get(facility_id).await?;
        self.missing_amenities(ids).await?.into_result()?;

        let txn = self.db.begin().await?;
        replace_amenities(&txn, facility_id, ids).await?;
        txn.commit().await?;
        Ok(())
    }

    /// Adds amenities to a facility, leaving existing links in place.
    pub async fn add_amenities(&self, facility_id: i32, ids: &[i32]) -> Result<(), AppError> {
        self.get(facility_id).await?;
        self.missing_amenities(ids).await?.into_result()?;

        let current = self.amenity_ids_of(facility_id).await?;
        let mut new_ids: Vec<i32> = Vec::new();
        for id in ids {
            if !current.contains(id) && !new_ids.contains(id) {
                new_ids.push(*id);
            }
        }
        if new_ids.is_empty() {
            return Ok(());
        }

        FacilityAmenities::insert_many(new_ids.into_iter().map(|amenity_id| {
            facility_amenities::ActiveModel {
                facility_id: Set(facility_id),
                amenity_id: Set(amenity_id),
            }
        }))
        .exec_without_returning(&self.db)
        .await?;
        Ok(())
    }

    /// Builds the representation `action` calls for.
    pub async fn render(
        &self,
        action: FacilityAction,
        model: facilities::Model,
    ) -> Result<FacilityView, AppError> {
        match action.shape() {
            SerializerShape::Read => self
                .read_views(vec![model])
                .await?
                .into_iter()
                .next()
                .map(FacilityView::Read)
                .ok_or_else(|| AppError::Internal("Facility view was not built".to_string())),
            SerializerShape::Write => {
                let ids = self.amenity_ids_of(model.id).await?;
                Ok(FacilityView::Write(FacilityWriteView::new(model, ids)))
            }
        }
    }

    /// Field checks first, then amenity references. Returns the amenity set to write, if any.
    async fn validate(
        &self,
        payload: &FacilityWrite,
        action: FacilityAction,
    ) -> Result<Option<Vec<i32>>, AppError> {
        let mut errors = match payload.check(action) {
            Ok(()) => FieldErrors::new(),
            Err(e) => e,
        };
        let amenity_ids = payload.amenity_ids();
        if let Some(ids) = &amenity_ids {
            errors.merge(self.missing_amenities(ids).await?);
        }
        errors.into_result()?;
        Ok(amenity_ids)
    }

    async fn missing_amenities(&self, ids: &[i32]) -> Result<FieldErrors, AppError> {
        let mut errors = FieldErrors::new();
        if ids.is_empty() {
            return Ok(errors);
        }
        let found: Vec<i32> = Amenities::find()
            .filter(amenities::Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|a| a.id)
            .collect();
        for id in ids {
            if !found.contains(id) {
                errors.add(
                    "amenities",
                    format!("Invalid pk \"{}\" - object does not exist.", id),
                );
            }
        }
        Ok(errors)
    }

    async fn amenity_ids_of(&self, facility_id: i32) -> Result<Vec<i32>, AppError> {
        let links = FacilityAmenities::find()
            .filter(facility_amenities::Column::FacilityId.eq(facility_id))
            .order_by_asc(facility_amenities::Column::AmenityId)
            .all(&self.db)
            .await?;
        Ok(links.into_iter().map(|l| l.amenity_id).collect())
    }

    /// Loads amenities and images for all `rows` with one query per table.
    async fn read_views(&self, rows: Vec<facilities::Model>) -> Result<Vec<FacilityRead>, AppError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i32> = rows.iter().map(|f| f.id).collect();

        let links = FacilityAmenities::find()
            .filter(facility_amenities::Column::FacilityId.is_in(ids.clone()))
            .order_by_asc(facility_amenities::Column::AmenityId)
            .all(&self.db)
            .await?;

        let mut amenity_ids: Vec<i32> = links.iter().map(|l| l.amenity_id).collect();
        amenity_ids.sort_unstable();
        amenity_ids.dedup();
        let amenity_by_id: HashMap<i32, amenities::Model> = if amenity_ids.is_empty() {
            HashMap::new()
        } else {
            Amenities::find()
                .filter(amenities::Column::Id.is_in(amenity_ids))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|a| (a.id, a))
                .collect()
        };

        let mut amenities_of: HashMap<i32, Vec<AmenityView>> = HashMap::new();
        for link in links {
            if let Some(amenity) = amenity_by_id.get(&link.amenity_id) {
                amenities_of
                    .entry(link.facility_id)
                    .or_default()
                    .push(AmenityView::from(amenity.clone()));
            }
        }

        let mut images_of: HashMap<i32, Vec<ImageView>> = HashMap::new();
        for image in FacilityImages::find()
            .filter(facility_images::Column::FacilityId.is_in(ids))
            .order_by_asc(facility_images::Column::Id)
            .all(&self.db)
            .await?
        {
            images_of
                .entry(image.facility_id)
                .or_default()
                .push(ImageView::new(image, &self.config));
        }

        Ok(rows
            .into_iter()
            .map(|f| {
                let amenities = amenities_of.remove(&f.id).unwrap_or_default();
                let images = images_of.remove(&f.id).unwrap_or_default();
                FacilityRead::new(f, amenities, images)
            })
            .collect())
    }
}

/// Deletes every link of `facility_id` and inserts `ids` in its place.
async fn replace_amenities<C: ConnectionTrait>(
    conn: &C,
    facility_id: i32,
    ids: &[i32],
) -> Result<(), AppError> {
    FacilityAmenities::delete_many()
        .filter(facility_amenities::Column::FacilityId.eq(facility_id))
        .exec(conn)
        .await?;

    if ids.is_empty() {
        return Ok(());
    }

    FacilityAmenities::insert_many(ids.iter().map(|&amenity_id| facility_amenities::ActiveModel {
        facility_id: Set(facility_id),
        amenity_id: Set(amenity_id),
    }))
    .exec_without_returning(conn)
    .await?;
    Ok(())
}
