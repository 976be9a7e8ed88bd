use crate::api::error::{AppError, FieldErrors};
use crate::entities::{amenities, facility_amenities, prelude::*};
use crate::models::{AmenityView, AmenityWrite};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, SqlErr, TransactionTrait,
};
use tracing::info;

const DUPLICATE_NAME: &str = "amenity with this name already exists.";

pub struct AmenityService {
    db: DatabaseConnection,
}

impl AmenityService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<AmenityView>, AppError> {
        let rows = Amenities::find()
            .order_by_asc(amenities::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(AmenityView::from).collect())
    }

    pub async fn get(&self, id: i32) -> Result<amenities::Model, AppError> {
        Amenities::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(AppError::not_found)
    }

    pub async fn create(&self, payload: AmenityWrite) -> Result<amenities::Model, AppError> {
        payload.check(false)?;
        let name = payload.name().unwrap_or_default();
        self.ensure_unique_name(&name, None).await?;

        let model = amenities::ActiveModel {
            name: Set(name),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(map_unique_violation)?;

        info!("🏷️  Amenity created: {} (id={})", model.name, model.id);
        Ok(model)
    }

    /// Full update when `partial` is false, otherwise only the fields sent.
    pub async fn update(
        &self,
        id: i32,
        payload: AmenityWrite,
        partial: bool,
    ) -> Result<amenities::Model, AppError> {
        let existing = self.get(id).await?;
        payload.check(partial)?;

        let Some(name) = payload.name() else {
            return Ok(existing);
        };
        self.ensure_unique_name(&name, Some(id)).await?;

        let mut active: amenities::ActiveModel = existing.into();
        active.name = Set(name);
        let model = active
            .update(&self.db)
            .await
            .map_err(map_unique_violation)?;
        Ok(model)
    }

    /// Removes the amenity and its facility associations. Facilities stay.
    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        let existing = self.get(id).await?;

        let txn = self.db.begin().await?;
        FacilityAmenities::delete_many()
            .filter(facility_amenities::Column::AmenityId.eq(id))
            .exec(&txn)
            .await?;
        Amenities::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        info!("🗑️  Amenity deleted: {} (id={})", existing.name, id);
        Ok(())
    }

    async fn ensure_unique_name(&self, name: &str, exclude: Option<i32>) -> Result<(), AppError> {
        let mut query = Amenities::find().filter(amenities::Column::Name.eq(name));
        if let Some(id) = exclude {
            query = query.filter(amenities::Column::Id.ne(id));
        }
        if query.one(&self.db).await?.is_some() {
            return Err(FieldErrors::single("name", DUPLICATE_NAME).into());
        }
        Ok(())
    }
}

/// Unique index violations surface as the same field error as the pre-check.
fn map_unique_violation(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            FieldErrors::single("name", DUPLICATE_NAME).into()
        }
        _ => AppError::Database(err),
    }
}
