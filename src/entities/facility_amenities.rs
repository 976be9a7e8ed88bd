use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Join table backing the facility <-> amenity set.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "facility_amenities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub facility_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub amenity_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::facilities::Entity",
        from = "Column::FacilityId",
        to = "super::facilities::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Facilities,
    #[sea_orm(
        belongs_to = "super::amenities::Entity",
        from = "Column::AmenityId",
        to = "super::amenities::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Amenities,
}

impl Related<super::facilities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Facilities.def()
    }
}

impl Related<super::amenities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Amenities.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
