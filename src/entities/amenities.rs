use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "amenities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique, column_type = "String(StringLen::N(100))")]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::facility_amenities::Entity")]
    FacilityAmenities,
}

impl Related<super::facility_amenities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FacilityAmenities.def()
    }
}

impl Related<super::facilities::Entity> for Entity {
    fn to() -> RelationDef {
        super::facility_amenities::Relation::Facilities.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::facility_amenities::Relation::Amenities.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
