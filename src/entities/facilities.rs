use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Who operates the facility. Stored and served as the two-letter code.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(2))")]
pub enum ManagementEntity {
    /// 自社管理
    #[default]
    #[sea_orm(string_value = "IH")]
    #[serde(rename = "IH", alias = "IN_HOUSE")]
    InHouse,
    /// 委託管理
    #[sea_orm(string_value = "CM")]
    #[serde(rename = "CM", alias = "CONTRACT")]
    Contract,
}

impl ManagementEntity {
    /// Accepts the stored code or the long choice name.
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "IH" | "IN_HOUSE" => Some(Self::InHouse),
            "CM" | "CONTRACT" => Some(Self::Contract),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::InHouse => "自社管理",
            Self::Contract => "委託管理",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "facilities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "String(StringLen::N(200))")]
    pub facility_name: String,
    /// Beds24 property key
    #[sea_orm(column_type = "String(StringLen::N(200))")]
    pub prop_key: String,
    /// Beds24 room key
    #[sea_orm(column_type = "String(StringLen::N(50))")]
    pub room_key: String,
    pub capacity: i32,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "String(StringLen::N(100))")]
    pub short_description: String,
    #[sea_orm(column_type = "String(StringLen::N(200))")]
    pub address: String,
    pub num_parking: i32,
    #[sea_orm(column_type = "String(StringLen::N(200))")]
    pub map_url: String,
    pub management_entity: ManagementEntity,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::facility_images::Entity")]
    FacilityImages,
    #[sea_orm(has_many = "super::facility_amenities::Entity")]
    FacilityAmenities,
}

impl Related<super::facility_images::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FacilityImages.def()
    }
}

impl Related<super::facility_amenities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FacilityAmenities.def()
    }
}

impl Related<super::amenities::Entity> for Entity {
    fn to() -> RelationDef {
        super::facility_amenities::Relation::Amenities.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::facility_amenities::Relation::Facilities.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
