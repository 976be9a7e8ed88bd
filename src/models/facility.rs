use sea_orm::Set;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::amenity::AmenityView;
use super::image::ImageView;
use super::{parse_json_body, reject_nulls};
use crate::api::error::{AppError, FieldErrors};
use crate::entities::facilities::{self, ManagementEntity};

pub const CAPACITY_RANGE: (i64, i64) = (1, 20);
pub const NUM_PARKING_RANGE: (i64, i64) = (0, 10);

/// What a facility request is doing. Decides which representation is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacilityAction {
    List,
    Retrieve,
    Create,
    Update,
    PartialUpdate,
    Destroy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerializerShape {
    Read,
    Write,
}

impl FacilityAction {
    pub fn shape(self) -> SerializerShape {
        match self {
            Self::Create | Self::Update | Self::PartialUpdate => SerializerShape::Write,
            Self::List | Self::Retrieve | Self::Destroy => SerializerShape::Read,
        }
    }

    /// Create and full update must carry every required field.
    pub fn requires_all_fields(self) -> bool {
        matches!(self, Self::Create | Self::Update)
    }
}

/// Read shape: amenities and images fully expanded.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FacilityRead {
    pub id: i32,
    pub facility_name: String,
    pub capacity: i32,
    pub description: String,
    pub short_description: String,
    pub address: String,
    pub num_parking: i32,
    pub map_url: String,
    pub management_entity: ManagementEntity,
    pub amenities: Vec<AmenityView>,
    pub images: Vec<ImageView>,
    pub prop_key: String,
    pub room_key: String,
}

impl FacilityRead {
    pub fn new(
        model: facilities::Model,
        amenities: Vec<AmenityView>,
        images: Vec<ImageView>,
    ) -> Self {
        Self {
            id: model.id,
            facility_name: model.facility_name,
            capacity: model.capacity,
            description: model.description,
            short_description: model.short_description,
            address: model.address,
            num_parking: model.num_parking,
            map_url: model.map_url,
            management_entity: model.management_entity,
            amenities,
            images,
            prop_key: model.prop_key,
            room_key: model.room_key,
        }
    }
}

/// Write shape as returned after create/update: amenities as bare ids.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FacilityWriteView {
    pub id: i32,
    pub facility_name: String,
    pub capacity: i32,
    pub description: String,
    pub short_description: String,
    pub address: String,
    pub num_parking: i32,
    pub map_url: String,
    pub management_entity: ManagementEntity,
    pub amenities: Vec<i32>,
    pub prop_key: String,
    pub room_key: String,
}

impl FacilityWriteView {
    pub fn new(model: facilities::Model, amenities: Vec<i32>) -> Self {
        Self {
            id: model.id,
            facility_name: model.facility_name,
            capacity: model.capacity,
            description: model.description,
            short_description: model.short_description,
            address: model.address,
            num_parking: model.num_parking,
            map_url: model.map_url,
            management_entity: model.management_entity,
            amenities,
            prop_key: model.prop_key,
            room_key: model.room_key,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum FacilityView {
    Read(FacilityRead),
    Write(FacilityWriteView),
}

impl FacilityView {
    pub fn id(&self) -> i32 {
        match self {
            Self::Read(v) => v.id,
            Self::Write(v) => v.id,
        }
    }
}

/// Request body for create, update and partial update.
#[derive(Debug, Default, Clone, Deserialize, ToSchema, Validate)]
pub struct FacilityWrite {
    #[validate(
        length(max = 200, message = "Ensure this field has no more than 200 characters."),
        custom(function = "crate::utils::validation::validate_not_blank")
    )]
    pub facility_name: Option<String>,
    #[validate(length(max = 200, message = "Ensure this field has no more than 200 characters."))]
    pub prop_key: Option<String>,
    #[validate(length(max = 50, message = "Ensure this field has no more than 50 characters."))]
    pub room_key: Option<String>,
    pub capacity: Option<i64>,
    pub description: Option<String>,
    #[validate(length(max = 100, message = "Ensure this field has no more than 100 characters."))]
    pub short_description: Option<String>,
    #[validate(
        length(max = 200, message = "Ensure this field has no more than 200 characters."),
        custom(function = "crate::utils::validation::validate_not_blank")
    )]
    pub address: Option<String>,
    pub num_parking: Option<i64>,
    #[validate(
        length(max = 200, message = "Ensure this field has no more than 200 characters."),
        custom(function = "crate::utils::validation::validate_optional_url")
    )]
    pub map_url: Option<String>,
    /// "IH" / "CM" (or "IN_HOUSE" / "CONTRACT")
    pub management_entity: Option<String>,
    /// Ids of existing amenities; replaces the whole set when present
    pub amenities: Option<Vec<i32>>,
    /// Fields sent as explicit `null`
    #[serde(skip)]
    pub null_fields: Vec<String>,
}

fn check_range(errors: &mut FieldErrors, field: &str, value: Option<i64>, (min, max): (i64, i64)) {
    match value {
        Some(v) if v < min => errors.add(
            field,
            format!("Ensure this value is greater than or equal to {}.", min),
        ),
        Some(v) if v > max => errors.add(
            field,
            format!("Ensure this value is less than or equal to {}.", max),
        ),
        _ => {}
    }
}

impl FacilityWrite {
    pub const FIELDS: [&'static str; 11] = [
        "facility_name",
        "prop_key",
        "room_key",
        "capacity",
        "description",
        "short_description",
        "address",
        "num_parking",
        "map_url",
        "management_entity",
        "amenities",
    ];

    pub fn from_json(body: serde_json::Value) -> Result<Self, AppError> {
        let (mut payload, nulls): (Self, _) = parse_json_body(body, &Self::FIELDS)?;
        payload.null_fields = nulls;
        Ok(payload)
    }

    fn is_null(&self, field: &str) -> bool {
        self.null_fields.iter().any(|f| f == field)
    }

    /// Field rules that need no database access. Amenity ids are checked by the service.
    pub fn check(&self, action: FacilityAction) -> Result<(), FieldErrors> {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => e.into(),
        };

        reject_nulls(&mut errors, &self.null_fields);
        if action.requires_all_fields() {
            for (field, value) in [("facility_name", &self.facility_name), ("address", &self.address)] {
                if !self.is_null(field) {
                    errors.require(field, value);
                }
            }
        }

        check_range(&mut errors, "capacity", self.capacity, CAPACITY_RANGE);
        check_range(&mut errors, "num_parking", self.num_parking, NUM_PARKING_RANGE);

        if let Some(value) = &self.management_entity
            && ManagementEntity::from_wire(value).is_none()
        {
            errors.add(
                "management_entity",
                format!("\"{}\" is not a valid choice.", value),
            );
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Amenity ids without duplicates, in first-seen order.
    pub fn amenity_ids(&self) -> Option<Vec<i32>> {
        self.amenities.as_ref().map(|ids| {
            let mut seen = Vec::with_capacity(ids.len());
            for id in ids {
                if !seen.contains(id) {
                    seen.push(*id);
                }
            }
            seen
        })
    }

    /// A fresh row with defaults for every omitted field.
    pub fn new_active_model(&self) -> facilities::ActiveModel {
        let mut active = facilities::ActiveModel {
            facility_name: Set(String::new()),
            prop_key: Set(String::new()),
            room_key: Set(String::new()),
            capacity: Set(CAPACITY_RANGE.0 as i32),
            description: Set(String::new()),
            short_description: Set(String::new()),
            address: Set(String::new()),
            num_parking: Set(NUM_PARKING_RANGE.0 as i32),
            map_url: Set(String::new()),
            management_entity: Set(ManagementEntity::default()),
            ..Default::default()
        };
        self.apply_to(&mut active);
        active
    }

    /// Copies the fields that were sent onto `active`; omitted fields keep their value.
    pub fn apply_to(&self, active: &mut facilities::ActiveModel) {
        if let Some(v) = &self.facility_name {
            active.facility_name = Set(v.trim().to_string());
        }
        if let Some(v) = &self.prop_key {
            active.prop_key = Set(v.clone());
        }
        if let Some(v) = &self.room_key {
            active.room_key = Set(v.clone());
        }
        if let Some(v) = self.capacity {
            active.capacity = Set(v as i32);
        }
        if let Some(v) = &self.description {
            active.description = Set(v.clone());
        }
        if let Some(v) = &self.short_description {
            active.short_description = Set(v.clone());
        }
        if let Some(v) = &self.address {
            active.address = Set(v.trim().to_string());
        }
        if let Some(v) = self.num_parking {
            active.num_parking = Set(v as i32);
        }
        if let Some(v) = &self.map_url {
            active.map_url = Set(v.clone());
        }
        if let Some(v) = self.management_entity.as_deref().and_then(ManagementEntity::from_wire) {
            active.management_entity = Set(v);
        }
    }
}
