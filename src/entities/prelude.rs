pub use super::amenities::Entity as Amenities;
pub use super::facilities::Entity as Facilities;
pub use super::facility_amenities::Entity as FacilityAmenities;
pub use super::facility_images::Entity as FacilityImages;
