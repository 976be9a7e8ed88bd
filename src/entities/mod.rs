pub mod prelude;

pub mod amenities;
pub mod facilities;
pub mod facility_amenities;
pub mod facility_images;
