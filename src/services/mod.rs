pub mod amenity_service;
pub mod facility_service;
pub mod image_service;
pub mod storage;
