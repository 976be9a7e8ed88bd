pub mod api;
pub mod config;
pub mod entities;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod utils;

use crate::api::handlers::{amenities, facilities, health, images, media};
use crate::config::AppConfig;
use crate::services::amenity_service::AmenityService;
use crate::services::facility_service::FacilityService;
use crate::services::image_service::ImageService;
use crate::services::storage::StorageService;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware::from_fn,
    routing::get,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::health::index,
        api::handlers::health::health_check,
        api::handlers::facilities::list_facilities,
        api::handlers::facilities::create_facility,
        api::handlers::facilities::retrieve_facility,
        api::handlers::facilities::update_facility,
        api::handlers::facilities::partial_update_facility,
        api::handlers::facilities::delete_facility,
        api::handlers::amenities::list_amenities,
        api::handlers::amenities::create_amenity,
        api::handlers::amenities::retrieve_amenity,
        api::handlers::amenities::update_amenity,
        api::handlers::amenities::partial_update_amenity,
        api::handlers::amenities::delete_amenity,
        api::handlers::images::list_images,
        api::handlers::images::create_image,
        api::handlers::images::retrieve_image,
        api::handlers::images::update_image,
        api::handlers::images::partial_update_image,
        api::handlers::images::delete_image,
        api::handlers::media::serve_media,
    ),
    components(
        schemas(
            api::handlers::health::HealthResponse,
            api::handlers::health::ComponentStatus,
            entities::facilities::ManagementEntity,
            models::FacilityRead,
            models::FacilityWriteView,
            models::FacilityWrite,
            models::AmenityView,
            models::AmenityWrite,
            models::ImageView,
        )
    ),
    tags(
        (name = "facilities", description = "Lodging facility endpoints"),
        (name = "amenities", description = "Amenity catalogue endpoints"),
        (name = "images", description = "Facility image endpoints"),
        (name = "system", description = "Liveness and health")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub storage: Arc<dyn StorageService>,
    pub config: AppConfig,
    pub facilities: Arc<FacilityService>,
    pub amenities: Arc<AmenityService>,
    pub images: Arc<ImageService>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, storage: Arc<dyn StorageService>, config: AppConfig) -> Self {
        let facilities = Arc::new(FacilityService::new(
            db.clone(),
            storage.clone(),
            config.clone(),
        ));
        let amenities = Arc::new(AmenityService::new(db.clone()));
        let images = Arc::new(ImageService::new(
            db.clone(),
            storage.clone(),
            config.clone(),
        ));

        Self {
            db,
            storage,
            config,
            facilities,
            amenities,
            images,
        }
    }
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    let allow_origin = if config.allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn create_app(state: AppState) -> Router {
    let mut router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/index/", get(health::index))
        .route("/health", get(health::health_check))
        .route(
            "/facilities/",
            get(facilities::list_facilities).post(facilities::create_facility),
        )
        .route(
            "/facilities/:id/",
            get(facilities::retrieve_facility)
                .put(facilities::update_facility)
                .patch(facilities::partial_update_facility)
                .delete(facilities::delete_facility),
        )
        .route(
            "/amenities/",
            get(amenities::list_amenities).post(amenities::create_amenity),
        )
        .route(
            "/amenities/:id/",
            get(amenities::retrieve_amenity)
                .put(amenities::update_amenity)
                .patch(amenities::partial_update_amenity)
                .delete(amenities::delete_amenity),
        )
        .route(
            "/images/",
            get(images::list_images).post(images::create_image),
        )
        .route(
            "/images/:id/",
            get(images::retrieve_image)
                .put(images::update_image)
                .patch(images::partial_update_image)
                .delete(images::delete_image),
        );

    // An absolute MEDIA_URL points at an external host that serves the files itself.
    if state.config.media_url.starts_with('/') {
        let media_route = format!("{}*key", state.config.media_url);
        router = router.route(&media_route, get(media::serve_media));
    }

    router
        .layer(from_fn(api::middleware::request_id::request_id_middleware))
        .layer(cors_layer(&state.config))
        .layer(DefaultBodyLimit::max(state.config.max_upload_size))
        .with_state(state)
}
