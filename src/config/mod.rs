use std::env;

/// Where uploaded image payloads are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// Files under `media_root` on the local filesystem
    Local,
    /// S3-compatible bucket (MinIO)
    S3,
}

impl StorageBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "local" | "fs" => Some(Self::Local),
            "s3" | "minio" => Some(Self::S3),
            _ => None,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Maximum request body size for image uploads in bytes (default: 10 MB)
    pub max_upload_size: usize,

    /// URL prefix under which stored images are served (default: "/media/")
    pub media_url: String,

    /// Local directory for image payloads (default: "./media")
    pub media_root: String,

    /// Storage backend for image payloads (default: local)
    pub storage_backend: StorageBackend,

    /// Allowed CORS Origins (comma separated)
    pub allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_upload_size: 10 * 1024 * 1024, // 10 MB
            media_url: "/media/".to_string(),
            media_root: "./media".to_string(),
            storage_backend: StorageBackend::Local,
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(), // Vite default
                "http://127.0.0.1:5173".to_string(),
            ],
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            max_upload_size: env::var("MAX_UPLOAD_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_upload_size),

            media_url: env::var("MEDIA_URL")
                .map(|v| normalize_media_url(&v))
                .unwrap_or(default.media_url),

            media_root: env::var("MEDIA_ROOT").unwrap_or(default.media_root),

            storage_backend: env::var("STORAGE_BACKEND")
                .ok()
                .and_then(|v| StorageBackend::parse(&v))
                .unwrap_or(default.storage_backend),

            allowed_origins: env::var("ALLOWED_ORIGINS")
                .ok()
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or(default.allowed_origins),
        }
    }

    /// Create config for development and tests (local storage, relaxed limits)
    pub fn development() -> Self {
        Self {
            max_upload_size: 50 * 1024 * 1024,
            ..Self::default()
        }
    }

    /// Public URL of a stored image
    pub fn media_url_for(&self, key: &str) -> String {
        format!("{}{}", self.media_url, key.trim_start_matches('/'))
    }
}

fn normalize_media_url(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    }
}
