use crate::config::{AppConfig, StorageBackend};
use crate::services::storage::{LocalStorageService, S3StorageService, StorageService};
use anyhow::anyhow;
use aws_sdk_s3::config::Region;
use std::env;
use std::sync::Arc;
use tracing::info;

pub async fn setup_storage(config: &AppConfig) -> anyhow::Result<Arc<dyn StorageService>> {
    match config.storage_backend {
        StorageBackend::Local => {
            let storage = LocalStorageService::new(&config.media_root);
            tokio::fs::create_dir_all(storage.root()).await?;
            info!("🗂️  Local Storage: {}", storage.root().display());
            Ok(Arc::new(storage))
        }
        StorageBackend::S3 => Ok(Arc::new(setup_s3().await?)),
    }
}

async fn setup_s3() -> anyhow::Result<S3StorageService> {
    let endpoint_url = required_env("MINIO_ENDPOINT")?;
    let access_key = required_env("MINIO_ACCESS_KEY")?;
    let secret_key = required_env("MINIO_SECRET_KEY")?;
    let bucket = required_env("MINIO_BUCKET")?;

    info!("☁️  S3 Storage: {} (Bucket: {})", endpoint_url, bucket);

    let aws_config = aws_config::from_env()
        .endpoint_url(&endpoint_url)
        .region(Region::new("us-east-1"))
        .credentials_provider(aws_sdk_s3::config::Credentials::new(
            access_key, secret_key, None, None, "static",
        ))
        .load()
        .await;

    let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
        .force_path_style(true)
        .build();

    let s3_client = aws_sdk_s3::Client::from_conf(s3_config);

    // Ensure bucket exists
    match s3_client.head_bucket().bucket(&bucket).send().await {
        Ok(_) => info!("✅ Bucket '{}' is ready", bucket),
        Err(_) => {
            info!("🪣 Bucket '{}' not found, creating...", bucket);
            if let Err(e) = s3_client.create_bucket().bucket(&bucket).send().await {
                tracing::error!("❌ Failed to create bucket '{}': {}", bucket, e);
            } else {
                info!("✅ Bucket '{}' created successfully", bucket);
            }
        }
    }

    Ok(S3StorageService::new(s3_client, bucket))
}

fn required_env(name: &str) -> anyhow::Result<String> {
    env::var(name).map_err(|_| anyhow!("{} must be set", name))
}
