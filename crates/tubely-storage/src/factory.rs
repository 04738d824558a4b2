use crate::{S3Settings, S3Storage, Storage, StorageResult};
use std::sync::Arc;
use tubely_core::Config;

/// Create the object store described by configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    let settings = S3Settings {
        bucket: config.s3_bucket().to_string(),
        region: config.s3_region().to_string(),
        endpoint_url: config.s3_endpoint().map(String::from),
        access_key_id: config.aws_access_key_id().map(String::from),
        secret_access_key: config.aws_secret_access_key().map(String::from),
    };

    tracing::info!(
        bucket = %settings.bucket,
        region = %settings.region,
        endpoint = ?settings.endpoint_url,
        "Initializing S3 storage"
    );

    let storage = S3Storage::new(settings).await?;
    Ok(Arc::new(storage))
}
