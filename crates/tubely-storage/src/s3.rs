use crate::keys::validate_key;
use crate::traits::{Storage, StorageError, StorageResult};
use async_trait::async_trait;
use http::Method;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::buffered::BufWriter;
use object_store::path::Path;
use object_store::signer::Signer;
use object_store::{Attribute, Attributes, ObjectStore, ObjectStoreExt, Result as ObjectResult};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWriteExt};

/// Buffered bytes per multipart part; S3 requires at least 5 MiB for all but the last.
const UPLOAD_PART_SIZE: usize = 8 * 1024 * 1024;

/// Connection settings shared by every bucket this service talks to.
#[derive(Clone, Debug)]
pub struct S3Settings {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible providers
    pub endpoint_url: Option<String>,
    /// Static credentials; when absent the AWS environment chain is used.
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    settings: S3Settings,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// `settings.endpoint_url` may point at an S3-compatible provider
    /// (e.g., "http://localhost:9000" for MinIO).
    pub async fn new(settings: S3Settings) -> StorageResult<Self> {
        let store = build_store(&settings, &settings.bucket)?;
        Ok(S3Storage { store, settings })
    }

    /// Store handle for `bucket`; the configured bucket reuses the cached client.
    fn store_for(&self, bucket: &str) -> StorageResult<AmazonS3> {
        if bucket == self.settings.bucket {
            Ok(self.store.clone())
        } else {
            build_store(&self.settings, bucket)
        }
    }
}

fn build_store(settings: &S3Settings, bucket: &str) -> StorageResult<AmazonS3> {
    if bucket.is_empty() {
        return Err(StorageError::ConfigError("bucket name is empty".to_string()));
    }

    let mut builder = AmazonS3Builder::from_env()
        .with_region(settings.region.clone())
        .with_bucket_name(bucket.to_string());

    if let Some(ref endpoint) = settings.endpoint_url {
        let allow_http = endpoint.starts_with("http://");
        builder = builder
            .with_endpoint(endpoint.clone())
            .with_allow_http(allow_http);
    }

    if let (Some(id), Some(secret)) = (&settings.access_key_id, &settings.secret_access_key) {
        builder = builder
            .with_access_key_id(id.clone())
            .with_secret_access_key(secret.clone());
    }

    builder
        .build()
        .map_err(|e| StorageError::ConfigError(e.to_string()))
}

/// Copy `reader` into `location` until EOF.
///
/// At most `part_size` bytes are buffered: smaller objects go up in one PUT,
/// larger ones as a multipart upload that is aborted if the copy fails.
async fn stream_to_store<R>(
    store: Arc<dyn ObjectStore>,
    location: Path,
    content_type: &str,
    part_size: usize,
    reader: &mut R,
) -> StorageResult<u64>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut attributes = Attributes::new();
    attributes.insert(Attribute::ContentType, content_type.to_string().into());
    let mut writer =
        BufWriter::with_capacity(store, location.clone(), part_size).with_attributes(attributes);

    let copied = match tokio::io::copy(reader, &mut writer).await {
        Ok(size) => writer.shutdown().await.map(|_| size),
        Err(e) => Err(e),
    };

    match copied {
        Ok(size) => Ok(size),
        Err(e) => {
            if let Err(abort_err) = writer.abort().await {
                tracing::warn!(
                    error = %abort_err,
                    location = %location,
                    "Failed to abort multipart upload"
                );
            }
            Err(StorageError::UploadFailed(e.to_string()))
        }
    }
}

#[async_trait]
impl Storage for S3Storage {
    fn default_bucket(&self) -> &str {
        &self.settings.bucket
    }

    async fn upload_stream(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
        mut reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<u64> {
        validate_key(key)?;
        let store: Arc<dyn ObjectStore> = Arc::new(self.store_for(bucket)?);
        let start = std::time::Instant::now();

        let result = stream_to_store(
            store,
            Path::from(key.to_string()),
            content_type,
            UPLOAD_PART_SIZE,
            &mut reader,
        )
        .await;

        let size = result.inspect_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %bucket,
                key = %key,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 stream upload failed"
            );
        })?;

        tracing::info!(
            bucket = %bucket,
            key = %key,
            content_type = %content_type,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 stream upload successful"
        );

        Ok(size)
    }

    async fn presigned_get_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        let store = self.store_for(bucket)?;
        let location = Path::from(key.to_string());

        let url_result: ObjectResult<_> = store.signed_url(Method::GET, &location, expires_in).await;

        let url = url_result
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %bucket,
                    key = %key,
                    "S3 presign failed"
                );
                StorageError::SigningFailed(e.to_string())
            })?
            .to_string();

        Ok(url)
    }

    async fn delete(&self, bucket: &str, key: &str) -> StorageResult<()> {
        let store = self.store_for(bucket)?;
        let start = std::time::Instant::now();
        let location = Path::from(key.to_string());

        let result: ObjectResult<_> = store.delete(&location).await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %bucket,
                key = %key,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 delete failed"
            );
            StorageError::DeleteFailed(e.to_string())
        })?;

        tracing::info!(
            bucket = %bucket,
            key = %key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 delete successful"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use object_store::memory::InMemory;
    use std::io;
    use std::task::{Context, Poll};
    use tokio::io::{AsyncReadExt, ReadBuf};

    /// Reader that fails every read, standing in for a broken source file.
    struct BrokenReader;

    impl AsyncRead for BrokenReader {
        fn poll_read(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            Poll::Ready(Err(io::Error::other("read failed")))
        }
    }

    // Presigning is a local HMAC computation once static credentials are supplied.
    async fn signing_storage() -> S3Storage {
        S3Storage::new(S3Settings {
            bucket: "tubely-test".to_string(),
            region: "us-east-1".to_string(),
            endpoint_url: None,
            access_key_id: Some("AKIDEXAMPLE".to_string()),
            secret_access_key: Some("wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY".to_string()),
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_presigned_url_carries_signature_and_expiry() {
        let storage = signing_storage().await;
        let url = storage
            .presigned_get_url("tubely-test", "landscape/abc.mp4", Duration::from_secs(300))
            .await
            .unwrap();

        assert!(url.contains("landscape/abc.mp4"));
        assert!(url.contains("X-Amz-Algorithm=AWS4-HMAC-SHA256"));
        assert!(url.contains("X-Amz-Expires=300"));
        assert!(url.contains("X-Amz-Signature="));

        // Each read signs afresh; nothing is cached between calls.
        let again = storage
            .presigned_get_url("tubely-test", "landscape/abc.mp4", Duration::from_secs(300))
            .await
            .unwrap();
        assert!(again.contains("X-Amz-Signature="));
        assert!(again.contains("X-Amz-Expires=300"));
    }

    #[tokio::test]
    async fn test_presigned_url_targets_requested_bucket() {
        let storage = signing_storage().await;
        let url = storage
            .presigned_get_url("archive-bucket", "portrait/xyz.mp4", Duration::from_secs(300))
            .await
            .unwrap();

        assert!(url.contains("archive-bucket"));
        assert!(!url.contains("tubely-test"));
    }

    #[tokio::test]
    async fn test_upload_rejects_invalid_key_before_reading() {
        let storage = signing_storage().await;
        let reader: Pin<Box<dyn AsyncRead + Send + Unpin>> = Box::pin(&b"data"[..]);
        let err = storage
            .upload_stream("tubely-test", "../escape.mp4", "video/mp4", reader)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
    }

    #[tokio::test]
    async fn test_empty_bucket_is_config_error() {
        let storage = signing_storage().await;
        let err = storage
            .presigned_get_url("", "other/a.mp4", Duration::from_secs(300))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::ConfigError(_)));
    }

    #[tokio::test]
    async fn test_stream_spanning_several_parts_is_stored_whole() {
        let store = Arc::new(InMemory::new());
        let location = Path::from("landscape/big.mp4");
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 253) as u8).collect();
        let mut reader = &data[..];

        let size = stream_to_store(store.clone(), location.clone(), "video/mp4", 1024, &mut reader)
            .await
            .unwrap();
        assert_eq!(size, data.len() as u64);

        let result = store.get(&location).await.unwrap();
        let content_type: &str = result
            .attributes
            .get(&Attribute::ContentType)
            .map(|v| v.as_ref())
            .unwrap();
        assert_eq!(content_type, "video/mp4");
        assert_eq!(&result.bytes().await.unwrap()[..], &data[..]);
    }

    #[tokio::test]
    async fn test_small_stream_is_stored_in_one_put() {
        let store = Arc::new(InMemory::new());
        let location = Path::from("portrait/small.mp4");
        let mut reader = &b"ftypmp42"[..];

        let size = stream_to_store(store.clone(), location.clone(), "video/mp4", 1024, &mut reader)
            .await
            .unwrap();

        assert_eq!(size, 8);
        let stored = store.get(&location).await.unwrap().bytes().await.unwrap();
        assert_eq!(&stored[..], b"ftypmp42");
    }

    #[tokio::test]
    async fn test_failed_read_leaves_no_object() {
        let store = Arc::new(InMemory::new());
        let location = Path::from("other/broken.mp4");
        let head = vec![7u8; 4096];
        let mut reader = (&head[..]).chain(BrokenReader);

        let err = stream_to_store(store.clone(), location.clone(), "video/mp4", 1024, &mut reader)
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::UploadFailed(_)));
        assert!(store.head(&location).await.is_err());
    }
}
