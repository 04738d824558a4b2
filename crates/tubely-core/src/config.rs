//! Configuration module
//!
//! Configuration is read once at startup (`.env` first via dotenvy, then the process
//! environment) and passed explicitly to every component that needs it.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{
    DEFAULT_MAX_VIDEO_UPLOAD_BYTES, DEFAULT_PRESIGNED_URL_TTL_SECS, MAX_PRESIGNED_URL_TTL_SECS,
};

const SERVER_PORT: u16 = 8091;
const DB_MAX_CONNECTIONS: u32 = 10;
const DB_TIMEOUT_SECS: u64 = 30;
const MIN_PRODUCTION_JWT_SECRET_LEN: usize = 32;

/// Settings shared by every HTTP-facing service
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub jwt_secret: String,
}

/// Full service configuration
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub base: BaseConfig,
    // Record store
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    // Object store
    pub s3_bucket: String,
    pub s3_region: String,
    pub s3_endpoint: Option<String>, // S3-compatible providers (MinIO, DigitalOcean Spaces, etc.)
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    // Media pipeline
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub upload_temp_dir: Option<PathBuf>,
    pub max_video_upload_bytes: u64,
    pub presigned_url_ttl_secs: u64,
    /// 0 = no timeout on ffprobe/ffmpeg.
    pub media_tool_timeout_secs: u64,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<ServiceConfig>);

impl Config {
    fn inner(&self) -> &ServiceConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = ServiceConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_environment(&self.inner().base.environment)
    }

    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn jwt_secret(&self) -> &str {
        &self.inner().base.jwt_secret
    }

    pub fn database_url(&self) -> Option<&str> {
        self.inner().database_url.as_deref()
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().db_timeout_seconds
    }

    pub fn s3_bucket(&self) -> &str {
        &self.inner().s3_bucket
    }

    pub fn s3_region(&self) -> &str {
        &self.inner().s3_region
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().s3_endpoint.as_deref()
    }

    pub fn aws_access_key_id(&self) -> Option<&str> {
        self.inner().aws_access_key_id.as_deref()
    }

    pub fn aws_secret_access_key(&self) -> Option<&str> {
        self.inner().aws_secret_access_key.as_deref()
    }

    pub fn ffmpeg_path(&self) -> &str {
        &self.inner().ffmpeg_path
    }

    pub fn ffprobe_path(&self) -> &str {
        &self.inner().ffprobe_path
    }

    /// Directory for staged uploads; the OS temp dir when unset.
    pub fn upload_temp_dir(&self) -> PathBuf {
        self.inner()
            .upload_temp_dir
            .clone()
            .unwrap_or_else(env::temp_dir)
    }

    pub fn max_video_upload_bytes(&self) -> u64 {
        self.inner().max_video_upload_bytes
    }

    pub fn presigned_url_ttl(&self) -> Duration {
        Duration::from_secs(self.inner().presigned_url_ttl_secs)
    }

    pub fn media_tool_timeout(&self) -> Option<Duration> {
        match self.inner().media_tool_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

fn is_production_environment(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

/// Read an optional variable, treating empty values as unset.
fn optional_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required_env(name: &str) -> Result<String, anyhow::Error> {
    optional_env(name).ok_or_else(|| anyhow::anyhow!("{} must be set", name))
}

fn parsed_env<T: FromStr>(name: &str, default: T) -> Result<T, anyhow::Error> {
    match optional_env(name) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| anyhow::anyhow!("{} must be a valid number, got '{}'", name, raw)),
        None => Ok(default),
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port: parsed_env("PORT", SERVER_PORT)?,
            environment,
            cors_origins,
            jwt_secret: required_env("JWT_SECRET")?,
        };

        let s3_region = optional_env("S3_REGION")
            .or_else(|| optional_env("AWS_REGION"))
            .ok_or_else(|| anyhow::anyhow!("S3_REGION or AWS_REGION must be set"))?;

        Ok(ServiceConfig {
            base,
            database_url: optional_env("DATABASE_URL"),
            db_max_connections: parsed_env("DB_MAX_CONNECTIONS", DB_MAX_CONNECTIONS)?,
            db_timeout_seconds: parsed_env("DB_TIMEOUT_SECONDS", DB_TIMEOUT_SECS)?,
            s3_bucket: required_env("S3_BUCKET")?,
            s3_region,
            s3_endpoint: optional_env("S3_ENDPOINT"),
            aws_access_key_id: optional_env("AWS_ACCESS_KEY_ID"),
            aws_secret_access_key: optional_env("AWS_SECRET_ACCESS_KEY"),
            ffmpeg_path: optional_env("FFMPEG_PATH").unwrap_or_else(|| "ffmpeg".to_string()),
            ffprobe_path: optional_env("FFPROBE_PATH").unwrap_or_else(|| "ffprobe".to_string()),
            upload_temp_dir: optional_env("UPLOAD_TEMP_DIR").map(PathBuf::from),
            max_video_upload_bytes: parsed_env(
                "MAX_VIDEO_UPLOAD_BYTES",
                DEFAULT_MAX_VIDEO_UPLOAD_BYTES,
            )?,
            presigned_url_ttl_secs: parsed_env(
                "PRESIGNED_URL_TTL_SECS",
                DEFAULT_PRESIGNED_URL_TTL_SECS,
            )?,
            media_tool_timeout_secs: parsed_env("MEDIA_TOOL_TIMEOUT_SECS", 0)?,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let is_production = is_production_environment(&self.base.environment);

        if self.base.jwt_secret.is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }
        if is_production && self.base.jwt_secret.len() < MIN_PRODUCTION_JWT_SECRET_LEN {
            anyhow::bail!(
                "JWT_SECRET must be at least {} characters in production",
                MIN_PRODUCTION_JWT_SECRET_LEN
            );
        }
        if is_production && self.base.cors_origins.iter().any(|o| o == "*") {
            anyhow::bail!("CORS_ORIGINS cannot be '*' in production");
        }
        if is_production && self.database_url.is_none() {
            anyhow::bail!("DATABASE_URL is required in production");
        }

        // The bucket is persisted inside the comma-joined storage reference.
        if self.s3_bucket.contains(',') {
            anyhow::bail!("S3_BUCKET must not contain ','");
        }
        if self.s3_bucket.is_empty() || self.s3_region.is_empty() {
            anyhow::bail!("S3_BUCKET and S3_REGION must not be empty");
        }
        if self.aws_access_key_id.is_some() != self.aws_secret_access_key.is_some() {
            anyhow::bail!("AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY must be set together");
        }

        if self.max_video_upload_bytes == 0 {
            anyhow::bail!("MAX_VIDEO_UPLOAD_BYTES must be greater than 0");
        }
        if self.presigned_url_ttl_secs == 0
            || self.presigned_url_ttl_secs > MAX_PRESIGNED_URL_TTL_SECS
        {
            anyhow::bail!(
                "PRESIGNED_URL_TTL_SECS must be between 1 and {}",
                MAX_PRESIGNED_URL_TTL_SECS
            );
        }
        if self.ffmpeg_path.trim().is_empty() || self.ffprobe_path.trim().is_empty() {
            anyhow::bail!("FFMPEG_PATH and FFPROBE_PATH must not be empty");
        }

        Ok(())
    }
}
