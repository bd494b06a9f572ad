use crate::error::{ConfigError, CoreError};
use aws_sdk_s3::error::ProvideErrorMetadata;
use aws_sdk_s3::primitives::ByteStream;
use std::fmt;
use std::path::PathBuf;
use tokio::sync::OnceCell;
use tracing::debug;
use url::Url;

/// Where a config file, resume, or ledger marker lives: a plain filesystem
/// path or an `s3://bucket/key` object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageLocation {
    Local(PathBuf),
    Object { bucket: String, key: String },
}

impl StorageLocation {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        if raw.starts_with("s3://") {
            let parsed = Url::parse(raw).map_err(|_| ConfigError::InvalidStorageLocation {
                location: raw.to_string(),
            })?;
            let bucket = parsed
                .host_str()
                .ok_or_else(|| ConfigError::InvalidStorageLocation {
                    location: raw.to_string(),
                })?
                .to_string();
            let key = parsed.path().trim_start_matches('/').to_string();
            if key.is_empty() {
                return Err(ConfigError::InvalidStorageLocation {
                    location: raw.to_string(),
                });
            }
            Ok(StorageLocation::Object { bucket, key })
        } else if raw.is_empty() {
            Err(ConfigError::InvalidStorageLocation {
                location: raw.to_string(),
            })
        } else {
            Ok(StorageLocation::Local(PathBuf::from(raw)))
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self, StorageLocation::Object { .. })
    }
}

impl fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageLocation::Local(path) => write!(f, "{}", path.display()),
            StorageLocation::Object { bucket, key } => write!(f, "s3://{}/{}", bucket, key),
        }
    }
}

/// Unified reader over local files and object storage. The S3 client is
/// built on first object access; runs that only touch local paths never
/// load AWS configuration.
pub struct Storage {
    s3: OnceCell<aws_sdk_s3::Client>,
}

impl Storage {
    pub fn new() -> Self {
        Self {
            s3: OnceCell::new(),
        }
    }

    async fn s3(&self) -> &aws_sdk_s3::Client {
        self.s3
            .get_or_init(|| async {
                debug!("Initializing object storage client");
                let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
                    .load()
                    .await;
                aws_sdk_s3::Client::new(&config)
            })
            .await
    }

    pub async fn read_bytes(&self, location: &StorageLocation) -> Result<Vec<u8>, CoreError> {
        match location {
            StorageLocation::Local(path) => tokio::fs::read(path)
                .await
                .map_err(|e| map_io_error(e, &path.display().to_string())),
            StorageLocation::Object { bucket, key } => {
                let resource = location.to_string();
                let output = self
                    .s3()
                    .await
                    .get_object()
                    .bucket(bucket)
                    .key(key)
                    .send()
                    .await
                    .map_err(|e| map_object_error(e.into_service_error(), &resource))?;
                let data = output.body.collect().await.map_err(|e| CoreError::Internal {
                    message: format!("Failed to read body of {}: {}", resource, e),
                })?;
                Ok(data.into_bytes().to_vec())
            }
        }
    }

    pub async fn read_to_string(&self, location: &StorageLocation) -> Result<String, CoreError> {
        let bytes = self.read_bytes(location).await?;
        String::from_utf8(bytes).map_err(|_| CoreError::InvalidInput {
            message: format!("{} is not valid UTF-8", location),
        })
    }

    pub async fn object_exists(&self, bucket: &str, key: &str) -> Result<bool, CoreError> {
        match self
            .s3()
            .await
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_not_found() {
                    Ok(false)
                } else {
                    Err(map_object_error(
                        service_error,
                        &format!("s3://{}/{}", bucket, key),
                    ))
                }
            }
        }
    }

    pub async fn put_empty_object(&self, bucket: &str, key: &str) -> Result<(), CoreError> {
        self.s3()
            .await
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from_static(b""))
            .send()
            .await
            .map_err(|e| {
                map_object_error(e.into_service_error(), &format!("s3://{}/{}", bucket, key))
            })?;
        Ok(())
    }
}

impl Default for Storage {
    fn default() -> Self {
        Self::new()
    }
}

fn map_io_error(err: std::io::Error, resource: &str) -> CoreError {
    match err.kind() {
        std::io::ErrorKind::NotFound => CoreError::NotFound {
            resource: resource.to_string(),
        },
        std::io::ErrorKind::PermissionDenied => CoreError::PermissionDenied {
            operation: format!("read {}", resource),
        },
        _ => CoreError::Io(err),
    }
}

fn map_object_error<E>(err: E, resource: &str) -> CoreError
where
    E: ProvideErrorMetadata + fmt::Display,
{
    match err.code() {
        Some("NoSuchKey") | Some("NoSuchBucket") | Some("NotFound") => CoreError::NotFound {
            resource: resource.to_string(),
        },
        Some("AccessDenied") | Some("Forbidden") => CoreError::PermissionDenied {
            operation: format!("access {}", resource),
        },
        _ => CoreError::Internal {
            message: format!("Object storage error for {}: {}", resource, err),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_local_path() {
        let location = StorageLocation::parse("/var/tmp/jobs/config.json").unwrap();
        assert_eq!(
            location,
            StorageLocation::Local(PathBuf::from("/var/tmp/jobs/config.json"))
        );
        assert!(!location.is_object());
    }

    #[test]
    fn test_parse_object_uri() {
        let location = StorageLocation::parse("s3://my-bucket/configs/daily.json").unwrap();
        assert_eq!(
            location,
            StorageLocation::Object {
                bucket: "my-bucket".to_string(),
                key: "configs/daily.json".to_string(),
            }
        );
        assert!(location.is_object());
        assert_eq!(location.to_string(), "s3://my-bucket/configs/daily.json");
    }

    #[test]
    fn test_parse_rejects_bucket_without_key() {
        assert!(StorageLocation::parse("s3://my-bucket").is_err());
        assert!(StorageLocation::parse("s3://my-bucket/").is_err());
    }

    #[test]
    fn test_parse_rejects_empty_location() {
        assert!(StorageLocation::parse("").is_err());
    }

    #[tokio::test]
    async fn test_read_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.txt");
        std::fs::write(&path, "plain text resume").unwrap();

        let storage = Storage::new();
        let location = StorageLocation::Local(path);
        let text = storage.read_to_string(&location).await.unwrap();
        assert_eq!(text, "plain text resume");
    }

    #[tokio::test]
    async fn test_read_missing_local_file_is_not_found() {
        let storage = Storage::new();
        let location = StorageLocation::Local(PathBuf::from("/nonexistent/resume.txt"));
        let err = storage.read_to_string(&location).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }
}
