use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_s3::config::retry::RetryConfig;
use aws_sdk_s3::config::{BehaviorVersion, Credentials};
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use notesync_core::{
    CloudConnector, CloudCredentials, CloudStorage, DeleteAck, RemoteEntry, RemoteObject,
    SyncError,
};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument};

use crate::region::{endpoint_for_region, region_for_area};

/// Bucket client over the S3-compatible API.
///
/// The SDK retry layer is disabled: every call is issued exactly once.
#[derive(Clone)]
pub struct S3Storage {
    s3_client: S3Client,
    bucket_name: String,
}

impl S3Storage {
    pub fn new(s3_client: S3Client, bucket_name: String) -> Self {
        Self {
            s3_client,
            bucket_name,
        }
    }

    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    /// Check if an S3 error is a 404.
    fn is_not_found(err: &SdkError<impl std::fmt::Debug>) -> bool {
        match err {
            SdkError::ServiceError(e) => e.raw().status().as_u16() == 404,
            SdkError::ResponseError(e) => e.raw().status().as_u16() == 404,
            _ => false,
        }
    }

    fn remote_error(
        operation: &str,
        err: SdkError<impl std::error::Error + 'static>,
    ) -> SyncError {
        SyncError::Remote(format!("{} error: {}", operation, DisplayErrorContext(err)))
    }
}

/// Strip the quotes S3 puts around entity tags.
fn trim_etag(etag: &str) -> String {
    etag.trim_matches('"').to_string()
}

fn to_chrono(dt: &aws_sdk_s3::primitives::DateTime) -> Option<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::from_timestamp(dt.secs(), dt.subsec_nanos())
}

/// `<name>.part` next to `destination`.
fn partial_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(".part");
    destination.with_file_name(name)
}

/// Write the whole body to `path`, flushed and synced.
async fn write_body(mut body: ByteStream, path: &Path) -> Result<u64, SyncError> {
    let mut file = fs::File::create(path).await.map_err(|e| {
        SyncError::Remote(format!("Failed to create {}: {}", path.display(), e))
    })?;

    let mut written = 0u64;
    while let Some(chunk) = body.next().await {
        let chunk =
            chunk.map_err(|e| SyncError::Remote(format!("Failed to read object body: {}", e)))?;
        file.write_all(&chunk).await.map_err(|e| {
            SyncError::Remote(format!("Failed to write {}: {}", path.display(), e))
        })?;
        written += chunk.len() as u64;
    }

    file.flush().await.map_err(|e| {
        SyncError::Remote(format!("Failed to flush {}: {}", path.display(), e))
    })?;
    file.sync_all().await.map_err(|e| {
        SyncError::Remote(format!("Failed to sync {}: {}", path.display(), e))
    })?;
    Ok(written)
}

#[async_trait]
impl CloudStorage for S3Storage {
    fn backend_name(&self) -> &'static str {
        "s3"
    }

    #[instrument(skip(self), level = "debug")]
    async fn stat(&self, key: &str) -> Result<RemoteObject, SyncError> {
        let result = self
            .s3_client
            .head_object()
            .bucket(&self.bucket_name)
            .key(key)
            .send()
            .await;

        match result {
            Ok(output) => {
                let object = RemoteEntry {
                    key: key.to_string(),
                    hash: output.e_tag().map(trim_etag),
                    fsize: output.content_length().unwrap_or(0).max(0) as u64,
                    mime_type: output.content_type().map(str::to_string),
                    put_time: output.last_modified().and_then(to_chrono),
                };
                debug!("Stat {} ({} bytes)", key, object.fsize);
                Ok(object)
            }
            Err(e) if Self::is_not_found(&e) => Err(SyncError::RemoteNotFound {
                key: key.to_string(),
            }),
            Err(e) => Err(Self::remote_error("head_object", e)),
        }
    }

    #[instrument(skip(self), level = "debug")]
    async fn download(&self, key: &str, destination: &Path) -> Result<u64, SyncError> {
        let output = self
            .s3_client
            .get_object()
            .bucket(&self.bucket_name)
            .key(key)
            .send()
            .await
            .map_err(|e| Self::remote_error("get_object", e))?;

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                SyncError::Remote(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        // Stream into a sibling file so a broken transfer never clobbers the
        // existing local copy.
        let partial = partial_path(destination);
        let written = match write_body(output.body, &partial).await {
            Ok(written) => written,
            Err(err) => {
                let _ = fs::remove_file(&partial).await;
                return Err(err);
            }
        };

        fs::rename(&partial, destination).await.map_err(|e| {
            SyncError::Remote(format!(
                "Failed to move download into {}: {}",
                destination.display(),
                e
            ))
        })?;

        debug!(
            "Downloaded {} ({} bytes) to {}",
            key,
            written,
            destination.display()
        );
        Ok(written)
    }

    #[instrument(skip(self), level = "debug")]
    async fn delete(&self, key: &str) -> Result<DeleteAck, SyncError> {
        let output = self
            .s3_client
            .delete_object()
            .bucket(&self.bucket_name)
            .key(key)
            .send()
            .await
            .map_err(|e| Self::remote_error("delete_object", e))?;

        debug!("Deleted {} from bucket {}", key, self.bucket_name);
        Ok(DeleteAck {
            key: key.to_string(),
            version_id: output.version_id().map(str::to_string),
        })
    }

    #[instrument(skip(self), level = "debug")]
    async fn search(&self, keyword: &str) -> Result<Vec<RemoteEntry>, SyncError> {
        let mut entries = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut request = self
                .s3_client
                .list_objects_v2()
                .bucket(&self.bucket_name)
                .prefix(keyword);

            if let Some(token) = continuation_token.take() {
                request = request.continuation_token(token);
            }

            let output = request
                .send()
                .await
                .map_err(|e| Self::remote_error("list_objects_v2", e))?;

            for obj in output.contents() {
                if let Some(key) = obj.key() {
                    entries.push(RemoteEntry {
                        key: key.to_string(),
                        hash: obj.e_tag().map(trim_etag),
                        fsize: obj.size().unwrap_or(0).max(0) as u64,
                        mime_type: None,
                        put_time: obj.last_modified().and_then(to_chrono),
                    });
                }
            }

            match output.next_continuation_token() {
                Some(token) if output.is_truncated().unwrap_or(false) => {
                    continuation_token = Some(token.to_string());
                }
                _ => break,
            }
        }

        debug!("Search {:?} matched {} objects", keyword, entries.len());
        Ok(entries)
    }
}

/// Builds an [`S3Storage`] per request from the credentials in effect.
#[derive(Debug, Clone, Default)]
pub struct S3Connector {
    endpoint_override: Option<String>,
}

impl S3Connector {
    pub fn new(endpoint_override: Option<String>) -> Self {
        Self { endpoint_override }
    }

    pub fn client_for(&self, credentials: &CloudCredentials) -> S3Client {
        let region = region_for_area(&credentials.bucket_area).to_string();
        let endpoint = self
            .endpoint_override
            .clone()
            .unwrap_or_else(|| endpoint_for_region(&region));

        let provider = Credentials::new(
            &credentials.access_key,
            &credentials.secret_key,
            None,
            None,
            "notesync-settings",
        );

        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .credentials_provider(provider)
            .region(Region::new(region))
            .endpoint_url(endpoint)
            .force_path_style(true)
            .retry_config(RetryConfig::disabled())
            .build();

        S3Client::from_conf(s3_config)
    }
}

impl CloudConnector for S3Connector {
    fn connect(
        &self,
        credentials: &CloudCredentials,
    ) -> Result<Arc<dyn CloudStorage>, SyncError> {
        Ok(Arc::new(S3Storage::new(
            self.client_for(credentials),
            credentials.bucket_name.clone(),
        )))
    }
}
