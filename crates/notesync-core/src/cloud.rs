use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SyncError;
use crate::settings::CloudCredentials;

/// Metadata for a single object in the bucket.
///
/// Serialized with the field names the UI already knows from the bucket
/// listing API (`fsize`, `putTime`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteEntry {
    pub key: String,
    /// Entity tag with surrounding quotes stripped
    #[serde(default)]
    pub hash: Option<String>,
    /// Size in bytes
    pub fsize: u64,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub put_time: Option<DateTime<Utc>>,
}

/// Result of a `stat` call. Same shape as a listing entry.
pub type RemoteObject = RemoteEntry;

/// Acknowledgment returned by a successful delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    pub key: String,
    #[serde(default)]
    pub version_id: Option<String>,
}

/// Operations against one remote bucket.
///
/// No implementation retries or caches. A call that has been issued runs to
/// completion or failure.
#[async_trait]
pub trait CloudStorage: Send + Sync {
    /// Backend name for logging.
    fn backend_name(&self) -> &'static str;

    /// Fetch metadata. Missing objects fail with `SyncError::RemoteNotFound`.
    async fn stat(&self, key: &str) -> Result<RemoteObject, SyncError>;

    /// Stream the object to `destination`, returning the number of bytes
    /// written. Returns only after the file is flushed and synced to disk.
    async fn download(&self, key: &str, destination: &Path) -> Result<u64, SyncError>;

    async fn delete(&self, key: &str) -> Result<DeleteAck, SyncError>;

    /// List objects whose key starts with `keyword`, in key order.
    /// An empty list is a successful outcome.
    async fn search(&self, keyword: &str) -> Result<Vec<RemoteEntry>, SyncError>;
}

/// Builds a bucket client for a freshly loaded set of credentials.
pub trait CloudConnector: Send + Sync {
    fn connect(&self, credentials: &CloudCredentials) -> Result<Arc<dyn CloudStorage>, SyncError>;
}
