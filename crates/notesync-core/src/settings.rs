use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SyncError;

pub const ACCESS_KEY: &str = "accessKey";
pub const SECRET_KEY: &str = "secretKey";
pub const BUCKET_NAME: &str = "bucketName";
pub const BUCKET_AREA: &str = "bucketArea";
pub const LEFT_BAR: &str = "leftBar";

/// Region code used when `bucketArea` is unset.
pub const DEFAULT_BUCKET_AREA: &str = "z0";

/// Process-wide persisted key/value settings.
///
/// Implementations must not cache: every `get` reflects the latest persisted
/// value so credential edits apply to the next request without a restart.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, SyncError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), SyncError>;
}

/// Returns the value for `key` if it is present and non-empty.
pub async fn get_non_empty(
    store: &dyn SettingsStore,
    key: &str,
) -> Result<Option<String>, SyncError> {
    Ok(store.get(key).await?.filter(|v| !v.is_empty()))
}

/// Credentials for one object-storage bucket.
#[derive(Clone, PartialEq, Eq)]
pub struct CloudCredentials {
    pub access_key: String,
    pub secret_key: String,
    pub bucket_name: String,
    pub bucket_area: String,
}

impl fmt::Debug for CloudCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudCredentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("bucket_name", &self.bucket_name)
            .field("bucket_area", &self.bucket_area)
            .finish()
    }
}

impl CloudCredentials {
    /// Read credentials from the settings store.
    ///
    /// Missing keys are reported as a remote error: the cloud call cannot be
    /// issued, and the caller surfaces it like any other backend failure.
    pub async fn load(store: &dyn SettingsStore) -> Result<Self, SyncError> {
        let access_key = get_non_empty(store, ACCESS_KEY).await?;
        let secret_key = get_non_empty(store, SECRET_KEY).await?;
        let bucket_name = get_non_empty(store, BUCKET_NAME).await?;
        let bucket_area = get_non_empty(store, BUCKET_AREA)
            .await?
            .unwrap_or_else(|| DEFAULT_BUCKET_AREA.to_string());

        match (access_key, secret_key, bucket_name) {
            (Some(access_key), Some(secret_key), Some(bucket_name)) => Ok(Self {
                access_key,
                secret_key,
                bucket_name,
                bucket_area,
            }),
            _ => Err(SyncError::Remote(
                "cloud credentials are incomplete".to_string(),
            )),
        }
    }

    /// True when every key needed to reach the bucket is set.
    pub async fn are_complete(store: &dyn SettingsStore) -> Result<bool, SyncError> {
        for key in [ACCESS_KEY, SECRET_KEY, BUCKET_NAME] {
            if get_non_empty(store, key).await?.is_none() {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Visibility of the left bar panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeftBarState {
    #[default]
    Open,
    Close,
}

impl LeftBarState {
    pub fn as_str(self) -> &'static str {
        match self {
            LeftBarState::Open => "open",
            LeftBarState::Close => "close",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            LeftBarState::Open => LeftBarState::Close,
            LeftBarState::Close => LeftBarState::Open,
        }
    }

    /// Read the persisted flag.
    ///
    /// Absent means open. Anything other than `"open"` counts as closed, so
    /// a garbled value toggles back to open.
    pub async fn load(store: &dyn SettingsStore) -> Result<Self, SyncError> {
        Ok(match store.get(LEFT_BAR).await?.as_deref() {
            None | Some("open") => LeftBarState::Open,
            Some(_) => LeftBarState::Close,
        })
    }

    pub async fn save(self, store: &dyn SettingsStore) -> Result<(), SyncError> {
        store.set(LEFT_BAR, self.as_str()).await
    }
}

impl fmt::Display for LeftBarState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
