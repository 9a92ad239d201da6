use std::path::Path;

use async_trait::async_trait;

use crate::error::SyncError;

/// Reads document containers from the local filesystem.
#[async_trait]
pub trait LocalStore: Send + Sync {
    /// Open the container at `path` and return its document content.
    ///
    /// Missing, corrupt and unrecognized containers all fail with
    /// `SyncError::Parse`.
    async fn read_content(&self, path: &Path) -> Result<String, SyncError>;
}
