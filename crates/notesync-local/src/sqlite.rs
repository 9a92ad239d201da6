use std::path::{Path, PathBuf};

use async_trait::async_trait;
use notesync_core::{LocalStore, SyncError};
use rusqlite::{Connection, OpenFlags, OptionalExtension};
use tracing::{debug, instrument};

const LATEST_REVISION: &str = "SELECT body FROM revisions ORDER BY id DESC LIMIT 1";

/// Reads note containers: SQLite files with a `revisions` table.
///
/// Layout:
/// ```text
/// revisions(id INTEGER PRIMARY KEY, body TEXT NOT NULL, saved_at INTEGER NOT NULL)
/// ```
/// The document content is the body of the newest revision.
#[derive(Debug, Clone, Default)]
pub struct SqliteStore;

impl SqliteStore {
    pub fn new() -> Self {
        Self
    }
}

/// Open read-only so a missing file is reported instead of created.
fn open_container(path: &Path) -> Result<Connection, SyncError> {
    if !path.is_file() {
        return Err(SyncError::Parse(format!(
            "container not found: {}",
            path.display()
        )));
    }
    Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(|e| SyncError::Parse(format!("failed to open {}: {}", path.display(), e)))
}

fn read_latest_revision(path: &Path) -> Result<String, SyncError> {
    let conn = open_container(path)?;
    let body: Option<String> = conn
        .query_row(LATEST_REVISION, [], |row| row.get(0))
        .optional()
        .map_err(|e| SyncError::Parse(format!("failed to read {}: {}", path.display(), e)))?;

    body.ok_or_else(|| SyncError::Parse(format!("{} holds no revisions", path.display())))
}

#[async_trait]
impl LocalStore for SqliteStore {
    #[instrument(skip(self), level = "debug")]
    async fn read_content(&self, path: &Path) -> Result<String, SyncError> {
        let owned: PathBuf = path.to_path_buf();
        let content = tokio::task::spawn_blocking(move || read_latest_revision(&owned))
            .await
            .map_err(|e| SyncError::Parse(format!("container reader failed: {}", e)))??;

        debug!(
            "Read {} bytes of content from {}",
            content.len(),
            path.display()
        );
        Ok(content)
    }
}
