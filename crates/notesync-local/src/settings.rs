use std::path::{Path, PathBuf};

use async_trait::async_trait;
use notesync_core::{SettingsStore, SyncError};
use serde_json::{Map, Value};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

/// Settings persisted as a flat JSON object file.
///
/// Every read goes to disk. Writes inside this process are serialized and
/// land atomically through a temp file + rename.
#[derive(Debug)]
pub struct JsonSettings {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonSettings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// `<config_dir>/notesync/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("notesync").join("config.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Map<String, Value>, SyncError> {
        let data = match fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => {
                return Err(SyncError::Settings(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(Map::new());
        }

        match serde_json::from_slice::<Value>(&data) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(SyncError::Settings(format!(
                "{} does not hold a JSON object",
                self.path.display()
            ))),
            Err(e) => Err(SyncError::Settings(format!(
                "Failed to parse {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn store(&self, map: &Map<String, Value>) -> Result<(), SyncError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                SyncError::Settings(format!(
                    "Failed to create settings directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let json = serde_json::to_vec_pretty(map)
            .map_err(|e| SyncError::Settings(format!("Failed to serialize settings: {}", e)))?;

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, &json).await.map_err(|e| {
            SyncError::Settings(format!(
                "Failed to write temp file {}: {}",
                temp_path.display(),
                e
            ))
        })?;

        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            SyncError::Settings(format!(
                "Failed to rename temp file to {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

#[async_trait]
impl SettingsStore for JsonSettings {
    async fn get(&self, key: &str) -> Result<Option<String>, SyncError> {
        let map = self.load().await?;
        Ok(match map.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        })
    }

    #[instrument(skip(self, value), level = "debug")]
    async fn set(&self, key: &str, value: &str) -> Result<(), SyncError> {
        let _guard = self.write_lock.lock().await;
        let mut map = self.load().await?;
        map.insert(key.to_string(), Value::String(value.to_string()));
        self.store(&map).await?;
        debug!("Saved setting {} to {}", key, self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (JsonSettings, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let settings = JsonSettings::new(temp_dir.path().join("nested").join("config.json"));
        (settings, temp_dir)
    }

    #[tokio::test]
    async fn test_missing_file_reads_empty() {
        let (settings, _temp_dir) = setup();
        assert_eq!(settings.get("accessKey").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let (settings, _temp_dir) = setup();
        settings.set("bucketName", "notes").await.unwrap();
        settings.set("leftBar", "close").await.unwrap();

        assert_eq!(settings.get("bucketName").await.unwrap().as_deref(), Some("notes"));
        assert_eq!(settings.get("leftBar").await.unwrap().as_deref(), Some("close"));
        assert!(!settings.path().with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_reads_external_edits_without_restart() {
        let (settings, _temp_dir) = setup();
        settings.set("accessKey", "old").await.unwrap();

        std::fs::write(settings.path(), r#"{"accessKey": "new", "bucketArea": null}"#).unwrap();

        assert_eq!(settings.get("accessKey").await.unwrap().as_deref(), Some("new"));
        assert_eq!(settings.get("bucketArea").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_preserves_unrelated_keys() {
        let (settings, _temp_dir) = setup();
        std::fs::create_dir_all(settings.path().parent().unwrap()).unwrap();
        std::fs::write(settings.path(), r#"{"windowWidth": 1440, "theme": "dark"}"#).unwrap();

        settings.set("leftBar", "open").await.unwrap();

        assert_eq!(settings.get("windowWidth").await.unwrap().as_deref(), Some("1440"));
        assert_eq!(settings.get("theme").await.unwrap().as_deref(), Some("dark"));
    }

    #[tokio::test]
    async fn test_invalid_json_is_settings_error() {
        let (settings, _temp_dir) = setup();
        std::fs::create_dir_all(settings.path().parent().unwrap()).unwrap();
        std::fs::write(settings.path(), "{not json").unwrap();

        let err = settings.get("accessKey").await.unwrap_err();
        assert!(matches!(err, SyncError::Settings(_)));
    }
}
