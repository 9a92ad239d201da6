//! In-memory collaborators for driving the router without a network.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use notesync_bridge::{AppContext, RequestRouter, WindowCatalog};
use notesync_core::{
    CloudConnector, CloudCredentials, CloudStorage, DeleteAck, Dialog, LocalStore, Outbound,
    RemoteEntry, RemoteObject, SettingsStore, SyncError, UiSink, ACCESS_KEY, BUCKET_NAME,
    SECRET_KEY,
};

pub const MAIN_URL: &str = "http://localhost:3000";
pub const SETTINGS_URL: &str = "file:///opt/notesync/settings/settings.html";

#[derive(Default)]
pub struct MemorySettings {
    values: Mutex<HashMap<String, String>>,
    fail_writes: bool,
}

impl MemorySettings {
    pub fn with_credentials() -> Self {
        let settings = Self::default();
        settings.put(ACCESS_KEY, "ak");
        settings.put(SECRET_KEY, "sk");
        settings.put(BUCKET_NAME, "notes-bucket");
        settings
    }

    pub fn read_only(self) -> Self {
        Self {
            fail_writes: true,
            ..self
        }
    }

    pub fn put(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl SettingsStore for MemorySettings {
    async fn get(&self, key: &str) -> Result<Option<String>, SyncError> {
        Ok(self.value(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), SyncError> {
        if self.fail_writes {
            return Err(SyncError::Settings("settings file is read-only".to_string()));
        }
        self.put(key, value);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingUi {
    messages: Mutex<Vec<Outbound>>,
}

impl RecordingUi {
    pub fn messages(&self) -> Vec<Outbound> {
        self.messages.lock().unwrap().clone()
    }

    pub fn dialogs(&self) -> Vec<Dialog> {
        self.messages()
            .into_iter()
            .filter_map(|m| match m {
                Outbound::ShowDialog(dialog) => Some(dialog),
                _ => None,
            })
            .collect()
    }

    /// Messages other than loading notifications.
    pub fn without_loading(&self) -> Vec<Outbound> {
        self.messages()
            .into_iter()
            .filter(|m| !matches!(m, Outbound::LoadingStatus(_)))
            .collect()
    }
}

impl UiSink for RecordingUi {
    fn send(&self, message: Outbound) {
        self.messages.lock().unwrap().push(message);
    }
}

/// Bucket double. Objects are held in memory and written to disk on download.
#[derive(Default)]
pub struct FakeCloud {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    delays: Mutex<HashMap<String, Duration>>,
    failing_downloads: Mutex<HashSet<String>>,
    fail_all: Mutex<bool>,
    calls: Mutex<Vec<String>>,
}

impl FakeCloud {
    pub fn put_object(&self, key: &str, body: impl Into<Vec<u8>>) {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), body.into());
    }

    pub fn delay_download(&self, key: &str, delay: Duration) {
        self.delays.lock().unwrap().insert(key.to_string(), delay);
    }

    pub fn fail_download(&self, key: &str) {
        self.failing_downloads
            .lock()
            .unwrap()
            .insert(key.to_string());
    }

    /// Every call fails as if the bucket were unreachable.
    pub fn go_offline(&self) {
        *self.fail_all.lock().unwrap() = true;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<(), SyncError> {
        self.calls.lock().unwrap().push(call);
        if *self.fail_all.lock().unwrap() {
            return Err(SyncError::Remote("connection refused".to_string()));
        }
        Ok(())
    }

    fn entry(key: &str, body: &[u8]) -> RemoteEntry {
        RemoteEntry {
            key: key.to_string(),
            hash: None,
            fsize: body.len() as u64,
            mime_type: None,
            put_time: None,
        }
    }
}

#[async_trait]
impl CloudStorage for FakeCloud {
    fn backend_name(&self) -> &'static str {
        "fake"
    }

    async fn stat(&self, key: &str) -> Result<RemoteObject, SyncError> {
        self.record(format!("stat {key}"))?;
        let objects = self.objects.lock().unwrap();
        match objects.get(key) {
            Some(body) => Ok(Self::entry(key, body)),
            None => Err(SyncError::RemoteNotFound {
                key: key.to_string(),
            }),
        }
    }

    async fn download(&self, key: &str, destination: &Path) -> Result<u64, SyncError> {
        self.record(format!("download {key}"))?;
        let delay = self.delays.lock().unwrap().get(key).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing_downloads.lock().unwrap().contains(key) {
            return Err(SyncError::Remote("transfer interrupted".to_string()));
        }
        let body = self
            .objects
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| SyncError::Remote(format!("{key} vanished")))?;
        tokio::fs::write(destination, &body).await?;
        Ok(body.len() as u64)
    }

    async fn delete(&self, key: &str) -> Result<DeleteAck, SyncError> {
        self.record(format!("delete {key}"))?;
        match self.objects.lock().unwrap().remove(key) {
            Some(_) => Ok(DeleteAck {
                key: key.to_string(),
                version_id: None,
            }),
            None => Err(SyncError::Remote(format!("no such key: {key}"))),
        }
    }

    async fn search(&self, keyword: &str) -> Result<Vec<RemoteEntry>, SyncError> {
        self.record(format!("search {keyword}"))?;
        let objects = self.objects.lock().unwrap();
        let mut entries: Vec<RemoteEntry> = objects
            .iter()
            .filter(|(key, _)| key.starts_with(keyword))
            .map(|(key, body)| Self::entry(key, body))
            .collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(entries)
    }
}

/// Hands out the shared [`FakeCloud`] and remembers which bucket was asked for.
pub struct FakeConnector {
    pub cloud: Arc<FakeCloud>,
    buckets: Mutex<Vec<String>>,
}

impl FakeConnector {
    pub fn new(cloud: Arc<FakeCloud>) -> Self {
        Self {
            cloud,
            buckets: Mutex::new(Vec::new()),
        }
    }

    pub fn buckets(&self) -> Vec<String> {
        self.buckets.lock().unwrap().clone()
    }
}

impl CloudConnector for FakeConnector {
    fn connect(&self, credentials: &CloudCredentials) -> Result<Arc<dyn CloudStorage>, SyncError> {
        self.buckets
            .lock()
            .unwrap()
            .push(credentials.bucket_name.clone());
        Ok(self.cloud.clone())
    }
}

/// Treats any UTF-8 file as a container whose content is the file text.
pub struct TextStore;

#[async_trait]
impl LocalStore for TextStore {
    async fn read_content(&self, path: &Path) -> Result<String, SyncError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| SyncError::Parse(format!("{}: {}", path.display(), e)))?;
        String::from_utf8(bytes).map_err(|e| SyncError::Parse(e.to_string()))
    }
}

pub struct Harness {
    pub router: RequestRouter,
    pub ui: Arc<RecordingUi>,
    pub settings: Arc<MemorySettings>,
    pub cloud: Arc<FakeCloud>,
    pub connector: Arc<FakeConnector>,
}

impl Harness {
    pub fn new(settings: MemorySettings) -> Self {
        let ui = Arc::new(RecordingUi::default());
        let settings = Arc::new(settings);
        let cloud = Arc::new(FakeCloud::default());
        let connector = Arc::new(FakeConnector::new(cloud.clone()));
        let ctx = AppContext::new(
            settings.clone(),
            connector.clone(),
            Arc::new(TextStore),
            ui.clone(),
            WindowCatalog::new(MAIN_URL.to_string(), SETTINGS_URL.to_string()),
        );
        Self {
            router: RequestRouter::new(Arc::new(ctx)),
            ui,
            settings,
            cloud,
            connector,
        }
    }

    pub fn with_credentials() -> Self {
        Self::new(MemorySettings::with_credentials())
    }
}

/// True when loading notifications open and close in matched pairs.
pub fn loading_is_balanced(messages: &[Outbound]) -> bool {
    let mut depth: i32 = 0;
    for message in messages {
        if let Outbound::LoadingStatus(loading) = message {
            depth += if *loading { 1 } else { -1 };
            if depth < 0 {
                return false;
            }
        }
    }
    depth == 0
}
