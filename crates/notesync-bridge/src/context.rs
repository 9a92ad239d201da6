use std::sync::{Arc, Mutex};

use notesync_core::{
    CloudConnector, CloudCredentials, CloudStorage, LocalStore, MenuItemId, MenuModel,
    MenuSnapshot, SettingsStore, SyncError, UiSink,
};

use crate::windows::WindowCatalog;

/// Everything a request handler may touch.
///
/// Built once at startup and shared behind an `Arc`; there is no global
/// state.
pub struct AppContext {
    pub settings: Arc<dyn SettingsStore>,
    pub cloud: Arc<dyn CloudConnector>,
    pub local: Arc<dyn LocalStore>,
    pub ui: Arc<dyn UiSink>,
    pub windows: WindowCatalog,
    menu: Mutex<MenuModel>,
}

impl AppContext {
    pub fn new(
        settings: Arc<dyn SettingsStore>,
        cloud: Arc<dyn CloudConnector>,
        local: Arc<dyn LocalStore>,
        ui: Arc<dyn UiSink>,
        windows: WindowCatalog,
    ) -> Self {
        Self {
            settings,
            cloud,
            local,
            ui,
            windows,
            menu: Mutex::new(MenuModel::new()),
        }
    }

    pub fn menu_snapshot(&self) -> MenuSnapshot {
        self.menu.lock().expect("menu model poisoned").snapshot()
    }

    pub fn menu_is_enabled(&self, id: MenuItemId) -> bool {
        self.menu.lock().expect("menu model poisoned").is_enabled(id)
    }

    /// Apply `change` to the menu and return the resulting snapshot.
    pub fn update_menu(&self, change: impl FnOnce(&mut MenuModel)) -> MenuSnapshot {
        let mut menu = self.menu.lock().expect("menu model poisoned");
        change(&mut menu);
        menu.snapshot()
    }

    /// Bucket client for the credentials persisted right now.
    pub async fn cloud_storage(&self) -> Result<Arc<dyn CloudStorage>, SyncError> {
        let credentials = CloudCredentials::load(self.settings.as_ref()).await?;
        self.cloud.connect(&credentials)
    }
}
