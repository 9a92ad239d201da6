//! Dispatch of inbound UI requests.
//!
//! Each request runs on its own task with no shared per-request state.
//! Failures never escape a handler: they become a `show-dialog` message and
//! the success reply is withheld.

use std::path::Path;
use std::sync::Arc;

use notesync_core::{
    CloudCredentials, DeleteRequest, Dialog, FileContent, Inbound, LeftBarState, LeftBarStatus,
    MenuClick, MenuItemId, Outbound, ReadRequest, SearchRequest, SyncError, SyncRequest, UiSink,
};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use crate::context::AppContext;
use crate::dialogs;

/// Emits `loading-status(true)` on creation and `loading-status(false)` when
/// dropped, so every exit path closes the bracket.
struct LoadingGuard {
    ui: Arc<dyn UiSink>,
}

impl LoadingGuard {
    fn start(ui: &Arc<dyn UiSink>) -> Self {
        ui.set_loading(true);
        Self { ui: Arc::clone(ui) }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.ui.set_loading(false);
    }
}

#[derive(Clone)]
pub struct RequestRouter {
    ctx: Arc<AppContext>,
}

impl RequestRouter {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    /// Run `inbound` on its own task.
    pub fn spawn(&self, inbound: Inbound) -> JoinHandle<()> {
        let router = self.clone();
        tokio::spawn(async move { router.dispatch(inbound).await })
    }

    #[instrument(skip(self, inbound), fields(channel = inbound.channel()))]
    pub async fn dispatch(&self, inbound: Inbound) {
        debug!("Dispatching request");
        match inbound {
            Inbound::DownloadFile(request) => self.download_file(request).await,
            Inbound::ReadFile(request) => self.read_file(request).await,
            Inbound::DeleteFile(request) => self.delete_file(request).await,
            Inbound::SearchFiles(request) => self.search_files(request).await,
            Inbound::ConfigIsSaved => self.config_is_saved().await,
            Inbound::LeftBarStatus => self.toggle_left_bar().await,
            Inbound::OpenSettingsWindow => self.open_settings_window(),
            Inbound::MenuClicked(click) => self.menu_clicked(click).await,
            Inbound::AppReady => self.app_ready().await,
        }
    }

    async fn download_file(&self, request: SyncRequest) {
        let _loading = LoadingGuard::start(&self.ctx.ui);

        if let Err(err) = self.fetch(&request).await {
            warn!(
                "Download of {} for request {} failed: {}",
                request.cloud_key, request.request_id, err
            );
            self.show(dialogs::remote_file_failed(&err).for_request(&request.request_id));
            return;
        }

        self.reply_with_content(&request.request_id, &request.local_path)
            .await;
    }

    /// Stat then download. Returns only once the object is on disk.
    async fn fetch(&self, request: &SyncRequest) -> Result<u64, SyncError> {
        let storage = self.ctx.cloud_storage().await?;
        let object = storage.stat(&request.cloud_key).await?;
        debug!(
            "{} object {} is {} bytes",
            storage.backend_name(),
            object.key,
            object.fsize
        );
        let written = storage
            .download(&request.cloud_key, &request.local_path)
            .await?;
        info!(
            "Downloaded {} ({} bytes) to {}",
            request.cloud_key,
            written,
            request.local_path.display()
        );
        Ok(written)
    }

    async fn read_file(&self, request: ReadRequest) {
        let _loading = LoadingGuard::start(&self.ctx.ui);
        self.reply_with_content(&request.request_id, &request.local_path)
            .await;
    }

    async fn reply_with_content(&self, request_id: &str, path: &Path) {
        match self.ctx.local.read_content(path).await {
            Ok(content) => self.ctx.ui.send(Outbound::ReadFile(FileContent {
                id: request_id.to_string(),
                content,
            })),
            Err(err) => {
                warn!("Failed to parse {}: {}", path.display(), err);
                self.show(dialogs::parse_failed().for_request(request_id));
            }
        }
    }

    async fn delete_file(&self, request: DeleteRequest) {
        let _loading = LoadingGuard::start(&self.ctx.ui);

        let result = match self.ctx.cloud_storage().await {
            Ok(storage) => storage.delete(&request.key).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(ack) => {
                info!(key = %ack.key, version_id = ?ack.version_id, "Deleted remote object");
                self.show(dialogs::delete_succeeded());
            }
            Err(err) => {
                warn!("Delete of {} failed: {}", request.key, err);
                self.show(dialogs::delete_failed(&err));
            }
        }
    }

    async fn search_files(&self, request: SearchRequest) {
        let _loading = LoadingGuard::start(&self.ctx.ui);

        let result = match self.ctx.cloud_storage().await {
            Ok(storage) => storage.search(&request.keywords).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(items) if items.is_empty() => {
                debug!("No objects match {:?}", request.keywords);
                self.show(dialogs::search_empty());
            }
            Ok(items) => {
                debug!("{} objects match {:?}", items.len(), request.keywords);
                self.ctx.ui.send(Outbound::SearchedFiles(items));
            }
            Err(err) => {
                warn!("Search for {:?} failed: {}", request.keywords, err);
                self.show(dialogs::search_failed(&err));
            }
        }
    }

    async fn config_is_saved(&self) {
        let complete = self.credentials_complete().await;
        let snapshot = self
            .ctx
            .update_menu(|menu| menu.set_cloud_sync_enabled(complete));
        info!("Cloud sync menu {}", if complete { "enabled" } else { "disabled" });
        self.ctx.ui.send(Outbound::MenuUpdated(snapshot));
    }

    async fn credentials_complete(&self) -> bool {
        match CloudCredentials::are_complete(self.ctx.settings.as_ref()).await {
            Ok(complete) => complete,
            Err(err) => {
                warn!("Could not read cloud credentials: {}", err);
                false
            }
        }
    }

    async fn toggle_left_bar(&self) {
        let settings = self.ctx.settings.as_ref();
        let next = match LeftBarState::load(settings).await {
            Ok(current) => current.toggled(),
            Err(err) => {
                error!("Could not read left bar state: {}", err);
                return;
            }
        };
        if let Err(err) = next.save(settings).await {
            error!("Could not persist left bar state: {}", err);
            return;
        }

        let snapshot = self.ctx.update_menu(|menu| menu.apply_left_bar(next));
        self.ctx
            .ui
            .send(Outbound::SetLeftBarStatus(LeftBarStatus { status: next }));
        self.ctx.ui.send(Outbound::MenuUpdated(snapshot));
        info!("leftBar {}", next);
    }

    fn open_settings_window(&self) {
        self.ctx
            .ui
            .send(Outbound::OpenWindow(self.ctx.windows.settings()));
    }

    async fn menu_clicked(&self, click: MenuClick) {
        if !self.ctx.menu_is_enabled(click.id) {
            debug!("Ignoring click on disabled menu item {:?}", click.id);
            return;
        }
        match click.id {
            MenuItemId::CloudSettings => self.open_settings_window(),
            MenuItemId::ToggleLeftBar => self.toggle_left_bar().await,
            MenuItemId::AutoSync | MenuItemId::UploadAll | MenuItemId::DownloadAll => {
                self.ctx.ui.send(Outbound::MenuAction(click));
            }
        }
    }

    async fn app_ready(&self) {
        self.ctx.ui.send(Outbound::OpenWindow(self.ctx.windows.main()));

        let complete = self.credentials_complete().await;
        let left_bar = LeftBarState::load(self.ctx.settings.as_ref())
            .await
            .unwrap_or_else(|err| {
                warn!("Could not read left bar state, assuming open: {}", err);
                LeftBarState::default()
            });

        let snapshot = self.ctx.update_menu(|menu| {
            menu.set_cloud_sync_enabled(complete);
            menu.apply_left_bar(left_bar);
        });
        self.ctx.ui.send(Outbound::MenuUpdated(snapshot));
        self.ctx
            .ui
            .send(Outbound::SetLeftBarStatus(LeftBarStatus { status: left_bar }));
    }

    fn show(&self, dialog: Dialog) {
        self.ctx.ui.send(Outbound::ShowDialog(dialog));
    }
}
