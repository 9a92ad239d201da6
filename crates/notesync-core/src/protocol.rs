//! Named messages exchanged between the UI host and the router.
//!
//! Both directions use the envelope `{"channel": "<name>", "payload": ...}`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::cloud::RemoteEntry;
use crate::error::ErrorCode;
use crate::menu::{MenuItemId, MenuSnapshot};
use crate::settings::LeftBarState;

/// One file to fetch from the bucket and parse locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncRequest {
    #[serde(rename = "id")]
    pub request_id: String,
    #[serde(rename = "key")]
    pub cloud_key: String,
    #[serde(rename = "path")]
    pub local_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadRequest {
    #[serde(rename = "id")]
    pub request_id: String,
    #[serde(rename = "path")]
    pub local_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteRequest {
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub keywords: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuClick {
    pub id: MenuItemId,
}

/// Requests sent by the UI host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "channel", content = "payload", rename_all = "kebab-case")]
pub enum Inbound {
    DownloadFile(SyncRequest),
    ReadFile(ReadRequest),
    DeleteFile(DeleteRequest),
    SearchFiles(SearchRequest),
    ConfigIsSaved,
    LeftBarStatus,
    OpenSettingsWindow,
    MenuClicked(MenuClick),
    AppReady,
}

impl Inbound {
    pub fn channel(&self) -> &'static str {
        match self {
            Inbound::DownloadFile(_) => "download-file",
            Inbound::ReadFile(_) => "read-file",
            Inbound::DeleteFile(_) => "delete-file",
            Inbound::SearchFiles(_) => "search-files",
            Inbound::ConfigIsSaved => "config-is-saved",
            Inbound::LeftBarStatus => "left-bar-status",
            Inbound::OpenSettingsWindow => "open-settings-window",
            Inbound::MenuClicked(_) => "menu-clicked",
            Inbound::AppReady => "app-ready",
        }
    }
}

/// Successful read or download, correlated by the request id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContent {
    pub id: String,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeftBarStatus {
    pub status: LeftBarState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogKind {
    Info,
    Error,
}

/// A modal dialog for the UI host to show.
///
/// Error dialogs raised while serving a correlated request carry the
/// request id and an [`ErrorCode`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dialog {
    pub kind: DialogKind,
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl Dialog {
    pub fn info(title: &str, message: &str) -> Self {
        Self {
            kind: DialogKind::Info,
            title: title.to_string(),
            message: message.to_string(),
            code: None,
            request_id: None,
        }
    }

    pub fn error(title: &str, message: &str, code: ErrorCode) -> Self {
        Self {
            kind: DialogKind::Error,
            title: title.to_string(),
            message: message.to_string(),
            code: Some(code),
            request_id: None,
        }
    }

    pub fn for_request(mut self, request_id: &str) -> Self {
        self.request_id = Some(request_id.to_string());
        self
    }
}

/// Description of a window the UI host should open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSpec {
    pub label: String,
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

/// Messages sent to the UI host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "channel", content = "payload", rename_all = "kebab-case")]
pub enum Outbound {
    ReadFile(FileContent),
    SearchedFiles(Vec<RemoteEntry>),
    SetLeftBarStatus(LeftBarStatus),
    LoadingStatus(bool),
    ShowDialog(Dialog),
    MenuUpdated(MenuSnapshot),
    OpenWindow(WindowSpec),
    MenuAction(MenuClick),
}

impl Outbound {
    pub fn channel(&self) -> &'static str {
        match self {
            Outbound::ReadFile(_) => "read-file",
            Outbound::SearchedFiles(_) => "searched-files",
            Outbound::SetLeftBarStatus(_) => "set-left-bar-status",
            Outbound::LoadingStatus(_) => "loading-status",
            Outbound::ShowDialog(_) => "show-dialog",
            Outbound::MenuUpdated(_) => "menu-updated",
            Outbound::OpenWindow(_) => "open-window",
            Outbound::MenuAction(_) => "menu-action",
        }
    }
}
