//! Core traits and types for the notesync file-sync bridge.
//!
//! This crate defines what the router and its collaborators share:
//! - `CloudStorage` / `CloudConnector`: remote bucket access
//! - `LocalStore`: local document container parsing
//! - `SettingsStore`: persisted user settings
//! - `UiSink`: outbound messages to the UI host
//! - the `Inbound` / `Outbound` wire protocol and the keyed menu model

mod cloud;
mod error;
mod local;
mod menu;
mod protocol;
mod settings;
mod ui;

pub use cloud::{CloudConnector, CloudStorage, DeleteAck, RemoteEntry, RemoteObject};
pub use error::{ErrorCode, SyncError, REMOTE_NOT_FOUND_STATUS};
pub use local::LocalStore;
pub use menu::{MenuItem, MenuItemId, MenuModel, MenuSection, MenuSnapshot};
pub use protocol::{
    DeleteRequest, Dialog, DialogKind, FileContent, Inbound, LeftBarStatus, MenuClick, Outbound,
    ReadRequest, SearchRequest, SyncRequest, WindowSpec,
};
pub use settings::{
    get_non_empty, CloudCredentials, LeftBarState, SettingsStore, ACCESS_KEY, BUCKET_AREA,
    BUCKET_NAME, DEFAULT_BUCKET_AREA, LEFT_BAR, SECRET_KEY,
};
pub use ui::UiSink;
