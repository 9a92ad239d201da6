//! Request router and HTTP/SSE bridge between the notesync UI host and its
//! storage backends.

pub mod config;
pub mod context;
pub mod dialogs;
pub mod error;
pub mod handlers;
pub mod router;
pub mod ui;
pub mod windows;

pub use config::Config;
pub use context::AppContext;
pub use handlers::{app, AppState};
pub use router::RequestRouter;
pub use ui::BroadcastUi;
pub use windows::WindowCatalog;
