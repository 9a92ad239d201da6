use std::path::PathBuf;

use clap::Parser;
use notesync_local::JsonSettings;

use crate::windows::WindowCatalog;

/// Configuration for the notesync bridge.
#[derive(Parser, Debug, Clone)]
#[command(name = "notesync-bridge")]
#[command(about = "File-sync bridge between the notesync UI, its cloud bucket and local notes")]
pub struct Config {
    /// TCP host to bind to
    #[arg(long, default_value = "127.0.0.1", env = "NOTESYNC_HOST")]
    pub host: String,

    /// TCP port to bind to
    #[arg(long, default_value = "7870", env = "NOTESYNC_PORT")]
    pub port: u16,

    /// Settings file (defaults to <config_dir>/notesync/config.json)
    #[arg(long, env = "NOTESYNC_SETTINGS_FILE")]
    pub settings_file: Option<PathBuf>,

    /// Load the main window from the dev server instead of the bundled UI
    #[arg(long, env = "NOTESYNC_DEV")]
    pub dev: bool,

    /// Dev server serving the main window
    #[arg(long, default_value = "http://localhost:3000", env = "NOTESYNC_DEV_SERVER_URL")]
    pub dev_server_url: String,

    /// Directory holding the bundled UI (index.html, settings/settings.html)
    #[arg(long, default_value = "./build", env = "NOTESYNC_UI_DIR")]
    pub ui_dir: PathBuf,

    /// Override the S3 endpoint derived from the bucket area
    #[arg(long, env = "NOTESYNC_CLOUD_ENDPOINT")]
    pub cloud_endpoint: Option<String>,
}

impl Config {
    pub fn settings_path(&self) -> Option<PathBuf> {
        self.settings_file.clone().or_else(JsonSettings::default_path)
    }

    pub fn windows(&self) -> WindowCatalog {
        let ui_dir = std::path::absolute(&self.ui_dir).unwrap_or_else(|_| self.ui_dir.clone());
        let main_url = if self.dev {
            self.dev_server_url.clone()
        } else {
            file_url(&ui_dir.join("index.html"))
        };
        let settings_url = file_url(&ui_dir.join("settings").join("settings.html"));
        WindowCatalog::new(main_url, settings_url)
    }
}

fn file_url(path: &std::path::Path) -> String {
    format!("file://{}", path.display())
}
