use notesync_core::WindowSpec;

pub const MAIN_WINDOW: &str = "main";
pub const SETTINGS_WINDOW: &str = "settings";

/// Window descriptions handed to the UI host.
#[derive(Debug, Clone)]
pub struct WindowCatalog {
    main_url: String,
    settings_url: String,
}

impl WindowCatalog {
    pub fn new(main_url: String, settings_url: String) -> Self {
        Self {
            main_url,
            settings_url,
        }
    }

    pub fn main(&self) -> WindowSpec {
        WindowSpec {
            label: MAIN_WINDOW.to_string(),
            url: self.main_url.clone(),
            width: 1440,
            height: 870,
            resizable: false,
            parent: None,
        }
    }

    pub fn settings(&self) -> WindowSpec {
        WindowSpec {
            label: SETTINGS_WINDOW.to_string(),
            url: self.settings_url.clone(),
            width: 500,
            height: 500,
            resizable: true,
            parent: Some(MAIN_WINDOW.to_string()),
        }
    }
}
