//! Application menu model.
//!
//! Entries are addressed by [`MenuItemId`]; the UI host renders the snapshot
//! however its platform requires.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::settings::LeftBarState;

const CLOUD_SECTION: &str = "云同步";
const VIEW_SECTION: &str = "视图";

const HIDE_LEFT_BAR: &str = "隐藏侧边栏";
const SHOW_LEFT_BAR: &str = "开启侧边栏";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MenuItemId {
    CloudSettings,
    AutoSync,
    UploadAll,
    DownloadAll,
    ToggleLeftBar,
}

impl MenuItemId {
    pub const ALL: [MenuItemId; 5] = [
        MenuItemId::CloudSettings,
        MenuItemId::AutoSync,
        MenuItemId::UploadAll,
        MenuItemId::DownloadAll,
        MenuItemId::ToggleLeftBar,
    ];

    /// Items that need complete cloud credentials.
    pub const CLOUD_SYNC: [MenuItemId; 3] = [
        MenuItemId::AutoSync,
        MenuItemId::UploadAll,
        MenuItemId::DownloadAll,
    ];

    pub fn section(self) -> &'static str {
        match self {
            MenuItemId::ToggleLeftBar => VIEW_SECTION,
            _ => CLOUD_SECTION,
        }
    }

    fn default_label(self) -> &'static str {
        match self {
            MenuItemId::CloudSettings => "设置",
            MenuItemId::AutoSync => "自动同步",
            MenuItemId::UploadAll => "全部同步至云端",
            MenuItemId::DownloadAll => "从云端下载到本地",
            MenuItemId::ToggleLeftBar => HIDE_LEFT_BAR,
        }
    }

    pub fn requires_credentials(self) -> bool {
        Self::CLOUD_SYNC.contains(&self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub label: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuSection {
    pub title: String,
    pub items: Vec<MenuItem>,
}

/// Serializable view of the whole menu, sent to the UI on every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuSnapshot {
    pub sections: Vec<MenuSection>,
}

impl MenuSnapshot {
    pub fn item(&self, id: MenuItemId) -> Option<&MenuItem> {
        self.sections
            .iter()
            .flat_map(|s| s.items.iter())
            .find(|item| item.id == id)
    }
}

#[derive(Debug, Clone)]
pub struct MenuModel {
    items: BTreeMap<MenuItemId, MenuItem>,
}

impl Default for MenuModel {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuModel {
    /// Fresh menu: cloud sync entries disabled until credentials are checked.
    pub fn new() -> Self {
        let items = MenuItemId::ALL
            .into_iter()
            .map(|id| {
                let item = MenuItem {
                    id,
                    label: id.default_label().to_string(),
                    enabled: !id.requires_credentials(),
                };
                (id, item)
            })
            .collect();
        Self { items }
    }

    pub fn is_enabled(&self, id: MenuItemId) -> bool {
        self.items.get(&id).map(|i| i.enabled).unwrap_or(false)
    }

    pub fn label(&self, id: MenuItemId) -> &str {
        self.items
            .get(&id)
            .map(|i| i.label.as_str())
            .unwrap_or_default()
    }

    pub fn set_enabled(&mut self, id: MenuItemId, enabled: bool) {
        if let Some(item) = self.items.get_mut(&id) {
            item.enabled = enabled;
        }
    }

    pub fn set_cloud_sync_enabled(&mut self, enabled: bool) {
        for id in MenuItemId::CLOUD_SYNC {
            self.set_enabled(id, enabled);
        }
    }

    /// Label the toggle with the action it will perform next.
    pub fn apply_left_bar(&mut self, state: LeftBarState) {
        let label = match state {
            LeftBarState::Open => HIDE_LEFT_BAR,
            LeftBarState::Close => SHOW_LEFT_BAR,
        };
        if let Some(item) = self.items.get_mut(&MenuItemId::ToggleLeftBar) {
            item.label = label.to_string();
        }
    }

    pub fn snapshot(&self) -> MenuSnapshot {
        let mut sections: Vec<MenuSection> = Vec::new();
        for item in self.items.values() {
            let title = item.id.section();
            match sections.iter_mut().find(|s| s.title == title) {
                Some(section) => section.items.push(item.clone()),
                None => sections.push(MenuSection {
                    title: title.to_string(),
                    items: vec![item.clone()],
                }),
            }
        }
        MenuSnapshot { sections }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_menu_disables_cloud_sync() {
        let menu = MenuModel::new();
        assert!(menu.is_enabled(MenuItemId::CloudSettings));
        assert!(menu.is_enabled(MenuItemId::ToggleLeftBar));
        for id in MenuItemId::CLOUD_SYNC {
            assert!(!menu.is_enabled(id), "{id:?} should start disabled");
        }
    }

    #[test]
    fn test_cloud_sync_toggle_leaves_settings_alone() {
        let mut menu = MenuModel::new();
        menu.set_cloud_sync_enabled(true);
        assert!(menu.is_enabled(MenuItemId::UploadAll));
        menu.set_cloud_sync_enabled(false);
        assert!(!menu.is_enabled(MenuItemId::UploadAll));
        assert!(menu.is_enabled(MenuItemId::CloudSettings));
    }

    #[test]
    fn test_left_bar_label() {
        let mut menu = MenuModel::new();
        assert_eq!(menu.label(MenuItemId::ToggleLeftBar), "隐藏侧边栏");
        menu.apply_left_bar(LeftBarState::Close);
        assert_eq!(menu.label(MenuItemId::ToggleLeftBar), "开启侧边栏");
        menu.apply_left_bar(LeftBarState::Open);
        assert_eq!(menu.label(MenuItemId::ToggleLeftBar), "隐藏侧边栏");
    }

    #[test]
    fn test_snapshot_groups_by_section() {
        let snapshot = MenuModel::new().snapshot();
        assert_eq!(snapshot.sections.len(), 2);
        assert_eq!(snapshot.sections[0].title, "云同步");
        assert_eq!(snapshot.sections[0].items.len(), 4);
        assert_eq!(snapshot.sections[1].title, "视图");
        assert_eq!(
            snapshot.item(MenuItemId::ToggleLeftBar).map(|i| i.enabled),
            Some(true)
        );
    }

    #[test]
    fn test_item_id_wire_names() {
        assert_eq!(
            serde_json::to_string(&MenuItemId::ToggleLeftBar).unwrap(),
            "\"toggle-left-bar\""
        );
        let id: MenuItemId = serde_json::from_str("\"upload-all\"").unwrap();
        assert_eq!(id, MenuItemId::UploadAll);
    }
}
