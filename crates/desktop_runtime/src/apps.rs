//! App registry: maps desktop icons to window descriptors.
//!
//! Descriptors come from `app_manifests/*.toml`, compiled into a JSON catalog at build time.

use desktop_app_contract::{AppIcon, Dimension, IconKind, WindowContent};
use serde::Deserialize;

use crate::model::OpenWindowRequest;

mod catalog {
    include!(concat!(env!("OUT_DIR"), "/app_catalog_generated.rs"));
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
/// Initial window size an app asks for.
pub struct WindowDefaults {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
/// Where and how an app appears on a fresh desktop.
pub struct DesktopPlacement {
    /// Grid column.
    pub x: i32,
    /// Grid row.
    pub y: i32,
    /// Icon kind shown on the desktop.
    pub kind: IconKind,
    /// Accent color token.
    #[serde(default)]
    pub color: Option<String>,
    /// Whether the icon belongs to a system application.
    #[serde(default)]
    pub system: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
/// One registered app, decoded from its manifest.
pub struct AppDescriptor {
    /// App id; also the id of its desktop icon and window.
    pub app_id: String,
    /// Display title.
    pub title: String,
    /// `type` tag of the window content.
    pub content_type: String,
    /// Component name carried in the content payload.
    #[serde(default)]
    pub component: Option<String>,
    /// Icon kinds this app opens when no descriptor matches the icon id.
    #[serde(default)]
    pub handles_kinds: Vec<IconKind>,
    /// Initial window size; the window manager default applies when unset.
    #[serde(default)]
    pub window: Option<WindowDefaults>,
    /// Default desktop icon placement, when the app has an icon.
    #[serde(default)]
    pub desktop: Option<DesktopPlacement>,
}

impl AppDescriptor {
    /// Default desktop icon for this app, when it has one.
    pub fn desktop_icon(&self) -> Option<AppIcon> {
        let placement = self.desktop.as_ref()?;
        let mut icon = AppIcon::new(
            self.app_id.clone(),
            self.title.clone(),
            placement.kind,
            placement.x,
            placement.y,
        );
        icon.color = placement.color.clone();
        icon.is_system_app = placement.system;
        icon.is_desktop_app = placement.kind == IconKind::App;
        Some(icon)
    }

    fn content_for(&self, icon: &AppIcon) -> WindowContent {
        let mut content = WindowContent::new(self.content_type.clone());
        if let Some(component) = &self.component {
            content = content.with("component", component.clone());
        }
        if icon.id != self.app_id {
            content = content.with("fileId", icon.id.clone());
        }
        content
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
/// Lookup table from desktop icons to app descriptors.
pub struct AppRegistry {
    apps: Vec<AppDescriptor>,
}

impl AppRegistry {
    /// Registry compiled from the bundled manifests.
    pub fn builtin() -> Self {
        match Self::from_catalog_json(catalog::APP_MANIFEST_CATALOG_JSON) {
            Ok(registry) => registry,
            Err(err) => {
                leptos::logging::warn!("app catalog decode failed: {err}");
                Self::default()
            }
        }
    }

    /// Decodes a registry from catalog JSON.
    pub fn from_catalog_json(raw: &str) -> Result<Self, String> {
        let apps: Vec<AppDescriptor> = serde_json::from_str(raw).map_err(|e| e.to_string())?;
        Ok(Self { apps })
    }

    /// All registered apps in catalog order.
    pub fn apps(&self) -> &[AppDescriptor] {
        &self.apps
    }

    /// Looks up the descriptor for `icon`: by id first, then by the app that handles its kind.
    pub fn descriptor_for(&self, icon: &AppIcon) -> Option<&AppDescriptor> {
        self.apps
            .iter()
            .find(|app| app.app_id == icon.id)
            .or_else(|| {
                self.apps
                    .iter()
                    .find(|app| app.handles_kinds.contains(&icon.kind))
            })
    }

    /// Window request for opening `icon`. The window id is always the icon id.
    ///
    /// Icons without a descriptor open a plain window with default size.
    pub fn open_request(&self, icon: &AppIcon) -> OpenWindowRequest {
        let request = OpenWindowRequest::new(icon.id.clone()).with_title(icon.title.clone());
        let Some(app) = self.descriptor_for(icon) else {
            return request;
        };
        let request = request.with_content(app.content_for(icon));
        match app.window {
            Some(size) => request.sized(Dimension::Px(size.width), Dimension::Px(size.height)),
            None => request,
        }
    }

    /// Icons shown on a fresh desktop, in row-major order.
    pub fn default_icons(&self) -> Vec<AppIcon> {
        self.apps
            .iter()
            .filter_map(AppDescriptor::desktop_icon)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn builtin_catalog_lays_out_twelve_icons_in_two_columns() {
        let icons = AppRegistry::builtin().default_icons();
        let placed: Vec<(&str, i32, i32)> = icons
            .iter()
            .map(|icon| (icon.id.as_str(), icon.x, icon.y))
            .collect();
        assert_eq!(
            placed,
            vec![
                ("myPC", 0, 0),
                ("weather", 1, 0),
                ("terminal", 0, 1),
                ("aboutMe", 1, 1),
                ("calculator", 0, 2),
                ("textEditor", 1, 2),
                ("memory", 0, 3),
                ("readme", 1, 3),
                ("calendar", 0, 4),
                ("fileSystem", 1, 4),
                ("browser", 0, 5),
                ("codeIndexer", 1, 5),
            ]
        );
        assert!(icons[0].is_system_app);
        assert_eq!(icons[3].kind, IconKind::File);
    }

    #[test]
    fn open_request_uses_descriptor_size_and_content() {
        let registry = AppRegistry::builtin();
        let icon = AppIcon::new("calculator", "Calculator", IconKind::App, 0, 2);
        let request = registry.open_request(&icon);
        assert_eq!(request.id, "calculator");
        assert_eq!(request.width, Some(Dimension::Px(300.0)));
        assert_eq!(request.height, Some(Dimension::Px(450.0)));
        assert_eq!(request.content.kind, "default");
        assert_eq!(
            request.content.get("component"),
            Some(&serde_json::json!("calculator"))
        );
    }

    #[test]
    fn unknown_ids_fall_back_by_kind() {
        let registry = AppRegistry::builtin();
        let file = AppIcon::new("file-docs-notes.txt", "notes.txt", IconKind::File, 0, 7);
        let request = registry.open_request(&file);
        assert_eq!(request.content.kind, "text-editor");
        assert_eq!(
            request.content.get("fileId"),
            Some(&serde_json::json!("file-docs-notes.txt"))
        );

        let folder = AppIcon::new("folder-docs", "docs", IconKind::Folder, 1, 7);
        assert_eq!(registry.open_request(&folder).content.kind, "file-explorer");
    }

    #[test]
    fn apps_without_window_defaults_leave_size_to_the_window_manager() {
        let registry = AppRegistry::builtin();
        let icon = AppIcon::new("terminal", "Terminal", IconKind::App, 0, 1);
        let request = registry.open_request(&icon);
        assert_eq!(request.width, None);
        assert_eq!(request.title.as_deref(), Some("Terminal"));
    }

    #[test]
    fn malformed_catalog_is_an_error() {
        assert!(AppRegistry::from_catalog_json("{").is_err());
    }
}
