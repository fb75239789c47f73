//! Shared contract types between the desktop core and the shell/apps that surround it.
//!
//! The desktop core consumes icons as [`AppIcon`] records and window bodies as opaque
//! [`WindowContent`] payloads. Everything an embedded app needs to know about the grid or the
//! window manager crosses this boundary, and nothing else does.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Kind of desktop entry an icon represents.
pub enum IconKind {
    /// Built-in application.
    App,
    /// File backed by the virtual file system.
    File,
    /// Folder backed by the virtual file system.
    Folder,
}

impl IconKind {
    /// Returns the stable wire token for this kind.
    pub const fn token(self) -> &'static str {
        match self {
            Self::App => "app",
            Self::File => "file",
            Self::Folder => "folder",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Desktop icon metadata supplied by the shell.
///
/// `x`/`y` are logical grid coordinates (column/row), not pixels.
pub struct AppIcon {
    /// Stable icon identifier; also the id of the window the icon opens.
    pub id: String,
    /// Display label.
    pub title: String,
    /// Grid column.
    pub x: i32,
    /// Grid row.
    pub y: i32,
    /// Optional accent color token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Entry kind.
    #[serde(rename = "type")]
    pub kind: IconKind,
    /// Whether the icon belongs to a system application.
    #[serde(default)]
    pub is_system_app: bool,
    /// Whether the icon is a desktop-only application shortcut.
    #[serde(default)]
    pub is_desktop_app: bool,
    /// Last modification time in unix milliseconds, used by date sorting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_unix_ms: Option<u64>,
    /// Entry size in bytes, used by size sorting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
}

impl AppIcon {
    /// Creates an icon at `(x, y)` with no optional metadata.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        kind: IconKind,
        x: i32,
        y: i32,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            x,
            y,
            color: None,
            kind,
            is_system_app: false,
            is_desktop_app: false,
            modified_unix_ms: None,
            size_bytes: None,
        }
    }

    /// Sets the accent color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Marks the icon as a system application.
    pub fn system(mut self) -> Self {
        self.is_system_app = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Context-menu flavor requested by the desktop grid.
pub enum ContextMenuKind {
    /// Empty desktop space.
    Desktop,
    /// A file icon.
    File,
    /// A folder icon.
    Folder,
    /// An application icon.
    App,
}

impl From<IconKind> for ContextMenuKind {
    fn from(kind: IconKind) -> Self {
        match kind {
            IconKind::App => Self::App,
            IconKind::File => Self::File,
            IconKind::Folder => Self::Folder,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Context-menu request emitted by the desktop grid for the shell to render.
pub struct ContextMenuRequest {
    /// Menu flavor.
    pub kind: ContextMenuKind,
    /// Container-local x coordinate of the pointer.
    pub x: f64,
    /// Container-local y coordinate of the pointer.
    pub y: f64,
    /// Icon under the pointer, when any.
    pub target_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Comparator key for caller-driven desktop sorting.
pub enum SortKey {
    /// Title ascending.
    Name,
    /// Title descending.
    NameDesc,
    /// Most recently modified first.
    Date,
    /// Largest first.
    Size,
    /// Folders first, then by kind token, then by title.
    Type,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "name" => Ok(Self::Name),
            "name-desc" => Ok(Self::NameDesc),
            "date" => Ok(Self::Date),
            "size" => Ok(Self::Size),
            "type" => Ok(Self::Type),
            other => Err(format!("unknown sort key `{other}`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Opaque window body: a `type` tag plus arbitrary payload fields.
///
/// The window manager stores and relays this value without interpreting it.
pub struct WindowContent {
    /// Content discriminator (for example `text-editor` or `default`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Remaining payload fields.
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl WindowContent {
    /// Creates content with the given tag and an empty payload.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: Map::new(),
        }
    }

    /// Adds a payload field.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    /// Reads a payload field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }
}

impl Default for WindowContent {
    fn default() -> Self {
        Self::new("default")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
/// Requested window extent: pixels, or a CSS-like string resolved against the viewport.
pub enum Dimension {
    /// Absolute pixels.
    Px(f64),
    /// `"NN%"`, `"NNpx"`, or a bare number string.
    Css(String),
}

impl Dimension {
    /// Resolves the extent against `available` pixels.
    ///
    /// Unparseable, non-finite, or non-positive values resolve to `fallback`.
    pub fn resolve(&self, available: f64, fallback: f64) -> f64 {
        let resolved = match self {
            Self::Px(px) => Some(*px),
            Self::Css(raw) => parse_css_extent(raw.trim(), available),
        };
        match resolved {
            Some(value) if value.is_finite() && value > 0.0 => value,
            _ => fallback,
        }
    }
}

impl From<f64> for Dimension {
    fn from(px: f64) -> Self {
        Self::Px(px)
    }
}

fn parse_css_extent(raw: &str, available: f64) -> Option<f64> {
    if let Some(percent) = raw.strip_suffix('%') {
        let ratio = percent.trim().parse::<f64>().ok()?;
        return Some(available * ratio / 100.0);
    }
    let number = raw.strip_suffix("px").unwrap_or(raw);
    number.trim().parse::<f64>().ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Lifecycle events emitted by the window manager for a window.
pub enum AppLifecycleEvent {
    /// Window was created.
    Opened,
    /// Window became focused.
    Focused,
    /// Window lost focus.
    Blurred,
    /// Window was minimized.
    Minimized,
    /// Window was restored from minimized or maximized state.
    Restored,
    /// Window now fills the viewport.
    Maximized,
    /// Window was closed.
    Closed,
}

impl AppLifecycleEvent {
    /// Returns a stable string token for debugging hooks.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Opened => "opened",
            Self::Focused => "focused",
            Self::Blurred => "blurred",
            Self::Minimized => "minimized",
            Self::Restored => "restored",
            Self::Maximized => "maximized",
            Self::Closed => "closed",
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn app_icon_uses_camel_case_wire_shape() {
        let icon = AppIcon::new("myPC", "My PC", IconKind::App, 0, 1).system();
        let value = serde_json::to_value(&icon).expect("serialize icon");
        assert_eq!(value["type"], json!("app"));
        assert_eq!(value["isSystemApp"], json!(true));
        assert_eq!(value["isDesktopApp"], json!(false));
        assert!(value.get("color").is_none());
    }

    #[test]
    fn app_icon_accepts_sparse_saved_records() {
        let icon: AppIcon = serde_json::from_value(json!({
            "id": "notes",
            "title": "Notes",
            "x": 1,
            "y": 4,
            "type": "file"
        }))
        .expect("decode sparse icon");
        assert_eq!(icon.kind, IconKind::File);
        assert!(!icon.is_system_app);
        assert_eq!(icon.size_bytes, None);
    }

    #[test]
    fn window_content_flattens_payload_next_to_type_tag() {
        let content = WindowContent::new("text-editor").with("id", "file-readme");
        let value = serde_json::to_value(&content).expect("serialize content");
        assert_eq!(value, json!({"type": "text-editor", "id": "file-readme"}));

        let decoded: WindowContent =
            serde_json::from_value(json!({"type": "browser", "url": "about:blank"}))
                .expect("decode content");
        assert_eq!(decoded.kind, "browser");
        assert_eq!(decoded.get("url"), Some(&json!("about:blank")));
    }

    #[test]
    fn dimension_resolves_pixels_percentages_and_garbage() {
        assert_eq!(Dimension::Px(320.0).resolve(1000.0, 600.0), 320.0);
        assert_eq!(Dimension::Css("100%".into()).resolve(1280.0, 600.0), 1280.0);
        assert_eq!(Dimension::Css("50 %".into()).resolve(900.0, 600.0), 450.0);
        assert_eq!(Dimension::Css("240px".into()).resolve(900.0, 600.0), 240.0);
        assert_eq!(
            Dimension::Css("calc(100vh - 48px)".into()).resolve(900.0, 600.0),
            600.0
        );
        assert_eq!(Dimension::Px(f64::NAN).resolve(900.0, 600.0), 600.0);
        assert_eq!(Dimension::Px(-5.0).resolve(900.0, 600.0), 600.0);
    }

    #[test]
    fn dimension_deserializes_numbers_and_strings() {
        let px: Dimension = serde_json::from_value(json!(300)).expect("number");
        let css: Dimension = serde_json::from_value(json!("100%")).expect("string");
        assert_eq!(px, Dimension::Px(300.0));
        assert_eq!(css, Dimension::Css("100%".to_string()));
    }

    #[test]
    fn sort_key_parses_caller_tokens() {
        assert_eq!("name-desc".parse::<SortKey>(), Ok(SortKey::NameDesc));
        assert_eq!("type".parse::<SortKey>(), Ok(SortKey::Type));
        assert!("color".parse::<SortKey>().is_err());
    }

    #[test]
    fn context_menu_kind_follows_icon_kind() {
        assert_eq!(ContextMenuKind::from(IconKind::Folder), ContextMenuKind::Folder);
        assert_eq!(ContextMenuKind::from(IconKind::App), ContextMenuKind::App);
    }
}
