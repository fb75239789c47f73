use std::str::FromStr;

use desktop_app_contract::{Dimension, WindowContent};
use serde::{Deserialize, Serialize};

use crate::{config::WindowSettings, geometry::Point, geometry::Size};

pub const DEFAULT_VIEWPORT_WIDTH: f64 = 1280.0;
pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 800.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl WindowRect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    pub fn clamped_min(self, min_w: f64, min_h: f64) -> Self {
        Self {
            w: self.w.max(min_w),
            h: self.h.max(min_h),
            ..self
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.w.is_finite() && self.h.is_finite()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub id: String,
    pub title: String,
    pub rect: WindowRect,
    pub restore_rect: Option<WindowRect>,
    pub z_index: u64,
    pub is_focused: bool,
    pub minimized: bool,
    pub maximized: bool,
    pub content: WindowContent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DesktopState {
    pub windows: Vec<WindowRecord>,
    pub viewport: Size,
    pub settings: WindowSettings,
    pub opened_count: u64,
}

impl Default for DesktopState {
    fn default() -> Self {
        Self::new(
            Size::new(DEFAULT_VIEWPORT_WIDTH, DEFAULT_VIEWPORT_HEIGHT),
            WindowSettings::default(),
        )
    }
}

impl DesktopState {
    pub fn new(viewport: Size, settings: WindowSettings) -> Self {
        let viewport = if viewport.is_usable() {
            viewport
        } else {
            Size::new(DEFAULT_VIEWPORT_WIDTH, DEFAULT_VIEWPORT_HEIGHT)
        };
        Self {
            windows: Vec::new(),
            viewport,
            settings,
            opened_count: 0,
        }
    }

    pub fn focused_window_id(&self) -> Option<&str> {
        self.windows
            .iter()
            .find(|w| w.is_focused)
            .map(|w| w.id.as_str())
    }

    pub fn window(&self, window_id: &str) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| w.id == window_id)
    }

    /// Highest z-index among all windows, minimized ones included.
    pub fn max_z_index(&self) -> u64 {
        self.windows.iter().map(|w| w.z_index).max().unwrap_or(0)
    }

    /// Windows in paint order, bottom first, minimized ones skipped.
    pub fn visible_windows(&self) -> Vec<&WindowRecord> {
        let mut visible: Vec<&WindowRecord> =
            self.windows.iter().filter(|w| !w.minimized).collect();
        visible.sort_by_key(|w| w.z_index);
        visible
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenWindowRequest {
    pub id: String,
    pub title: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<Dimension>,
    pub height: Option<Dimension>,
    pub content: WindowContent,
}

impl OpenWindowRequest {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            x: None,
            y: None,
            width: None,
            height: None,
            content: WindowContent::default(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    pub fn sized(mut self, width: impl Into<Dimension>, height: impl Into<Dimension>) -> Self {
        self.width = Some(width.into());
        self.height = Some(height.into());
        self
    }

    pub fn with_content(mut self, content: WindowContent) -> Self {
        self.content = content;
        self
    }
}

/// Partial window update; `None` fields are left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WindowPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub minimized: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizeEdge {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl ResizeEdge {
    pub const ALL: [Self; 8] = [
        Self::North,
        Self::South,
        Self::East,
        Self::West,
        Self::NorthEast,
        Self::NorthWest,
        Self::SouthEast,
        Self::SouthWest,
    ];

    pub const fn token(self) -> &'static str {
        match self {
            Self::North => "n",
            Self::South => "s",
            Self::East => "e",
            Self::West => "w",
            Self::NorthEast => "ne",
            Self::NorthWest => "nw",
            Self::SouthEast => "se",
            Self::SouthWest => "sw",
        }
    }

    /// Whether dragging this edge moves the left side of the window.
    pub const fn moves_west(self) -> bool {
        matches!(self, Self::West | Self::NorthWest | Self::SouthWest)
    }

    /// Whether dragging this edge moves the top side of the window.
    pub const fn moves_north(self) -> bool {
        matches!(self, Self::North | Self::NorthEast | Self::NorthWest)
    }

    pub const fn resizes_width(self) -> bool {
        !matches!(self, Self::North | Self::South)
    }

    pub const fn resizes_height(self) -> bool {
        !matches!(self, Self::East | Self::West)
    }
}

impl FromStr for ResizeEdge {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|edge| edge.token() == raw)
            .ok_or_else(|| format!("unknown resize edge `{raw}`"))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub window_id: String,
    pub pointer_start: Point,
    pub rect_start: WindowRect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResizeSession {
    pub window_id: String,
    pub edge: ResizeEdge,
    pub pointer_start: Point,
    pub rect_start: WindowRect,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct InteractionState {
    pub dragging: Option<DragSession>,
    pub resizing: Option<ResizeSession>,
}

impl InteractionState {
    pub fn is_idle(&self) -> bool {
        self.dragging.is_none() && self.resizing.is_none()
    }
}
