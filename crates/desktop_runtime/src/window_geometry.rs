//! Pure window geometry: move and resize from pointer deltas, viewport clamping, maximize
//! layout, and initial placement.
//!
//! All functions take the gesture's starting rectangle and the total pointer delta, so replaying
//! the same gesture always lands on the same rectangle.

use desktop_app_contract::Dimension;

use crate::{
    config::WindowSettings,
    geometry::Size,
    model::{ResizeEdge, WindowRect},
};

#[derive(Debug, Clone, Copy, PartialEq)]
/// Inclusive size range a window may take inside a viewport.
pub struct SizeBounds {
    /// Minimum width.
    pub min_w: f64,
    /// Maximum width, never below `min_w`.
    pub max_w: f64,
    /// Minimum height.
    pub min_h: f64,
    /// Maximum height, never below `min_h`.
    pub max_h: f64,
}

impl SizeBounds {
    /// Resolves configured limits against a viewport. Unset maxima follow the work area.
    pub fn new(viewport: Size, settings: &WindowSettings) -> Self {
        let work = work_area(viewport, settings);
        let max_w = settings.max_width.unwrap_or(work.width);
        let max_h = settings.max_height.unwrap_or(work.height);
        Self {
            min_w: settings.min_width,
            max_w: max_w.max(settings.min_width),
            min_h: settings.min_height,
            max_h: max_h.max(settings.min_height),
        }
    }

    /// Clamps a width into range.
    pub fn width(&self, w: f64) -> f64 {
        w.clamp(self.min_w, self.max_w)
    }

    /// Clamps a height into range.
    pub fn height(&self, h: f64) -> f64 {
        h.clamp(self.min_h, self.max_h)
    }
}

/// Viewport minus the taskbar band.
pub fn work_area(viewport: Size, settings: &WindowSettings) -> Size {
    Size::new(
        viewport.width.max(0.0),
        (viewport.height - settings.taskbar_height).max(0.0),
    )
}

/// Keeps the whole window inside the work area where it fits; oversized windows pin to the
/// top-left corner.
pub fn clamp_position(rect: WindowRect, viewport: Size, settings: &WindowSettings) -> WindowRect {
    let work = work_area(viewport, settings);
    WindowRect {
        x: rect.x.clamp(0.0, (work.width - rect.w).max(0.0)),
        y: rect.y.clamp(0.0, (work.height - rect.h).max(0.0)),
        ..rect
    }
}

/// Rectangle for a title-bar drag of `(dx, dy)` from `start`.
pub fn move_rect(
    start: WindowRect,
    dx: f64,
    dy: f64,
    viewport: Size,
    settings: &WindowSettings,
) -> WindowRect {
    clamp_position(start.offset(dx, dy), viewport, settings)
}

/// Rectangle for dragging `edge` by `(dx, dy)` from `start`.
///
/// Each axis clamps independently to [`SizeBounds`], further capped by the room between the
/// fixed opposite edge and the work area border. West and north edges shift the origin by
/// exactly the amount the clamped extent changed, so the opposite edge stays put.
pub fn resize_rect(
    start: WindowRect,
    edge: ResizeEdge,
    dx: f64,
    dy: f64,
    viewport: Size,
    settings: &WindowSettings,
) -> WindowRect {
    let bounds = SizeBounds::new(viewport, settings);
    let work = work_area(viewport, settings);

    let w = if !edge.resizes_width() {
        start.w
    } else if edge.moves_west() {
        clamp_extent(start.w - dx, bounds.min_w, bounds.max_w, start.x + start.w)
    } else {
        clamp_extent(start.w + dx, bounds.min_w, bounds.max_w, work.width - start.x)
    };
    let h = if !edge.resizes_height() {
        start.h
    } else if edge.moves_north() {
        clamp_extent(start.h - dy, bounds.min_h, bounds.max_h, start.y + start.h)
    } else {
        clamp_extent(start.h + dy, bounds.min_h, bounds.max_h, work.height - start.y)
    };

    WindowRect {
        x: if edge.moves_west() {
            start.x + (start.w - w)
        } else {
            start.x
        },
        y: if edge.moves_north() {
            start.y + (start.h - h)
        } else {
            start.y
        },
        w,
        h,
    }
}

// Growth never goes past `room`, but the minimum size always wins.
fn clamp_extent(extent: f64, min: f64, max: f64, room: f64) -> f64 {
    extent.clamp(min, max.min(room).max(min))
}

/// Rectangle a maximized window occupies: the full work area.
pub fn maximized_rect(viewport: Size, settings: &WindowSettings) -> WindowRect {
    let work = work_area(viewport, settings);
    WindowRect::new(0.0, 0.0, work.width, work.height)
}

/// Shrinks a window into the size bounds of a new viewport, then pulls it back inside.
pub fn clamp_into_viewport(
    rect: WindowRect,
    viewport: Size,
    settings: &WindowSettings,
) -> WindowRect {
    let bounds = SizeBounds::new(viewport, settings);
    let sized = WindowRect {
        w: bounds.width(rect.w),
        h: bounds.height(rect.h),
        ..rect
    };
    clamp_position(sized, viewport, settings)
}

/// Resolves requested extents against the viewport, falling back to `default` for missing or
/// unusable values, then clamps into [`SizeBounds`].
pub fn resolve_size(
    width: Option<&Dimension>,
    height: Option<&Dimension>,
    default: Size,
    viewport: Size,
    settings: &WindowSettings,
) -> Size {
    let work = work_area(viewport, settings);
    let bounds = SizeBounds::new(viewport, settings);
    let w = width.map_or(default.width, |dim| dim.resolve(work.width, default.width));
    let h = height.map_or(default.height, |dim| dim.resolve(work.height, default.height));
    Size::new(bounds.width(w), bounds.height(h))
}

/// Initial rectangle for the `ordinal`-th window opened without an explicit position.
///
/// Windows are centred in the work area and fanned out along the diagonal by a deterministic
/// cascade, bounded by `max_cascade_offset` and half the free space around the centred window.
pub fn place_new_window(
    size: Size,
    ordinal: u64,
    viewport: Size,
    settings: &WindowSettings,
) -> WindowRect {
    let work = work_area(viewport, settings);
    let centre_x = (work.width - size.width) / 2.0;
    let centre_y = (work.height - size.height) / 2.0;
    let max_offset = settings
        .max_cascade_offset
        .min(centre_x.min(centre_y) / 2.0)
        .max(0.0);

    // Five slots: -2..=2 steps around the centre.
    let slot = (ordinal % 5) as f64 - 2.0;
    let offset = (slot * settings.cascade_step).clamp(-max_offset, max_offset);

    clamp_position(
        WindowRect::new(
            centre_x + offset,
            centre_y + offset,
            size.width,
            size.height,
        ),
        viewport,
        settings,
    )
}
