//! Shared window-manager transition helpers used by the desktop reducer.
//!
//! Stacking rules:
//! - focusing a window gives it `max z-index + 1`; no other z-index changes, ever;
//! - at most one window is focused, and it is never minimized;
//! - when the focused window closes or minimizes, the non-minimized window with the highest
//!   z-index takes focus without being re-stacked.

use crate::{
    geometry::Size,
    model::{DesktopState, WindowPatch, WindowRecord},
    reducer::ReducerError,
    window_geometry::{clamp_into_viewport, maximized_rect, SizeBounds},
};

pub(crate) fn find_window_mut<'a>(
    state: &'a mut DesktopState,
    window_id: &str,
) -> Result<&'a mut WindowRecord, ReducerError> {
    state
        .windows
        .iter_mut()
        .find(|w| w.id == window_id)
        .ok_or_else(|| ReducerError::WindowNotFound(window_id.to_string()))
}

/// Focuses and raises `window_id`, unminimizing it if needed.
///
/// Focusing the window that is already focused and on top leaves every z-index untouched.
pub fn focus_window_internal(state: &mut DesktopState, window_id: &str) -> Result<(), ReducerError> {
    let max_z = state.max_z_index();
    let window = find_window_mut(state, window_id)?;
    if window.is_focused && !window.minimized && window.z_index == max_z {
        return Ok(());
    }
    window.z_index = max_z.saturating_add(1);
    window.minimized = false;
    for window in &mut state.windows {
        window.is_focused = window.id == window_id;
    }
    Ok(())
}

/// Hands focus to the non-minimized window with the highest z-index, without re-stacking.
pub fn refocus_topmost(state: &mut DesktopState) {
    let top = state
        .windows
        .iter()
        .filter(|w| !w.minimized)
        .max_by_key(|w| w.z_index)
        .map(|w| w.id.clone());
    for window in &mut state.windows {
        window.is_focused = top.as_deref() == Some(window.id.as_str());
    }
}

/// Removes a window and returns it. Other windows keep their z-index.
pub fn close_window(state: &mut DesktopState, window_id: &str) -> Result<WindowRecord, ReducerError> {
    let index = state
        .windows
        .iter()
        .position(|w| w.id == window_id)
        .ok_or_else(|| ReducerError::WindowNotFound(window_id.to_string()))?;
    let removed = state.windows.remove(index);
    if removed.is_focused {
        refocus_topmost(state);
    }
    Ok(removed)
}

/// Minimizes a window, keeping its geometry and z-index. Returns `false` when it already was.
pub fn minimize_window(state: &mut DesktopState, window_id: &str) -> Result<bool, ReducerError> {
    let window = find_window_mut(state, window_id)?;
    if window.minimized {
        return Ok(false);
    }
    window.minimized = true;
    let was_focused = std::mem::replace(&mut window.is_focused, false);
    if was_focused {
        refocus_topmost(state);
    }
    Ok(true)
}

/// Brings a minimized window back, or un-maximizes a visible one, and focuses it.
///
/// Returns `true` when anything besides focus changed.
pub fn restore_window(state: &mut DesktopState, window_id: &str) -> Result<bool, ReducerError> {
    let window = find_window_mut(state, window_id)?;
    let changed = if window.minimized {
        window.minimized = false;
        true
    } else if window.maximized {
        if let Some(restore_rect) = window.restore_rect.take() {
            window.rect = restore_rect;
        }
        window.maximized = false;
        true
    } else {
        false
    };
    focus_window_internal(state, window_id)?;
    Ok(changed)
}

/// Maximizes a window into the viewport, or restores its snapshot when already maximized.
///
/// Returns the new maximized flag.
pub fn toggle_maximize(state: &mut DesktopState, window_id: &str) -> Result<bool, ReducerError> {
    let filled = maximized_rect(state.viewport, &state.settings);
    let window = find_window_mut(state, window_id)?;
    if window.maximized {
        if let Some(restore_rect) = window.restore_rect.take() {
            window.rect = restore_rect;
        }
        window.maximized = false;
    } else {
        window.restore_rect = Some(window.rect);
        window.rect = filled;
        window.maximized = true;
    }
    let maximized = window.maximized;
    focus_window_internal(state, window_id)?;
    Ok(maximized)
}

/// Merges position and size fields into a window. Sizes clamp to the current bounds; the
/// `minimized` field is applied through [`minimize_window`] / [`restore_window`] so focus rules
/// still hold.
pub fn update_window(
    state: &mut DesktopState,
    window_id: &str,
    patch: WindowPatch,
) -> Result<(), ReducerError> {
    let bounds = SizeBounds::new(state.viewport, &state.settings);
    let window = find_window_mut(state, window_id)?;
    // A maximized window's rect is derived from the viewport; edits go to the snapshot.
    let target = match window.restore_rect.as_mut() {
        Some(snapshot) if window.maximized => snapshot,
        _ => &mut window.rect,
    };
    if let Some(x) = patch.x.filter(|v| v.is_finite()) {
        target.x = x;
    }
    if let Some(y) = patch.y.filter(|v| v.is_finite()) {
        target.y = y;
    }
    if let Some(w) = patch.width.filter(|v| v.is_finite()) {
        target.w = bounds.width(w);
    }
    if let Some(h) = patch.height.filter(|v| v.is_finite()) {
        target.h = bounds.height(h);
    }

    match patch.minimized {
        Some(true) => {
            minimize_window(state, window_id)?;
        }
        Some(false) => {
            if find_window_mut(state, window_id)?.minimized {
                restore_window(state, window_id)?;
            }
        }
        None => {}
    }
    Ok(())
}

/// Applies a new viewport. Maximized windows re-fill it with their snapshot untouched; the
/// rest are clamped back inside. Unusable sizes are ignored and return `false`.
pub fn apply_viewport(state: &mut DesktopState, viewport: Size) -> bool {
    if !viewport.is_usable() {
        return false;
    }
    state.viewport = viewport;
    let filled = maximized_rect(viewport, &state.settings);
    for window in &mut state.windows {
        window.rect = if window.maximized {
            filled
        } else {
            clamp_into_viewport(window.rect, viewport, &state.settings)
        };
    }
    true
}

#[cfg(test)]
mod tests {
    use desktop_app_contract::WindowContent;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::WindowRect;

    fn window(id: &str, z_index: u64) -> WindowRecord {
        WindowRecord {
            id: id.to_string(),
            title: id.to_string(),
            rect: WindowRect::new(10.0, 10.0, 300.0, 200.0),
            restore_rect: None,
            z_index,
            is_focused: false,
            minimized: false,
            maximized: false,
            content: WindowContent::default(),
        }
    }

    fn state_with(ids: &[&str]) -> DesktopState {
        let mut state = DesktopState::default();
        for (index, id) in ids.iter().enumerate() {
            state.windows.push(window(id, index as u64 + 1));
        }
        if let Some(last) = state.windows.last_mut() {
            last.is_focused = true;
        }
        state
    }

    fn z(state: &DesktopState, id: &str) -> u64 {
        state.window(id).map(|w| w.z_index).expect("window")
    }

    #[test]
    fn focus_takes_max_plus_one_and_touches_nothing_else() {
        let mut state = state_with(&["a", "b", "c"]);
        focus_window_internal(&mut state, "a").expect("focus");
        assert_eq!(z(&state, "a"), 4);
        assert_eq!(z(&state, "b"), 2);
        assert_eq!(z(&state, "c"), 3);
        assert_eq!(state.focused_window_id(), Some("a"));

        focus_window_internal(&mut state, "a").expect("refocus");
        assert_eq!(z(&state, "a"), 4);
    }

    #[test]
    fn closing_the_focused_window_focuses_the_next_highest() {
        let mut state = state_with(&["a", "b", "c"]);
        minimize_window(&mut state, "b").expect("minimize b");
        state.windows.iter_mut().for_each(|w| w.is_focused = w.id == "c");

        let closed = close_window(&mut state, "c").expect("close");
        assert_eq!(closed.id, "c");
        assert_eq!(state.focused_window_id(), Some("a"));
        assert_eq!(z(&state, "a"), 1);
        assert_eq!(z(&state, "b"), 2);
    }

    #[test]
    fn minimize_keeps_geometry_and_z_index() {
        let mut state = state_with(&["a", "b"]);
        let before = state.window("b").cloned().expect("b");
        assert!(minimize_window(&mut state, "b").expect("minimize"));
        let after = state.window("b").expect("b");
        assert_eq!(after.rect, before.rect);
        assert_eq!(after.z_index, before.z_index);
        assert!(!after.is_focused);
        assert_eq!(state.focused_window_id(), Some("a"));
        assert!(!minimize_window(&mut state, "b").expect("again"));
    }

    #[test]
    fn restore_unminimizes_and_focuses() {
        let mut state = state_with(&["a", "b"]);
        minimize_window(&mut state, "b").expect("minimize");
        assert!(restore_window(&mut state, "b").expect("restore"));
        let b = state.window("b").expect("b");
        assert!(!b.minimized && b.is_focused);
        assert_eq!(b.z_index, 3);
    }

    #[test]
    fn maximize_round_trip_survives_viewport_changes() {
        let mut state = state_with(&["a"]);
        let original = state.window("a").map(|w| w.rect).expect("a");

        assert!(toggle_maximize(&mut state, "a").expect("maximize"));
        assert_eq!(
            state.window("a").map(|w| w.rect),
            Some(WindowRect::new(0.0, 0.0, 1280.0, 752.0))
        );
        assert!(apply_viewport(&mut state, Size::new(1024.0, 600.0)));
        assert_eq!(
            state.window("a").map(|w| w.rect),
            Some(WindowRect::new(0.0, 0.0, 1024.0, 552.0))
        );

        assert!(!toggle_maximize(&mut state, "a").expect("restore"));
        assert_eq!(state.window("a").map(|w| w.rect), Some(original));
    }

    #[test]
    fn update_merges_fields_and_routes_minimized_through_focus_rules() {
        let mut state = state_with(&["a", "b"]);
        update_window(
            &mut state,
            "a",
            WindowPatch {
                x: Some(40.0),
                width: Some(50.0),
                height: Some(f64::NAN),
                ..WindowPatch::default()
            },
        )
        .expect("update");
        let a = state.window("a").expect("a");
        assert_eq!(a.rect, WindowRect::new(40.0, 10.0, 200.0, 200.0));

        update_window(
            &mut state,
            "b",
            WindowPatch {
                minimized: Some(true),
                ..WindowPatch::default()
            },
        )
        .expect("minimize via update");
        assert_eq!(state.focused_window_id(), Some("a"));

        update_window(
            &mut state,
            "b",
            WindowPatch {
                minimized: Some(false),
                ..WindowPatch::default()
            },
        )
        .expect("restore via update");
        assert_eq!(state.focused_window_id(), Some("b"));
    }

    #[test]
    fn unusable_viewport_is_ignored() {
        let mut state = state_with(&["a"]);
        assert!(!apply_viewport(&mut state, Size::new(0.0, 0.0)));
        assert_eq!(state.viewport, Size::new(1280.0, 800.0));
    }

    #[test]
    fn missing_windows_report_their_id() {
        let mut state = state_with(&[]);
        assert_eq!(
            focus_window_internal(&mut state, "ghost"),
            Err(ReducerError::WindowNotFound("ghost".to_string()))
        );
    }
}
