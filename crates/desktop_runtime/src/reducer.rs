//! Reducer actions, side-effect intents, and transition logic for the window manager.

use desktop_app_contract::{AppIcon, AppLifecycleEvent};
use thiserror::Error;

use crate::{
    geometry::{Point, Size},
    model::{
        DesktopState, DragSession, InteractionState, OpenWindowRequest, ResizeEdge,
        ResizeSession, WindowPatch, WindowRecord, WindowRect,
    },
    window_geometry::{clamp_position, move_rect, place_new_window, resize_rect, resolve_size},
    window_manager::{
        apply_viewport, close_window, find_window_mut, focus_window_internal, minimize_window,
        restore_window, toggle_maximize, update_window,
    },
};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`] to mutate [`DesktopState`].
pub enum DesktopAction {
    /// Open a window, or focus the existing window with the same id.
    OpenWindow(OpenWindowRequest),
    /// Close a window by id.
    CloseWindow {
        /// Window to close.
        window_id: String,
    },
    /// Focus (and raise) a window by id.
    FocusWindow {
        /// Window to focus.
        window_id: String,
    },
    /// Minimize a window.
    MinimizeWindow {
        /// Window to minimize.
        window_id: String,
    },
    /// Restore a minimized or maximized window and focus it.
    RestoreWindow {
        /// Window to restore.
        window_id: String,
    },
    /// Maximize a window, or restore its pre-maximize geometry.
    ToggleMaximize {
        /// Window to toggle.
        window_id: String,
    },
    /// Merge position, size, or minimized state into a window.
    UpdateWindow {
        /// Window to update.
        window_id: String,
        /// Fields to merge.
        patch: WindowPatch,
    },
    /// Toggle taskbar behavior for a window (focus, minimize, or restore).
    ToggleTaskbarWindow {
        /// Window associated with the taskbar button.
        window_id: String,
    },
    /// Begin dragging a window by its title bar.
    BeginMove {
        /// Window being dragged.
        window_id: String,
        /// Pointer position at drag start.
        pointer: Point,
    },
    /// Update an in-progress window drag.
    UpdateMove {
        /// Current pointer position.
        pointer: Point,
    },
    /// End the active window drag.
    EndMove,
    /// Begin resizing a window.
    BeginResize {
        /// Window being resized.
        window_id: String,
        /// Edge or corner being dragged.
        edge: ResizeEdge,
        /// Pointer position at resize start.
        pointer: Point,
    },
    /// Update an in-progress window resize.
    UpdateResize {
        /// Current pointer position.
        pointer: Point,
    },
    /// End the active window resize.
    EndResize,
    /// The desktop viewport changed size.
    ViewportResized {
        /// New viewport size.
        viewport: Size,
    },
}

#[derive(Debug, Clone, PartialEq)]
/// Side-effect intents emitted by [`reduce_desktop`] and the runtime for the shell to execute.
pub enum RuntimeEffect {
    /// Move keyboard focus into the newly focused window's primary input.
    FocusWindowInput(String),
    /// A window changed lifecycle state.
    Lifecycle {
        /// Affected window.
        window_id: String,
        /// What happened.
        event: AppLifecycleEvent,
    },
    /// An open request hit a window that already exists.
    AlreadyRunning {
        /// Existing window.
        window_id: String,
    },
    /// Save the icon layout through the injected store.
    PersistIcons(Vec<AppIcon>),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reducer errors for invalid actions.
pub enum ReducerError {
    /// The target window id was not found in the current state.
    #[error("window `{0}` not found")]
    WindowNotFound(String),
}

/// Applies a [`DesktopAction`] to the window manager state and collects resulting side effects.
///
/// Focus changes are reported as [`AppLifecycleEvent::Blurred`] / [`AppLifecycleEvent::Focused`]
/// pairs after the action's own lifecycle events. Gesture updates without a matching start are
/// ignored, as are non-finite pointer coordinates.
///
/// # Errors
///
/// Returns [`ReducerError::WindowNotFound`] when an action references a window that is not present.
pub fn reduce_desktop(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    action: DesktopAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let focused_before = state.focused_window_id().map(str::to_string);
    let mut effects = Vec::new();
    match action {
        DesktopAction::OpenWindow(req) => {
            if state.window(&req.id).is_some() {
                focus_window_internal(state, &req.id)?;
                effects.push(RuntimeEffect::AlreadyRunning {
                    window_id: req.id.clone(),
                });
                effects.push(RuntimeEffect::FocusWindowInput(req.id));
            } else {
                let record = new_window_record(state, req);
                let window_id = record.id.clone();
                state.windows.push(record);
                focus_window_internal(state, &window_id)?;
                effects.push(lifecycle(&window_id, AppLifecycleEvent::Opened));
                effects.push(RuntimeEffect::FocusWindowInput(window_id));
            }
        }
        DesktopAction::CloseWindow { window_id } => {
            close_window(state, &window_id)?;
            end_gestures_for(interaction, &window_id);
            effects.push(lifecycle(&window_id, AppLifecycleEvent::Closed));
        }
        DesktopAction::FocusWindow { window_id } => {
            let was_minimized = state.window(&window_id).is_some_and(|w| w.minimized);
            focus_window_internal(state, &window_id)?;
            if was_minimized {
                effects.push(lifecycle(&window_id, AppLifecycleEvent::Restored));
            }
            effects.push(RuntimeEffect::FocusWindowInput(window_id));
        }
        DesktopAction::MinimizeWindow { window_id } => {
            if minimize_window(state, &window_id)? {
                end_gestures_for(interaction, &window_id);
                effects.push(lifecycle(&window_id, AppLifecycleEvent::Minimized));
            }
        }
        DesktopAction::RestoreWindow { window_id } => {
            if restore_window(state, &window_id)? {
                effects.push(lifecycle(&window_id, AppLifecycleEvent::Restored));
            }
            effects.push(RuntimeEffect::FocusWindowInput(window_id));
        }
        DesktopAction::ToggleMaximize { window_id } => {
            let event = if toggle_maximize(state, &window_id)? {
                AppLifecycleEvent::Maximized
            } else {
                AppLifecycleEvent::Restored
            };
            end_gestures_for(interaction, &window_id);
            effects.push(lifecycle(&window_id, event));
        }
        DesktopAction::UpdateWindow { window_id, patch } => {
            let was_minimized = find_window_mut(state, &window_id)?.minimized;
            update_window(state, &window_id, patch)?;
            let is_minimized = state.window(&window_id).is_some_and(|w| w.minimized);
            if is_minimized {
                end_gestures_for(interaction, &window_id);
            }
            if is_minimized != was_minimized {
                let event = if is_minimized {
                    AppLifecycleEvent::Minimized
                } else {
                    AppLifecycleEvent::Restored
                };
                effects.push(lifecycle(&window_id, event));
            }
        }
        DesktopAction::ToggleTaskbarWindow { window_id } => {
            let focused = state.focused_window_id() == Some(window_id.as_str());
            let minimized = state
                .window(&window_id)
                .map(|w| w.minimized)
                .ok_or_else(|| ReducerError::WindowNotFound(window_id.clone()))?;
            let follow_up = if minimized {
                DesktopAction::RestoreWindow { window_id }
            } else if focused {
                DesktopAction::MinimizeWindow { window_id }
            } else {
                DesktopAction::FocusWindow { window_id }
            };
            // The nested call reports its own focus changes.
            return reduce_desktop(state, interaction, follow_up);
        }
        DesktopAction::BeginMove { window_id, pointer } => {
            let window = find_window_mut(state, &window_id)?;
            let movable = !window.maximized && !window.minimized;
            let rect_start = window.rect;
            if interaction.is_idle() && movable && pointer.is_finite() {
                focus_window_internal(state, &window_id)?;
                interaction.dragging = Some(DragSession {
                    window_id,
                    pointer_start: pointer,
                    rect_start,
                });
            }
        }
        DesktopAction::UpdateMove { pointer } => {
            if let Some(session) = interaction.dragging.as_ref().filter(|_| pointer.is_finite()) {
                let dx = pointer.x - session.pointer_start.x;
                let dy = pointer.y - session.pointer_start.y;
                let rect = move_rect(session.rect_start, dx, dy, state.viewport, &state.settings);
                match find_window_mut(state, &session.window_id) {
                    Ok(window) => window.rect = rect,
                    Err(_) => interaction.dragging = None,
                }
            }
        }
        DesktopAction::EndMove => {
            interaction.dragging = None;
        }
        DesktopAction::BeginResize {
            window_id,
            edge,
            pointer,
        } => {
            let window = find_window_mut(state, &window_id)?;
            let resizable = !window.maximized && !window.minimized;
            let rect_start = window.rect;
            if interaction.is_idle() && resizable && pointer.is_finite() {
                focus_window_internal(state, &window_id)?;
                interaction.resizing = Some(ResizeSession {
                    window_id,
                    edge,
                    pointer_start: pointer,
                    rect_start,
                });
            }
        }
        DesktopAction::UpdateResize { pointer } => {
            if let Some(session) = interaction.resizing.as_ref().filter(|_| pointer.is_finite()) {
                let dx = pointer.x - session.pointer_start.x;
                let dy = pointer.y - session.pointer_start.y;
                let rect = resize_rect(
                    session.rect_start,
                    session.edge,
                    dx,
                    dy,
                    state.viewport,
                    &state.settings,
                );
                match find_window_mut(state, &session.window_id) {
                    Ok(window) => window.rect = rect,
                    Err(_) => interaction.resizing = None,
                }
            }
        }
        DesktopAction::EndResize => {
            interaction.resizing = None;
        }
        DesktopAction::ViewportResized { viewport } => {
            apply_viewport(state, viewport);
        }
    }

    push_focus_changes(state, focused_before.as_deref(), &mut effects);
    Ok(effects)
}

fn new_window_record(state: &mut DesktopState, req: OpenWindowRequest) -> WindowRecord {
    let default_size = Size::new(state.settings.default_width, state.settings.default_height);
    let size = resolve_size(
        req.width.as_ref(),
        req.height.as_ref(),
        default_size,
        state.viewport,
        &state.settings,
    );
    let ordinal = state.opened_count;
    state.opened_count = state.opened_count.saturating_add(1);

    let rect = match (req.x, req.y) {
        (Some(x), Some(y)) if x.is_finite() && y.is_finite() => clamp_position(
            WindowRect::new(x, y, size.width, size.height),
            state.viewport,
            &state.settings,
        ),
        _ => place_new_window(size, ordinal, state.viewport, &state.settings),
    };

    WindowRecord {
        title: req.title.unwrap_or_else(|| req.id.clone()),
        id: req.id,
        rect,
        restore_rect: None,
        z_index: 0,
        is_focused: false,
        minimized: false,
        maximized: false,
        content: req.content,
    }
}

fn end_gestures_for(interaction: &mut InteractionState, window_id: &str) {
    if interaction
        .dragging
        .as_ref()
        .is_some_and(|s| s.window_id == window_id)
    {
        interaction.dragging = None;
    }
    if interaction
        .resizing
        .as_ref()
        .is_some_and(|s| s.window_id == window_id)
    {
        interaction.resizing = None;
    }
}

fn lifecycle(window_id: &str, event: AppLifecycleEvent) -> RuntimeEffect {
    RuntimeEffect::Lifecycle {
        window_id: window_id.to_string(),
        event,
    }
}

fn push_focus_changes(
    state: &DesktopState,
    focused_before: Option<&str>,
    effects: &mut Vec<RuntimeEffect>,
) {
    let focused_after = state.focused_window_id();
    if focused_before == focused_after {
        return;
    }
    if let Some(previous) = focused_before.filter(|id| state.window(id).is_some()) {
        effects.push(lifecycle(previous, AppLifecycleEvent::Blurred));
    }
    if let Some(current) = focused_after {
        effects.push(lifecycle(current, AppLifecycleEvent::Focused));
    }
}
