//! Runtime facade wiring the desktop grid, the window manager reducer, the app registry, and the
//! icon layout port together.
//!
//! The shell feeds raw input into [`DesktopRuntime`], then awaits [`DesktopRuntime::flush_effects`]
//! to persist icon changes and collect the effects it must apply itself (focusing inputs,
//! lifecycle hooks).

use std::collections::VecDeque;

use desktop_app_contract::AppIcon;
use platform_host::IconLayoutStore;

use crate::{
    apps::AppRegistry,
    config::DesktopConfig,
    desktop_grid::{DesktopEvent, DesktopGrid},
    geometry::Size,
    model::{DesktopState, InteractionState},
    persistence::{load_icon_layout, persist_icon_layout},
    reducer::{reduce_desktop, DesktopAction, RuntimeEffect},
    window_geometry::work_area,
};

/// Desktop core state plus its injected icon layout store.
pub struct DesktopRuntime<S: IconLayoutStore> {
    state: DesktopState,
    interaction: InteractionState,
    grid: DesktopGrid,
    registry: AppRegistry,
    store: S,
    effects: VecDeque<RuntimeEffect>,
}

impl<S: IconLayoutStore> DesktopRuntime<S> {
    /// Creates a runtime with the bundled app registry and the default viewport.
    pub fn new(config: &DesktopConfig, store: S) -> Self {
        Self::with_registry(config, AppRegistry::builtin(), store)
    }

    /// Creates a runtime with a caller-supplied registry.
    pub fn with_registry(config: &DesktopConfig, registry: AppRegistry, store: S) -> Self {
        let state = DesktopState {
            settings: config.window.clone(),
            ..DesktopState::default()
        };
        let mut grid = DesktopGrid::new(config);
        grid.resize_container(work_area(state.viewport, &state.settings));
        Self {
            state,
            interaction: InteractionState::default(),
            grid,
            registry,
            store,
            effects: VecDeque::new(),
        }
    }

    /// Window manager state.
    pub fn state(&self) -> &DesktopState {
        &self.state
    }

    /// Active window gesture, if any.
    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    /// Desktop icon grid.
    pub fn grid(&self) -> &DesktopGrid {
        &self.grid
    }

    /// App registry used for open requests and default icons.
    pub fn registry(&self) -> &AppRegistry {
        &self.registry
    }

    /// Injected icon layout store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Effects queued since the last flush.
    pub fn pending_effects(&self) -> impl Iterator<Item = &RuntimeEffect> {
        self.effects.iter()
    }

    /// Loads the saved icon layout, merges it with the registry defaults, and installs it.
    pub async fn boot(&mut self) {
        let defaults = self.registry.default_icons();
        let icons = load_icon_layout(&self.store, &defaults).await;
        let events = match self.grid.sync_icons(icons) {
            Ok(events) => events,
            Err(err) => {
                leptos::logging::warn!("saved icon layout rejected: {err}");
                match self.grid.sync_icons(defaults) {
                    Ok(events) => events,
                    Err(err) => {
                        leptos::logging::warn!("default icon layout rejected: {err}");
                        Vec::new()
                    }
                }
            }
        };
        self.handle_desktop_events(events);
    }

    /// Runs the reducer and queues its effects. Returns `false` when the action was rejected.
    pub fn dispatch(&mut self, action: DesktopAction) -> bool {
        match reduce_desktop(&mut self.state, &mut self.interaction, action) {
            Ok(effects) => {
                self.effects.extend(effects);
                true
            }
            Err(err) => {
                leptos::logging::warn!("desktop action rejected: {err}");
                false
            }
        }
    }

    /// Opens (or focuses) the window for a desktop icon. Returns `false` for unknown icons.
    pub fn request_open(&mut self, icon_id: &str) -> bool {
        let Some(icon) = self.grid.icon(icon_id) else {
            return false;
        };
        let request = self.registry.open_request(icon);
        self.dispatch(DesktopAction::OpenWindow(request))
    }

    /// Applies a grid operation and routes the events it produced.
    ///
    /// Returns the events the shell renders itself (selection, context menus, renames).
    pub fn with_grid<F>(&mut self, op: F) -> Vec<DesktopEvent>
    where
        F: FnOnce(&mut DesktopGrid) -> Vec<DesktopEvent>,
    {
        let events = op(&mut self.grid);
        self.handle_desktop_events(events)
    }

    /// Routes grid events: open requests become window actions and icon changes become
    /// [`RuntimeEffect::PersistIcons`]. Everything else is handed back to the caller.
    pub fn handle_desktop_events(&mut self, events: Vec<DesktopEvent>) -> Vec<DesktopEvent> {
        let mut passthrough = Vec::new();
        for event in events {
            match event {
                DesktopEvent::OpenRequested(id) => {
                    self.request_open(&id);
                }
                DesktopEvent::IconsChanged(icons) => self.queue_persist(icons),
                other => passthrough.push(other),
            }
        }
        passthrough
    }

    /// Resizes the desktop: the window manager gets the full viewport and the icon grid the
    /// area above the taskbar.
    pub fn resize_viewport(&mut self, viewport: Size) -> bool {
        if !viewport.is_usable() || !self.dispatch(DesktopAction::ViewportResized { viewport }) {
            return false;
        }
        self.grid
            .resize_container(work_area(self.state.viewport, &self.state.settings))
    }

    /// Drains queued effects, saving icon layouts through the store.
    ///
    /// Only the newest pending layout is saved. Returns the remaining effects in order.
    pub async fn flush_effects(&mut self) -> Vec<RuntimeEffect> {
        let mut latest_icons: Option<Vec<AppIcon>> = None;
        let mut shell_effects = Vec::new();
        while let Some(effect) = self.effects.pop_front() {
            match effect {
                RuntimeEffect::PersistIcons(icons) => latest_icons = Some(icons),
                other => shell_effects.push(other),
            }
        }
        if let Some(icons) = latest_icons {
            if let Err(err) = persist_icon_layout(&self.store, &icons).await {
                leptos::logging::warn!("icon layout save failed: {err}");
            }
        }
        shell_effects
    }

    fn queue_persist(&mut self, icons: Vec<AppIcon>) {
        // A newer layout supersedes any queued one.
        self.effects
            .retain(|effect| !matches!(effect, RuntimeEffect::PersistIcons(_)));
        self.effects.push_back(RuntimeEffect::PersistIcons(icons));
    }
}
