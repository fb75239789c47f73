//! Icon layout persistence port.
//!
//! The desktop core never touches storage itself. It emits layout snapshots which the runtime
//! hands to an [`IconLayoutStore`], and it asks the same port for the saved layout on boot.

use std::{cell::RefCell, rc::Rc};

use desktop_app_contract::AppIcon;

use super::app_state::{
    build_app_state_envelope, load_app_state_with_migration, AppStateStore, AppStateStoreFuture,
    DESKTOP_ICONS_NAMESPACE,
};

/// Schema version for the persisted icon list payload.
pub const ICON_LAYOUT_SCHEMA_VERSION: u32 = 1;

/// Object-safe boxed future used by [`IconLayoutStore`] async methods.
pub type IconLayoutFuture<'a, T> = AppStateStoreFuture<'a, T>;

/// Load/save port for the desktop icon list.
pub trait IconLayoutStore {
    /// Loads the saved icon list, or `None` when nothing usable was saved.
    fn load<'a>(&'a self) -> IconLayoutFuture<'a, Result<Option<Vec<AppIcon>>, String>>;

    /// Replaces the saved icon list.
    fn save<'a>(&'a self, icons: &'a [AppIcon]) -> IconLayoutFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Layout store that forgets everything.
pub struct NoopIconLayoutStore;

impl IconLayoutStore for NoopIconLayoutStore {
    fn load<'a>(&'a self) -> IconLayoutFuture<'a, Result<Option<Vec<AppIcon>>, String>> {
        Box::pin(async { Ok(None) })
    }

    fn save<'a>(&'a self, _icons: &'a [AppIcon]) -> IconLayoutFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory layout store. Clones share the saved list, which lets tests inspect saves.
pub struct MemoryIconLayoutStore {
    inner: Rc<RefCell<Option<Vec<AppIcon>>>>,
    saves: Rc<RefCell<usize>>,
}

impl MemoryIconLayoutStore {
    /// Creates a store pre-seeded with a saved layout.
    pub fn with_saved(icons: Vec<AppIcon>) -> Self {
        let store = Self::default();
        *store.inner.borrow_mut() = Some(icons);
        store
    }

    /// Returns the last saved layout.
    pub fn saved(&self) -> Option<Vec<AppIcon>> {
        self.inner.borrow().clone()
    }

    /// Number of successful `save` calls.
    pub fn save_count(&self) -> usize {
        *self.saves.borrow()
    }
}

impl IconLayoutStore for MemoryIconLayoutStore {
    fn load<'a>(&'a self) -> IconLayoutFuture<'a, Result<Option<Vec<AppIcon>>, String>> {
        Box::pin(async move { Ok(self.inner.borrow().clone()) })
    }

    fn save<'a>(&'a self, icons: &'a [AppIcon]) -> IconLayoutFuture<'a, Result<(), String>> {
        Box::pin(async move {
            *self.inner.borrow_mut() = Some(icons.to_vec());
            *self.saves.borrow_mut() += 1;
            Ok(())
        })
    }
}

#[derive(Debug, Clone, Default)]
/// Layout store that keeps the icon list in an [`AppStateStore`] under
/// [`DESKTOP_ICONS_NAMESPACE`].
pub struct EnvelopeIconLayoutStore<S> {
    store: S,
}

impl<S: AppStateStore> EnvelopeIconLayoutStore<S> {
    /// Wraps an app-state store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the wrapped store.
    pub fn inner(&self) -> &S {
        &self.store
    }
}

impl<S: AppStateStore> IconLayoutStore for EnvelopeIconLayoutStore<S> {
    fn load<'a>(&'a self) -> IconLayoutFuture<'a, Result<Option<Vec<AppIcon>>, String>> {
        Box::pin(async move {
            // No older schema exists yet; anything else is dropped and the defaults win.
            load_app_state_with_migration(
                &self.store,
                DESKTOP_ICONS_NAMESPACE,
                ICON_LAYOUT_SCHEMA_VERSION,
                |_, _| Ok(None),
            )
            .await
        })
    }

    fn save<'a>(&'a self, icons: &'a [AppIcon]) -> IconLayoutFuture<'a, Result<(), String>> {
        Box::pin(async move {
            let envelope = build_app_state_envelope(
                DESKTOP_ICONS_NAMESPACE,
                ICON_LAYOUT_SCHEMA_VERSION,
                &icons,
            )?;
            self.store.save_app_state_envelope(&envelope).await
        })
    }
}
