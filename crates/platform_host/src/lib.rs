//! Typed host-domain contracts used by the desktop runtime.
//!
//! This crate is the boundary between the desktop core and whatever persists its state. It
//! exposes versioned app-state envelopes, the icon layout port, and time helpers. Concrete
//! durable backends implement [`AppStateStore`] or [`IconLayoutStore`] outside the core.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod storage;
pub mod time;

pub use storage::app_state::{
    build_app_state_envelope, load_app_state_with_migration, migrate_envelope_payload,
    AppStateEnvelope, AppStateStore, AppStateStoreFuture, MemoryAppStateStore, NoopAppStateStore,
    APP_STATE_ENVELOPE_VERSION, DESKTOP_ICONS_NAMESPACE,
};
pub use storage::icon_layout::{
    EnvelopeIconLayoutStore, IconLayoutFuture, IconLayoutStore, MemoryIconLayoutStore,
    NoopIconLayoutStore, ICON_LAYOUT_SCHEMA_VERSION,
};
pub use time::{next_monotonic_timestamp_ms, unix_time_ms_now};
