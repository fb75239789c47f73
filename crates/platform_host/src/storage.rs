//! Persistence contracts: versioned app-state envelopes and the desktop icon layout port.

pub mod app_state;
pub mod icon_layout;
