//! The `persistence` module owns the settings file on disk.
//!
//! `connection get` prints it verbatim and `connection set` rewrites a single
//! key while leaving every other key exactly as it was.

pub mod settings_store;

pub use settings_store::SettingsStore;
