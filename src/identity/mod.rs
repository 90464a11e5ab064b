//! Stable per-installation device identity.
//!
//! A [`DeviceIdentityManager`] loads the device hash persisted under `_deviceHash` through a
//! [`PreferenceStore`], or derives a new one from a [`DeviceDescriptors`] snapshot and persists
//! it. The resolved value is cached in memory afterwards.
mod constants;
pub mod error;
mod fingerprint;
mod manager;
mod store;

pub use constants::{DEVICE_HASH_KEY, PREFERENCES_DIR_ENV};
pub use fingerprint::DeviceDescriptors;
pub use manager::{compute_device_hash, DescriptorSource, DeviceIdentityManager};
pub use store::{FilePreferences, IdentityStore, InMemoryPreferences, PreferenceStore};
