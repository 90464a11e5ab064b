use std::fmt;
use std::sync::{Arc, Mutex};

use crate::identity::error::IdentityResult;
use crate::identity::fingerprint::DeviceDescriptors;
use crate::identity::store::{IdentityStore, PreferenceStore};
use crate::util::digest::digest128_hex;

/// Supplies the descriptor snapshot used when a new device hash has to be generated.
pub type DescriptorSource = Arc<dyn Fn() -> DeviceDescriptors + Send + Sync + 'static>;

/// Resolves the per-installation device hash: persisted value first, freshly generated otherwise.
///
/// The first successful resolution is cached for the lifetime of the manager; later calls never
/// touch the store again.
pub struct DeviceIdentityManager {
    store: IdentityStore,
    descriptors: DescriptorSource,
    cached: Mutex<Option<String>>,
}

impl fmt::Debug for DeviceIdentityManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceIdentityManager")
            .field("store", &self.store)
            .field("cached", &self.cached.lock().unwrap().is_some())
            .finish()
    }
}

impl DeviceIdentityManager {
    pub fn new(preferences: Arc<dyn PreferenceStore>) -> Self {
        Self::with_store(IdentityStore::new(preferences))
    }

    pub fn with_store(store: IdentityStore) -> Self {
        Self {
            store,
            descriptors: Arc::new(DeviceDescriptors::detect),
            cached: Mutex::new(None),
        }
    }

    /// Replaces the descriptor snapshot used for generation (e.g. to report graphics details).
    pub fn with_descriptor_source<F>(mut self, source: F) -> Self
    where
        F: Fn() -> DeviceDescriptors + Send + Sync + 'static,
    {
        self.descriptors = Arc::new(source);
        self
    }

    /// Returns the device hash, loading or generating it on first use.
    ///
    /// # Errors
    ///
    /// Propagates any failure of the underlying preference store while reading or persisting the
    /// value. Nothing is cached in that case, so a later call retries.
    pub fn device_hash(&self) -> IdentityResult<String> {
        let mut cached = self.cached.lock().unwrap();
        if let Some(hash) = cached.as_ref() {
            return Ok(hash.clone());
        }

        let hash = match self.store.load()? {
            Some(persisted) => {
                log::debug!("Loaded persisted device hash from `{}`", self.store.key());
                persisted
            }
            None => {
                let generated = compute_device_hash(&(self.descriptors)());
                self.store.save(&generated)?;
                log::info!("New device hash generated: {generated}");
                generated
            }
        };

        *cached = Some(hash.clone());
        Ok(hash)
    }

    /// Returns the hash if it has already been resolved by this manager.
    pub fn cached_hash(&self) -> Option<String> {
        self.cached.lock().unwrap().clone()
    }

    /// Forgets the persisted and cached hash; the next [`device_hash`](Self::device_hash) call
    /// generates a new one.
    pub fn reset(&self) -> IdentityResult<()> {
        let mut cached = self.cached.lock().unwrap();
        self.store.clear()?;
        *cached = None;
        Ok(())
    }
}

/// Digest of the descriptor fingerprint, as 32 lowercase hex characters.
pub fn compute_device_hash(descriptors: &DeviceDescriptors) -> String {
    digest128_hex(descriptors.fingerprint())
}
