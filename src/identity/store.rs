use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::identity::constants::{DEVICE_HASH_KEY, PREFERENCES_DIR_ENV, PREFERENCES_FILE_NAME};
use crate::identity::error::{internal_error, storage_error, IdentityResult};

/// String key/value surface the identity subsystem persists through.
///
/// Implementations must be safe to share between threads; the identity manager only ever
/// touches a single key.
pub trait PreferenceStore: Send + Sync {
    fn get_string(&self, key: &str) -> IdentityResult<Option<String>>;
    fn set_string(&self, key: &str, value: &str) -> IdentityResult<()>;
    fn remove(&self, key: &str) -> IdentityResult<()>;
}

/// Preferences kept in a single JSON object on disk (`preferences.json` inside `base_dir`).
#[derive(Clone, Debug)]
pub struct FilePreferences {
    base_dir: Arc<PathBuf>,
    write_lock: Arc<Mutex<()>>,
}

impl FilePreferences {
    pub fn new(base_dir: PathBuf) -> IdentityResult<Self> {
        fs::create_dir_all(&base_dir).map_err(|err| {
            storage_error(format!(
                "Failed to create preferences directory '{}': {}",
                base_dir.display(),
                err
            ))
        })?;
        Ok(Self {
            base_dir: Arc::new(base_dir),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Uses `ANALYTICS_COLLECT_PREFERENCES_DIR` when set, otherwise `.analytics-collect` in the
    /// working directory.
    pub fn from_env() -> IdentityResult<Self> {
        if let Ok(dir) = std::env::var(PREFERENCES_DIR_ENV) {
            return Self::new(PathBuf::from(dir));
        }

        let dir = std::env::current_dir()
            .map_err(|err| internal_error(format!("Failed to obtain working directory: {}", err)))?
            .join(".analytics-collect");
        Self::new(dir)
    }

    pub fn path(&self) -> PathBuf {
        self.base_dir.join(PREFERENCES_FILE_NAME)
    }

    fn read_map(&self, path: &Path) -> IdentityResult<BTreeMap<String, String>> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let bytes = fs::read(path).map_err(|err| {
            storage_error(format!(
                "Failed to read preferences '{}': {}",
                path.display(),
                err
            ))
        })?;
        serde_json::from_slice(&bytes).map_err(|err| {
            storage_error(format!(
                "Failed to parse preferences '{}': {}",
                path.display(),
                err
            ))
        })
    }

    fn write_map(&self, path: &Path, map: &BTreeMap<String, String>) -> IdentityResult<()> {
        let bytes = serde_json::to_vec_pretty(map).map_err(|err| {
            internal_error(format!(
                "Failed to serialize preferences '{}': {}",
                path.display(),
                err
            ))
        })?;
        fs::write(path, bytes).map_err(|err| {
            storage_error(format!(
                "Failed to write preferences '{}': {}",
                path.display(),
                err
            ))
        })
    }
}

impl PreferenceStore for FilePreferences {
    fn get_string(&self, key: &str) -> IdentityResult<Option<String>> {
        let _guard = self.write_lock.lock().unwrap();
        let path = self.path();
        Ok(self.read_map(&path)?.remove(key))
    }

    fn set_string(&self, key: &str, value: &str) -> IdentityResult<()> {
        let _guard = self.write_lock.lock().unwrap();
        let path = self.path();
        let mut map = self.read_map(&path)?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&path, &map)
    }

    fn remove(&self, key: &str) -> IdentityResult<()> {
        let _guard = self.write_lock.lock().unwrap();
        let path = self.path();
        let mut map = self.read_map(&path)?;
        if map.remove(key).is_some() {
            self.write_map(&path, &map)?;
        }
        Ok(())
    }
}

/// Process-local preferences, mostly useful for tests and hosts without a writable disk.
#[derive(Clone, Debug, Default)]
pub struct InMemoryPreferences {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl InMemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for InMemoryPreferences {
    fn get_string(&self, key: &str) -> IdentityResult<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn set_string(&self, key: &str, value: &str) -> IdentityResult<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> IdentityResult<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

/// Reads and writes the one named value backing the device identity.
#[derive(Clone)]
pub struct IdentityStore {
    preferences: Arc<dyn PreferenceStore>,
    key: String,
}

impl fmt::Debug for IdentityStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityStore")
            .field("key", &self.key)
            .finish()
    }
}

impl IdentityStore {
    pub fn new(preferences: Arc<dyn PreferenceStore>) -> Self {
        Self::with_key(preferences, DEVICE_HASH_KEY)
    }

    pub fn with_key(preferences: Arc<dyn PreferenceStore>, key: impl Into<String>) -> Self {
        Self {
            preferences,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the stored value, treating an empty string as absent.
    pub fn load(&self) -> IdentityResult<Option<String>> {
        Ok(self
            .preferences
            .get_string(&self.key)?
            .filter(|value| !value.is_empty()))
    }

    pub fn save(&self, value: &str) -> IdentityResult<()> {
        self.preferences.set_string(&self.key, value)
    }

    pub fn clear(&self) -> IdentityResult<()> {
        self.preferences.remove(&self.key)
    }
}
