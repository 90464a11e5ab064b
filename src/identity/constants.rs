/// Preference key holding the persisted device hash.
pub const DEVICE_HASH_KEY: &str = "_deviceHash";

/// Separator between descriptor fields in the fingerprint string.
pub const FINGERPRINT_DELIMITER: &str = "/";

pub const PREFERENCES_FILE_NAME: &str = "preferences.json";

pub const PREFERENCES_DIR_ENV: &str = "ANALYTICS_COLLECT_PREFERENCES_DIR";

pub(crate) const UNKNOWN_DESCRIPTOR: &str = "unknown";
