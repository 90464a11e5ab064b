use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::identity::DeviceDescriptors;

static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Unique, not yet created directory below the system temp dir.
pub fn temp_dir(prefix: &str) -> PathBuf {
    let id = TEMP_COUNTER.fetch_add(1, Ordering::SeqCst);
    std::env::temp_dir().join(format!(
        "analytics-collect-{prefix}-{}-{id}",
        std::process::id()
    ))
}

/// Descriptor snapshot with every field pinned, fingerprinting to
/// `NVIDIA/4.6/Pixel 7/pixel/Android 14/8/7680/en/1700000000000`.
pub fn fixed_descriptors() -> DeviceDescriptors {
    DeviceDescriptors {
        graphics_vendor: "NVIDIA".to_string(),
        graphics_version: "4.6".to_string(),
        device_model: "Pixel 7".to_string(),
        device_name: "pixel".to_string(),
        operating_system: "Android 14".to_string(),
        processor_count: 8,
        system_memory_mb: 7680,
        system_language: "en".to_string(),
        created_at_ms: 1_700_000_000_000,
    }
}
