//! One-time snapshot of the hardware and software descriptors a device hash is derived from.

use std::env;
use std::num::NonZeroUsize;
use std::thread;

use chrono::Utc;
use sysinfo::System;

use crate::identity::constants::{FINGERPRINT_DELIMITER, UNKNOWN_DESCRIPTOR};
use crate::platform::locale;

/// Descriptor fields in fingerprint order. Changing the order or the delimiter changes every
/// hash generated afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeviceDescriptors {
    pub graphics_vendor: String,
    pub graphics_version: String,
    pub device_model: String,
    pub device_name: String,
    pub operating_system: String,
    pub processor_count: usize,
    pub system_memory_mb: u64,
    pub system_language: String,
    pub created_at_ms: i64,
}

impl DeviceDescriptors {
    /// Collects what the current process can observe about the host.
    ///
    /// Host name, OS version and installed memory come from `sysinfo`. Graphics details are not
    /// visible to a headless process and are reported as `unknown`; hosts that know better can
    /// override them with the `with_*` helpers.
    pub fn detect() -> Self {
        let mut system = System::new();
        system.refresh_memory();

        Self {
            graphics_vendor: UNKNOWN_DESCRIPTOR.to_string(),
            graphics_version: UNKNOWN_DESCRIPTOR.to_string(),
            device_model: env::consts::ARCH.to_string(),
            device_name: System::host_name().unwrap_or_else(|| UNKNOWN_DESCRIPTOR.to_string()),
            operating_system: System::long_os_version()
                .unwrap_or_else(|| format!("{} ({})", env::consts::OS, env::consts::FAMILY)),
            processor_count: thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
            system_memory_mb: system.total_memory() / BYTES_PER_MB,
            system_language: locale::current_language(),
            created_at_ms: Utc::now().timestamp_millis(),
        }
    }

    pub fn with_graphics(mut self, vendor: impl Into<String>, version: impl Into<String>) -> Self {
        self.graphics_vendor = vendor.into();
        self.graphics_version = version.into();
        self
    }

    pub fn with_device(mut self, model: impl Into<String>, name: impl Into<String>) -> Self {
        self.device_model = model.into();
        self.device_name = name.into();
        self
    }

    pub fn with_system_memory_mb(mut self, memory_mb: u64) -> Self {
        self.system_memory_mb = memory_mb;
        self
    }

    /// Joins every descriptor with `/` in fingerprint order.
    pub fn fingerprint(&self) -> String {
        [
            self.graphics_vendor.clone(),
            self.graphics_version.clone(),
            self.device_model.clone(),
            self.device_name.clone(),
            self.operating_system.clone(),
            self.processor_count.to_string(),
            self.system_memory_mb.to_string(),
            self.system_language.clone(),
            self.created_at_ms.to_string(),
        ]
        .join(FINGERPRINT_DELIMITER)
    }
}

const BYTES_PER_MB: u64 = 1024 * 1024;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixed_descriptors;

    #[test]
    fn fingerprint_joins_fields_in_order() {
        assert_eq!(
            fixed_descriptors().fingerprint(),
            "NVIDIA/4.6/Pixel 7/pixel/Android 14/8/7680/en/1700000000000"
        );
    }

    #[test]
    fn detect_fills_every_text_field() {
        let descriptors = DeviceDescriptors::detect();
        assert!(!descriptors.graphics_vendor.is_empty());
        assert!(!descriptors.device_model.is_empty());
        assert!(!descriptors.device_name.is_empty());
        assert!(!descriptors.operating_system.is_empty());
        assert!(descriptors.processor_count >= 1);
        assert!(descriptors.system_memory_mb > 0);
        let expected_name = System::host_name().unwrap_or_else(|| UNKNOWN_DESCRIPTOR.to_string());
        assert_eq!(descriptors.device_name, expected_name);
        assert!(descriptors.created_at_ms > 0);
    }

    #[test]
    fn overrides_replace_detected_values() {
        let descriptors = DeviceDescriptors::detect()
            .with_graphics("AMD", "3.3")
            .with_device("Desk", "workstation")
            .with_system_memory_mb(16_384);
        assert_eq!(descriptors.graphics_vendor, "AMD");
        assert_eq!(descriptors.graphics_version, "3.3");
        assert_eq!(descriptors.device_model, "Desk");
        assert_eq!(descriptors.device_name, "workstation");
        assert_eq!(descriptors.system_memory_mb, 16_384);
    }
}
