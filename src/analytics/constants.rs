/// Production collector endpoint.
pub const COLLECT_URL: &str = "https://www.google-analytics.com/collect";

/// Validation endpoint; accepts the same requests without recording them.
pub const DEBUG_COLLECT_URL: &str = "https://www.google-analytics.com/debug/collect";

/// Collector protocol version sent as `v`.
pub const PROTOCOL_VERSION: &str = "1";

/// Cache-buster range: lower bound inclusive, upper bound exclusive.
pub const CACHE_BUSTER_MIN: u32 = 1;
pub const CACHE_BUSTER_MAX: u32 = 99_999;

pub const TRACKING_ID_ENV: &str = "ANALYTICS_COLLECT_TRACKING_ID";
pub const APP_ID_ENV: &str = "ANALYTICS_COLLECT_APP_ID";
pub const APP_VERSION_ENV: &str = "ANALYTICS_COLLECT_APP_VERSION";
pub const SCREEN_RESOLUTION_ENV: &str = "ANALYTICS_COLLECT_SCREEN_RESOLUTION";
pub const COLLECT_URL_ENV: &str = "ANALYTICS_COLLECT_URL";
