use std::env;
use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::analytics::constants::{
    APP_ID_ENV, APP_VERSION_ENV, COLLECT_URL, COLLECT_URL_ENV, DEBUG_COLLECT_URL,
    SCREEN_RESOLUTION_ENV, TRACKING_ID_ENV,
};
use crate::analytics::error::{invalid_argument, AnalyticsError, AnalyticsResult};

/// Screen size reported as `sr={width}x{height}`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScreenResolution {
    pub width: u32,
    pub height: u32,
}

impl ScreenResolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for ScreenResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for ScreenResolution {
    type Err = AnalyticsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (width, height) = value.trim().split_once(['x', 'X']).ok_or_else(|| {
            invalid_argument(format!("screen resolution `{value}` is not WIDTHxHEIGHT"))
        })?;
        let parse = |part: &str| {
            part.trim().parse::<u32>().map_err(|err| {
                invalid_argument(format!("invalid screen resolution `{value}`: {err}"))
            })
        };
        Ok(Self::new(parse(width)?, parse(height)?))
    }
}

/// Collector endpoints requests can be sent to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CollectorUrl {
    /// Production collection endpoint: <https://www.google-analytics.com/collect>
    #[default]
    Collect,
    /// Validation endpoint: <https://www.google-analytics.com/debug/collect>
    DebugCollect,
    /// Custom endpoint (self-hosted collectors, tests).
    Custom(String),
}

impl CollectorUrl {
    pub fn as_str(&self) -> &str {
        match self {
            CollectorUrl::Collect => COLLECT_URL,
            CollectorUrl::DebugCollect => DEBUG_COLLECT_URL,
            CollectorUrl::Custom(url) => url,
        }
    }

    /// Checks that the URL is absolute http(s) without a query or fragment of its own.
    pub fn validate(&self) -> AnalyticsResult<()> {
        let raw = self.as_str();
        let parsed = Url::parse(raw)
            .map_err(|err| invalid_argument(format!("invalid collector URL `{raw}`: {err}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid_argument(format!(
                "collector URL `{raw}` must use http or https"
            )));
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(invalid_argument(format!(
                "collector URL `{raw}` must not carry a query or fragment"
            )));
        }
        Ok(())
    }
}

/// Static configuration of the collector endpoint.
///
/// Without a tracking id the dispatcher still runs but discards every event.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnalyticsSettings {
    tracking_id: Option<String>,
    app_id: String,
    app_version: String,
    screen_resolution: ScreenResolution,
    collector_url: CollectorUrl,
}

impl AnalyticsSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads overrides from the `ANALYTICS_COLLECT_*` environment variables.
    pub fn from_env() -> AnalyticsResult<Self> {
        Self::new().with_overrides(|key| env::var(key).ok())
    }

    /// Applies overrides resolved through `lookup` (keyed by the `ANALYTICS_COLLECT_*` names).
    pub fn with_overrides<F>(mut self, lookup: F) -> AnalyticsResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(tracking_id) = lookup(TRACKING_ID_ENV) {
            self = self.with_tracking_id(tracking_id);
        }
        if let Some(app_id) = lookup(APP_ID_ENV) {
            self.app_id = app_id;
        }
        if let Some(app_version) = lookup(APP_VERSION_ENV) {
            self.app_version = app_version;
        }
        if let Some(resolution) = lookup(SCREEN_RESOLUTION_ENV) {
            self.screen_resolution = resolution.parse()?;
        }
        if let Some(url) = lookup(COLLECT_URL_ENV).filter(|url| !url.trim().is_empty()) {
            self.collector_url = CollectorUrl::Custom(url);
        }
        Ok(self)
    }

    /// Sets the tracking id; a blank value clears it.
    pub fn with_tracking_id(mut self, tracking_id: impl Into<String>) -> Self {
        let tracking_id = tracking_id.into();
        self.tracking_id = if tracking_id.trim().is_empty() {
            None
        } else {
            Some(tracking_id)
        };
        self
    }

    pub fn with_app(mut self, app_id: impl Into<String>, app_version: impl Into<String>) -> Self {
        self.app_id = app_id.into();
        self.app_version = app_version.into();
        self
    }

    pub fn with_screen_resolution(mut self, resolution: ScreenResolution) -> Self {
        self.screen_resolution = resolution;
        self
    }

    pub fn with_collector_url(mut self, collector_url: CollectorUrl) -> Self {
        self.collector_url = collector_url;
        self
    }

    pub fn tracking_id(&self) -> Option<&str> {
        self.tracking_id.as_deref()
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn app_version(&self) -> &str {
        &self.app_version
    }

    pub fn screen_resolution(&self) -> ScreenResolution {
        self.screen_resolution
    }

    pub fn collector_url(&self) -> &CollectorUrl {
        &self.collector_url
    }

    pub fn is_tracking_configured(&self) -> bool {
        self.tracking_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(entries: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = entries
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn parses_screen_resolution() {
        assert_eq!(
            "1920x1080".parse::<ScreenResolution>().unwrap(),
            ScreenResolution::new(1920, 1080)
        );
        assert_eq!(
            " 800X600 ".parse::<ScreenResolution>().unwrap(),
            ScreenResolution::new(800, 600)
        );
        assert_eq!(ScreenResolution::new(1280, 720).to_string(), "1280x720");
    }

    #[test]
    fn rejects_malformed_screen_resolution() {
        let err = "1920".parse::<ScreenResolution>().unwrap_err();
        assert_eq!(err.code_str(), "analytics/invalid-argument");
        assert!("wide x tall".parse::<ScreenResolution>().is_err());
        assert!("-1x10".parse::<ScreenResolution>().is_err());
    }

    #[test]
    fn blank_tracking_id_is_not_configured() {
        let settings = AnalyticsSettings::new().with_tracking_id("   ");
        assert_eq!(settings.tracking_id(), None);
        assert!(!settings.is_tracking_configured());

        let settings = settings.with_tracking_id("UA-12345-1");
        assert_eq!(settings.tracking_id(), Some("UA-12345-1"));
        assert!(settings.is_tracking_configured());
    }

    #[test]
    fn overrides_populate_every_field() {
        let settings = AnalyticsSettings::new()
            .with_overrides(lookup(&[
                (TRACKING_ID_ENV, "UA-1-1"),
                (APP_ID_ENV, "com.example.app"),
                (APP_VERSION_ENV, "2.0.1"),
                (SCREEN_RESOLUTION_ENV, "1024x768"),
                (COLLECT_URL_ENV, "http://localhost:9000/collect"),
            ]))
            .unwrap();

        assert_eq!(settings.tracking_id(), Some("UA-1-1"));
        assert_eq!(settings.app_id(), "com.example.app");
        assert_eq!(settings.app_version(), "2.0.1");
        assert_eq!(settings.screen_resolution(), ScreenResolution::new(1024, 768));
        assert_eq!(
            settings.collector_url(),
            &CollectorUrl::Custom("http://localhost:9000/collect".into())
        );
    }

    #[test]
    fn missing_overrides_keep_existing_values() {
        let settings = AnalyticsSettings::new()
            .with_tracking_id("UA-2-2")
            .with_app("app", "1.0")
            .with_overrides(lookup(&[]))
            .unwrap();
        assert_eq!(settings.tracking_id(), Some("UA-2-2"));
        assert_eq!(settings.app_id(), "app");
        assert_eq!(settings.collector_url(), &CollectorUrl::Collect);
    }

    #[test]
    fn invalid_resolution_override_is_reported() {
        let err = AnalyticsSettings::new()
            .with_overrides(lookup(&[(SCREEN_RESOLUTION_ENV, "huge")]))
            .unwrap_err();
        assert_eq!(err.code_str(), "analytics/invalid-argument");
    }

    #[test]
    fn collector_url_validation() {
        assert!(CollectorUrl::Collect.validate().is_ok());
        assert!(CollectorUrl::DebugCollect.validate().is_ok());
        assert!(CollectorUrl::Custom("http://127.0.0.1:8080/collect".into())
            .validate()
            .is_ok());
        assert!(CollectorUrl::Custom("not a url".into()).validate().is_err());
        assert!(CollectorUrl::Custom("ftp://example.com/collect".into())
            .validate()
            .is_err());
        assert!(CollectorUrl::Custom("https://example.com/collect?v=1".into())
            .validate()
            .is_err());
    }
}
