use crate::analytics::config::AnalyticsSettings;
use crate::analytics::constants::PROTOCOL_VERSION;
use crate::analytics::encoder::{escape_component, Fragment};

/// Fixed request prefix shared by every hit of one process:
/// `{base}?v=1&tid={tid}&cid={cid}&sr={w}x{h}&an={app}&av={version}&z=`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectorEndpoint {
    prefix: String,
}

impl CollectorEndpoint {
    pub fn new(settings: &AnalyticsSettings, tracking_id: &str, device_hash: &str) -> Self {
        let prefix = format!(
            "{base}?v={version}&tid={tid}&cid={cid}&sr={sr}&an={an}&av={av}&z=",
            base = settings.collector_url().as_str(),
            version = PROTOCOL_VERSION,
            tid = escape_component(tracking_id),
            cid = escape_component(device_hash),
            sr = settings.screen_resolution(),
            an = escape_component(settings.app_id()),
            av = escape_component(settings.app_version()),
        );
        Self { prefix }
    }

    /// Builds the endpoint when `settings` carries a tracking id.
    pub fn from_settings(settings: &AnalyticsSettings, device_hash: &str) -> Option<Self> {
        settings
            .tracking_id()
            .map(|tracking_id| Self::new(settings, tracking_id, device_hash))
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// `{prefix}{cache_buster}&{fragment}&ul={locale}`
    pub fn request_url(&self, cache_buster: u32, fragment: &Fragment, locale: &str) -> String {
        format!(
            "{}{}&{}&ul={}",
            self.prefix,
            cache_buster,
            fragment,
            escape_component(locale)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::config::{CollectorUrl, ScreenResolution};
    use crate::analytics::encoder::encode_screen_view;

    fn settings() -> AnalyticsSettings {
        AnalyticsSettings::new()
            .with_tracking_id("UA-12345-1")
            .with_app("com.example.game", "1.4.0")
            .with_screen_resolution(ScreenResolution::new(1920, 1080))
    }

    #[test]
    fn prefix_matches_wire_format() {
        let endpoint =
            CollectorEndpoint::from_settings(&settings(), "0123456789abcdef0123456789abcdef")
                .unwrap();
        assert_eq!(
            endpoint.prefix(),
            "https://www.google-analytics.com/collect?v=1&tid=UA-12345-1\
             &cid=0123456789abcdef0123456789abcdef&sr=1920x1080&an=com.example.game&av=1.4.0&z="
        );
    }

    #[test]
    fn request_url_appends_cache_buster_fragment_and_locale() {
        let endpoint = CollectorEndpoint::new(
            &settings().with_collector_url(CollectorUrl::Custom("http://localhost/collect".into())),
            "UA-12345-1",
            "cid",
        );
        let url = endpoint.request_url(4242, &encode_screen_view("Main/Menu"), "en-us");
        assert_eq!(
            url,
            "http://localhost/collect?v=1&tid=UA-12345-1&cid=cid&sr=1920x1080\
             &an=com.example.game&av=1.4.0&z=4242&t=screenview&cd=Main%2FMenu&ul=en-us"
        );
    }

    #[test]
    fn no_tracking_id_means_no_endpoint() {
        assert!(CollectorEndpoint::from_settings(&AnalyticsSettings::new(), "cid").is_none());
    }

    #[test]
    fn app_metadata_is_escaped() {
        let settings = AnalyticsSettings::new()
            .with_tracking_id("UA-1-1")
            .with_app("My App", "1.0 beta&1");
        let endpoint = CollectorEndpoint::from_settings(&settings, "cid").unwrap();
        assert!(endpoint.prefix().ends_with("&an=My%20App&av=1.0%20beta%261&z="));
    }
}
