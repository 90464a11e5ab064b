use std::fmt;
use std::sync::{Arc, Mutex};

use crate::analytics::config::AnalyticsSettings;
use crate::analytics::dispatcher::{DispatchMonitor, DispatchState, DispatchStats, Dispatcher};
use crate::analytics::encoder::Hit;
use crate::analytics::endpoint::CollectorEndpoint;
use crate::analytics::error::AnalyticsResult;
use crate::analytics::queue::{self, EventQueue};
use crate::analytics::transport::CollectorTransport;
use crate::identity::DeviceIdentityManager;

/// Tracking facade. Cheap to clone; every clone feeds the same queue.
///
/// Tracking calls encode their arguments and enqueue the resulting fragment. They never block
/// on the network and never fail; delivery happens on the [`Dispatcher`] returned alongside.
#[derive(Clone)]
pub struct Analytics {
    inner: Arc<AnalyticsInner>,
}

struct AnalyticsInner {
    settings: AnalyticsSettings,
    queue: EventQueue,
    device_hash: Option<String>,
    current_screen: Mutex<Option<String>>,
    monitor: DispatchMonitor,
}

impl fmt::Debug for Analytics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Analytics")
            .field("tracking_id", &self.inner.settings.tracking_id())
            .field("device_hash", &self.inner.device_hash)
            .field("pending", &self.inner.queue.len())
            .finish()
    }
}

impl Analytics {
    /// Builds the facade and the dispatcher that drains it.
    ///
    /// The device hash is resolved only when a tracking id is configured; without one the
    /// dispatcher discards every fragment and no identity is touched.
    ///
    /// # Errors
    ///
    /// Returns `analytics/invalid-argument` for an unusable collector URL and
    /// `analytics/identity-unavailable` when the device hash cannot be loaded or persisted.
    pub fn initialize(
        settings: AnalyticsSettings,
        identity: &DeviceIdentityManager,
        transport: Arc<dyn CollectorTransport>,
    ) -> AnalyticsResult<(Self, Dispatcher)> {
        settings.collector_url().validate()?;

        let (device_hash, endpoint) = match settings.tracking_id() {
            Some(tracking_id) => {
                let device_hash = identity.device_hash()?;
                let endpoint = CollectorEndpoint::new(&settings, tracking_id, &device_hash);
                (Some(device_hash), Some(endpoint))
            }
            None => {
                #[cfg(debug_assertions)]
                log::warn!("No analytics tracking id configured; tracked events will be discarded");
                (None, None)
            }
        };

        let (queue, receiver) = queue::unbounded();
        let dispatcher = Dispatcher::new(receiver, endpoint, transport);
        let inner = AnalyticsInner {
            settings,
            queue,
            device_hash,
            current_screen: Mutex::new(None),
            monitor: dispatcher.monitor(),
        };

        Ok((
            Self {
                inner: Arc::new(inner),
            },
            dispatcher,
        ))
    }

    /// [`initialize`](Self::initialize) followed by spawning the dispatch loop in the background.
    pub fn start(
        settings: AnalyticsSettings,
        identity: &DeviceIdentityManager,
        transport: Arc<dyn CollectorTransport>,
    ) -> AnalyticsResult<Self> {
        let (analytics, dispatcher) = Self::initialize(settings, identity, transport)?;
        dispatcher.spawn();
        Ok(analytics)
    }

    pub fn settings(&self) -> &AnalyticsSettings {
        &self.inner.settings
    }

    /// Whether a tracking id is configured and events are actually delivered.
    pub fn is_ready(&self) -> bool {
        self.inner.settings.is_tracking_configured()
    }

    /// Device hash sent as `cid`, or `None` when no tracking id is configured.
    pub fn device_hash(&self) -> Option<&str> {
        self.inner.device_hash.as_deref()
    }

    pub fn track(&self, hit: Hit) {
        if !self.inner.queue.enqueue(hit.encode()) {
            log::debug!("dispatcher is gone; dropped {} hit", hit.hit_type());
        }
    }

    pub fn track_screen(&self, screen_name: &str) {
        self.track(Hit::screen_view(screen_name));
    }

    /// Remembers the screen reported by [`track_current_screen`](Self::track_current_screen).
    pub fn set_current_screen(&self, screen_name: impl Into<String>) {
        *self.inner.current_screen.lock().unwrap() = Some(screen_name.into());
    }

    pub fn current_screen(&self) -> Option<String> {
        self.inner.current_screen.lock().unwrap().clone()
    }

    /// Tracks the current screen; an unset screen is reported with an empty name.
    pub fn track_current_screen(&self) {
        let screen_name = self.current_screen().unwrap_or_default();
        self.track(Hit::screen_view(screen_name));
    }

    pub fn track_event(&self, category: &str, action: &str) {
        self.track(Hit::event(category, action));
    }

    pub fn track_labeled_event(&self, category: &str, action: &str, label: &str, value: &str) {
        self.track(Hit::labeled_event(category, action, label, value));
    }

    pub fn track_exception(&self, description: &str, fatal: bool) {
        self.track(Hit::exception(description, fatal));
    }

    /// Fragments queued but not yet picked up by the dispatcher.
    pub fn pending_events(&self) -> usize {
        self.inner.queue.len()
    }

    pub fn dispatch_state(&self) -> DispatchState {
        self.inner.monitor.state()
    }

    pub fn dispatch_stats(&self) -> DispatchStats {
        self.inner.monitor.stats()
    }
}
