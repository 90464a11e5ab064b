//! Event tracking against a Measurement-Protocol style collector.
//!
//! [`Analytics`] encodes tracking calls into query fragments and queues them; a single
//! [`Dispatcher`] delivers them one request at a time, in submission order.
mod api;
mod config;
mod constants;
mod dispatcher;
mod encoder;
mod endpoint;
pub mod error;
mod queue;
mod transport;

pub use api::Analytics;
pub use config::{AnalyticsSettings, CollectorUrl, ScreenResolution};
pub use constants::{
    APP_ID_ENV, APP_VERSION_ENV, COLLECT_URL, COLLECT_URL_ENV, DEBUG_COLLECT_URL,
    SCREEN_RESOLUTION_ENV, TRACKING_ID_ENV,
};
pub use dispatcher::{
    CycleOutcome, DispatchMonitor, DispatchState, DispatchStats, Dispatcher, LocaleSource,
};
pub use encoder::{
    encode_event, encode_exception, encode_labeled_event, encode_screen_view, escape_component,
    Fragment, Hit,
};
pub use endpoint::CollectorEndpoint;
pub use queue::{unbounded, EventQueue, QueueReceiver};
pub use transport::{CollectorTransport, HttpCollectorTransport};
