//! Test utilities shared across crate-level unit tests.

pub mod fixtures;
pub mod http;
pub mod transport;

pub use fixtures::{fixed_descriptors, temp_dir};
pub use http::start_mock_server;
pub use transport::RecordingTransport;
