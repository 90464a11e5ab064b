use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::analytics::error::{network_error, AnalyticsResult};
use crate::analytics::CollectorTransport;

/// Transport that records every URL it is handed and tracks how many sends overlap.
#[derive(Clone, Debug, Default)]
pub struct RecordingTransport {
    urls: Arc<Mutex<Vec<String>>>,
    failing_calls: Arc<BTreeSet<usize>>,
    calls: Arc<AtomicUsize>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl RecordingTransport {
    /// Fails the calls at the given zero-based positions with a network error.
    pub fn failing_on(calls: &[usize]) -> Self {
        Self {
            failing_calls: Arc::new(calls.iter().copied().collect()),
            ..Self::default()
        }
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Polls until at least `expected` sends completed or `timeout` elapsed.
    pub async fn wait_for_calls(&self, expected: usize, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        while self.calls() < expected {
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        true
    }
}

#[async_trait]
impl CollectorTransport for RecordingTransport {
    async fn send(&self, url: &str) -> AnalyticsResult<()> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        tokio::task::yield_now().await;

        self.urls.lock().unwrap().push(url.to_string());
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing_calls.contains(&index) {
            return Err(network_error("simulated collector failure"));
        }
        Ok(())
    }
}
