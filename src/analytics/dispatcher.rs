//! Single-consumer dispatch loop delivering queued fragments to the collector.
//!
//! The loop takes one fragment at a time, turns it into a request URL and awaits the transport
//! before looking at the queue again, so requests reach the collector in submission order and
//! never overlap. When no endpoint is configured fragments are drained and discarded.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use rand::Rng;

use crate::analytics::constants::{CACHE_BUSTER_MAX, CACHE_BUSTER_MIN};
use crate::analytics::encoder::Fragment;
use crate::analytics::endpoint::CollectorEndpoint;
use crate::analytics::queue::QueueReceiver;
use crate::analytics::transport::CollectorTransport;
use crate::platform::{locale, runtime};

/// Supplies the language tag appended to each request; read once per dispatched fragment.
pub type LocaleSource = Arc<dyn Fn() -> String + Send + Sync + 'static>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchState {
    /// No request outstanding.
    Idle,
    /// Exactly one request outstanding.
    Sending,
}

/// What a single dispatch cycle did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The queue was empty.
    Idle,
    /// A request was issued and the transport reported success.
    Sent,
    /// A request was issued and the transport reported an error; the fragment is lost.
    Failed,
    /// No endpoint is configured; the fragment was dropped without a request.
    Discarded,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub sent: u64,
    pub failed: u64,
    pub discarded: u64,
}

#[derive(Debug, Default)]
struct DispatchShared {
    sending: AtomicBool,
    sent: AtomicU64,
    failed: AtomicU64,
    discarded: AtomicU64,
}

impl DispatchShared {
    fn record(&self, outcome: CycleOutcome) {
        let counter = match outcome {
            CycleOutcome::Idle => return,
            CycleOutcome::Sent => &self.sent,
            CycleOutcome::Failed => &self.failed,
            CycleOutcome::Discarded => &self.discarded,
        };
        counter.fetch_add(1, Ordering::SeqCst);
    }

    fn state(&self) -> DispatchState {
        if self.sending.load(Ordering::SeqCst) {
            DispatchState::Sending
        } else {
            DispatchState::Idle
        }
    }

    fn stats(&self) -> DispatchStats {
        DispatchStats {
            sent: self.sent.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
            discarded: self.discarded.load(Ordering::SeqCst),
        }
    }
}

/// Read-only view of a dispatcher that stays usable after the dispatcher was spawned.
#[derive(Clone, Debug)]
pub struct DispatchMonitor {
    shared: Arc<DispatchShared>,
}

impl DispatchMonitor {
    pub fn state(&self) -> DispatchState {
        self.shared.state()
    }

    pub fn stats(&self) -> DispatchStats {
        self.shared.stats()
    }
}

pub struct Dispatcher {
    queue: QueueReceiver,
    endpoint: Option<CollectorEndpoint>,
    transport: Arc<dyn CollectorTransport>,
    locale: LocaleSource,
    shared: Arc<DispatchShared>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("endpoint", &self.endpoint)
            .field("pending", &self.queue.len())
            .field("state", &self.shared.state())
            .finish()
    }
}

impl Dispatcher {
    /// Creates a dispatcher over `queue`. Without an endpoint every fragment is discarded.
    pub fn new(
        queue: QueueReceiver,
        endpoint: Option<CollectorEndpoint>,
        transport: Arc<dyn CollectorTransport>,
    ) -> Self {
        Self {
            queue,
            endpoint,
            transport,
            locale: Arc::new(locale::current_language),
            shared: Arc::new(DispatchShared::default()),
        }
    }

    pub fn with_locale_source<F>(mut self, source: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        self.locale = Arc::new(source);
        self
    }

    pub fn endpoint(&self) -> Option<&CollectorEndpoint> {
        self.endpoint.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        self.endpoint.is_some()
    }

    pub fn state(&self) -> DispatchState {
        self.shared.state()
    }

    pub fn stats(&self) -> DispatchStats {
        self.shared.stats()
    }

    pub fn monitor(&self) -> DispatchMonitor {
        DispatchMonitor {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Number of fragments waiting in the queue.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Processes at most one queued fragment, returning immediately when the queue is empty.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        match self.queue.try_dequeue() {
            Some(fragment) => self.process(fragment).await,
            None => CycleOutcome::Idle,
        }
    }

    /// Runs until every producer handle is dropped and the queue is drained, waiting on the
    /// queue whenever it is empty.
    pub async fn run(mut self) {
        while let Some(fragment) = self.queue.dequeue().await {
            self.process(fragment).await;
        }
        log::debug!("collector queue closed; dispatch loop finished");
    }

    /// Moves the loop onto a background task.
    pub fn spawn(self) {
        runtime::spawn_detached(self.run());
    }

    async fn process(&mut self, fragment: Fragment) -> CycleOutcome {
        let outcome = match self.endpoint.as_ref() {
            Some(endpoint) => {
                let url = endpoint.request_url(cache_buster(), &fragment, &(self.locale)());
                self.send(&url).await
            }
            None => {
                log::debug!("no tracking id configured; discarding `{fragment}`");
                CycleOutcome::Discarded
            }
        };
        self.shared.record(outcome);
        outcome
    }

    async fn send(&self, url: &str) -> CycleOutcome {
        log::debug!("collector request: {url}");
        self.shared.sending.store(true, Ordering::SeqCst);
        let result = self.transport.send(url).await;
        self.shared.sending.store(false, Ordering::SeqCst);

        match result {
            Ok(()) => CycleOutcome::Sent,
            Err(err) => {
                log::debug!("collector request dropped: {err}");
                CycleOutcome::Failed
            }
        }
    }
}

fn cache_buster() -> u32 {
    rand::thread_rng().gen_range(CACHE_BUSTER_MIN..CACHE_BUSTER_MAX)
}
