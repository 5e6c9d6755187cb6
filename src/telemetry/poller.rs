//! Telemetry polling scheduler
//!
//! One scheduler task fans out to N independent fetch-and-cache operations
//! per tick. Each topic's fetch is isolated: a failure is logged and leaves
//! that topic's cached snapshot in place without affecting the others.

use crate::telemetry::{TelemetryCache, TelemetryProvider, TelemetrySnapshot};
use metrics::increment_counter;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Periodically refreshes the telemetry cache from a provider
pub struct TelemetryPoller {
    provider: Arc<dyn TelemetryProvider>,
    cache: Arc<TelemetryCache>,
    interval: Duration,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl TelemetryPoller {
    /// Creates a poller; nothing runs until [`start`] is called
    ///
    /// [`start`]: TelemetryPoller::start
    pub fn new(
        provider: Arc<dyn TelemetryProvider>,
        cache: Arc<TelemetryCache>,
        interval: Duration,
    ) -> Self {
        Self {
            provider,
            cache,
            interval,
            cancel: CancellationToken::new(),
            handle: None,
        }
    }

    /// The cache this poller refreshes
    pub fn cache(&self) -> Arc<TelemetryCache> {
        Arc::clone(&self.cache)
    }

    /// Spawns the scheduler task
    ///
    /// Starting an already started poller is a no-op.
    pub fn start(&mut self) {
        if self.handle.is_some() {
            return;
        }

        let provider = Arc::clone(&self.provider);
        let cache = Arc::clone(&self.cache);
        let interval = self.interval;
        let token = self.cancel.clone();

        self.handle = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        poll_once(&provider, &cache).await;
                    }
                }
            }
        }));
        tracing::debug!("Telemetry poller started ({:?} interval)", self.interval);
    }

    /// Stops the scheduler task
    pub fn stop(&mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Latest snapshot for a topic, preferring a fresh fetch
    ///
    /// On fetch failure the last cached snapshot is substituted; `None` only
    /// when the topic has never been observed.
    pub async fn latest(&self, topic: &str) -> Option<TelemetrySnapshot> {
        match self.provider.fetch(topic).await {
            Ok(snapshot) => {
                self.cache.record(snapshot.clone());
                Some(snapshot)
            }
            Err(e) => {
                tracing::warn!("Telemetry fetch for {} failed: {}", topic, e);
                increment_counter!("corechat_telemetry_fetch_failures_total");
                self.cache.latest(topic)
            }
        }
    }
}

impl Drop for TelemetryPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Fetches every topic once, caching successes and isolating failures
pub async fn poll_once(provider: &Arc<dyn TelemetryProvider>, cache: &TelemetryCache) {
    let topics = provider.topics();
    let fetches = topics.into_iter().map(|topic| {
        let provider = Arc::clone(provider);
        async move {
            let result = provider.fetch(&topic).await;
            (topic, result)
        }
    });

    for (topic, result) in futures::future::join_all(fetches).await {
        match result {
            Ok(snapshot) => cache.record(snapshot),
            Err(e) => {
                tracing::warn!("Telemetry fetch for {} failed: {}", topic, e);
                increment_counter!("corechat_telemetry_fetch_failures_total");
            }
        }
    }
}
