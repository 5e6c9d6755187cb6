//! Per-topic cache of last-known telemetry snapshots
//!
//! The cache is an explicit component owned by whoever runs the poller and
//! injected into consumers; there is no ambient global state. Its lifecycle
//! is tied to the application run.

use crate::telemetry::TelemetrySnapshot;
use std::collections::HashMap;
use std::sync::RwLock;

/// Last successfully fetched snapshot per topic
#[derive(Debug, Default)]
pub struct TelemetryCache {
    inner: RwLock<HashMap<String, TelemetrySnapshot>>,
}

impl TelemetryCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a snapshot, replacing any previous one for its topic
    pub fn record(&self, snapshot: TelemetrySnapshot) {
        if let Ok(mut inner) = self.inner.write() {
            inner.insert(snapshot.topic.clone(), snapshot);
        }
    }

    /// Last-known snapshot for a topic, if any
    pub fn latest(&self, topic: &str) -> Option<TelemetrySnapshot> {
        self.inner
            .read()
            .ok()
            .and_then(|inner| inner.get(topic).cloned())
    }

    /// Topics with a cached snapshot, sorted
    pub fn topics(&self) -> Vec<String> {
        let mut topics: Vec<String> = self
            .inner
            .read()
            .map(|inner| inner.keys().cloned().collect())
            .unwrap_or_default();
        topics.sort();
        topics
    }

    /// Number of cached topics
    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.len()).unwrap_or(0)
    }

    /// True when nothing has been cached yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
