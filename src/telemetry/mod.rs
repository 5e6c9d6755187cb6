//! Simulated cognitive-subsystem telemetry
//!
//! Each "cognitive subsystem" of the dashboard is a telemetry topic whose
//! latest snapshot is polled for display only. The core never blocks on
//! telemetry and never depends on its values: a failed fetch falls back to
//! the last cached snapshot for that topic.

pub mod cache;
pub mod poller;
pub mod simulated;

pub use cache::TelemetryCache;
pub use poller::TelemetryPoller;
pub use simulated::SimulatedTelemetry;

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One observation of a telemetry topic
///
/// The payload is opaque to the core: a short status label plus named
/// numeric readings, consumed by presentation only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    /// Topic this snapshot belongs to
    pub topic: String,
    /// When the snapshot was produced
    pub captured_at: DateTime<Utc>,
    /// Short status label (e.g. "Flow", "Degraded")
    pub status: String,
    /// Named readings, typically normalized to 0..1
    pub metrics: BTreeMap<String, f64>,
}

/// Source of telemetry snapshots
///
/// Implementations may fail per topic; consumers substitute the last cached
/// snapshot and move on. One topic's failure must never affect another's.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TelemetryProvider: Send + Sync {
    /// All topics this provider reports on
    fn topics(&self) -> Vec<String>;

    /// Latest snapshot for one topic
    ///
    /// # Errors
    ///
    /// Returns an error when the topic cannot currently be observed.
    async fn fetch(&self, topic: &str) -> Result<TelemetrySnapshot>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_serialization_roundtrip() {
        let mut metrics = BTreeMap::new();
        metrics.insert("coherence".to_string(), 0.82);
        metrics.insert("load".to_string(), 0.34);
        let snapshot = TelemetrySnapshot {
            topic: "emotion-engine".to_string(),
            captured_at: Utc::now(),
            status: "Flow".to_string(),
            metrics,
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: TelemetrySnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
