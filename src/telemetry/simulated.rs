//! Deterministic simulated telemetry source
//!
//! Stands in for the dashboard's decorative subsystem generators. Readings
//! are produced from a seeded generator keyed on (seed, topic, step), so two
//! instances with the same seed observe identical sequences; faithfully
//! reproducing the original widget formulas is an explicit non-goal.

use crate::error::{CorechatError, Result};
use crate::telemetry::{TelemetryProvider, TelemetrySnapshot};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

/// The simulated cognitive subsystems
pub const DEFAULT_TOPICS: &[&str] = &[
    "emotion-engine",
    "causality-graph",
    "collective-intelligence",
    "cognitive-sync",
    "self-awareness",
    "foresight",
    "long-term-memory",
    "knowledge-base",
    "cultural-intelligence",
    "linguistic-evolution",
    "adaptive-creativity",
    "unified-intelligence",
    "cognitive-economy",
    "interactive-perception",
];

/// Seeded telemetry generator
pub struct SimulatedTelemetry {
    seed: u64,
    step: AtomicU64,
    topics: Vec<String>,
}

impl SimulatedTelemetry {
    /// Creates a generator over the default topic set
    ///
    /// # Examples
    ///
    /// ```
    /// use corechat::telemetry::SimulatedTelemetry;
    /// use corechat::telemetry::TelemetryProvider;
    ///
    /// let telemetry = SimulatedTelemetry::new(7);
    /// assert!(telemetry.topics().contains(&"emotion-engine".to_string()));
    /// ```
    pub fn new(seed: u64) -> Self {
        Self::with_topics(
            seed,
            DEFAULT_TOPICS.iter().map(|t| t.to_string()).collect(),
        )
    }

    /// Creates a generator over a custom topic set
    pub fn with_topics(seed: u64, topics: Vec<String>) -> Self {
        Self {
            seed,
            step: AtomicU64::new(0),
            topics,
        }
    }

    fn generate(&self, topic: &str, step: u64) -> TelemetrySnapshot {
        let mut hasher = DefaultHasher::new();
        topic.hash(&mut hasher);
        let topic_seed = hasher.finish();

        let mut rng =
            StdRng::seed_from_u64(self.seed ^ topic_seed ^ step.wrapping_mul(0x9E37_79B9_7F4A_7C15));

        let mut metrics = BTreeMap::new();
        for name in ["coherence", "load", "confidence", "drift"] {
            let value: f64 = rng.random_range(0.0..1.0);
            metrics.insert(name.to_string(), (value * 1000.0).round() / 1000.0);
        }

        let coherence = metrics["coherence"];
        let status = if coherence >= 0.75 {
            "Flow"
        } else if coherence >= 0.5 {
            "Focus"
        } else if coherence >= 0.25 {
            "Quiet"
        } else {
            "Degraded"
        };

        TelemetrySnapshot {
            topic: topic.to_string(),
            captured_at: chrono::Utc::now(),
            status: status.to_string(),
            metrics,
        }
    }
}

#[async_trait]
impl TelemetryProvider for SimulatedTelemetry {
    fn topics(&self) -> Vec<String> {
        self.topics.clone()
    }

    async fn fetch(&self, topic: &str) -> Result<TelemetrySnapshot> {
        if !self.topics.iter().any(|t| t == topic) {
            return Err(CorechatError::Telemetry(format!("Unknown topic: {}", topic)).into());
        }
        let step = self.step.fetch_add(1, Ordering::Relaxed);
        Ok(self.generate(topic, step))
    }
}
