//! Attack outcome metrics.
//!
//! Tracks how many attacks landed, why the others failed, and how long
//! requests took end to end.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use battlestation_core::ErrorClass;
use serde::Serialize;

/// Counters recorded by the attack coordinator.
///
/// Uses atomics for lock-free access across request handlers.
#[derive(Debug, Default)]
pub struct AttackMetrics {
    /// Attacks that ended with a confirmed shot
    succeeded: AtomicU64,

    failed: AtomicU64,

    /// Failures bucketed by [`ErrorClass::index`]
    failures_by_class: [AtomicU64; ErrorClass::ALL.len()],

    /// Sum of all attack durations, in nanoseconds
    total_latency_nanos: AtomicU64,
}

impl AttackMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an attack that fired a cannon.
    pub fn record_success(&self, latency: Duration) {
        self.succeeded.fetch_add(1, Ordering::Relaxed);
        self.add_latency(latency);
    }

    /// Records an attack that stopped with an error of the given class.
    pub fn record_failure(&self, class: ErrorClass, latency: Duration) {
        self.failed.fetch_add(1, Ordering::Relaxed);
        self.failures_by_class[class.index()].fetch_add(1, Ordering::Relaxed);
        self.add_latency(latency);
    }

    fn add_latency(&self, latency: Duration) {
        let nanos = u64::try_from(latency.as_nanos()).unwrap_or(u64::MAX);
        self.total_latency_nanos.fetch_add(nanos, Ordering::Relaxed);
    }

    /// Number of attacks that fired a cannon. Every success is one shot.
    pub fn succeeded(&self) -> u64 {
        self.succeeded.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    pub fn failures(&self, class: ErrorClass) -> u64 {
        self.failures_by_class[class.index()].load(Ordering::Relaxed)
    }

    pub fn total_requests(&self) -> u64 {
        self.succeeded() + self.failed()
    }

    /// Mean latency over every recorded attack, successful or not.
    pub fn avg_latency(&self) -> Duration {
        let total = self.total_requests();
        if total == 0 {
            Duration::ZERO
        } else {
            Duration::from_nanos(self.total_latency_nanos.load(Ordering::Relaxed) / total)
        }
    }

    /// Creates a snapshot of all counters.
    ///
    /// Fields are read individually, so a snapshot taken while attacks are
    /// in flight may be slightly inconsistent.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let total_latency = Duration::from_nanos(self.total_latency_nanos.load(Ordering::Relaxed));
        MetricsSnapshot {
            succeeded: self.succeeded(),
            failed: self.failed(),
            shots_fired: self.succeeded(),
            failures_by_class: ErrorClass::ALL
                .iter()
                .map(|class| ClassCount {
                    class: *class,
                    count: self.failures(*class),
                })
                .collect(),
            total_latency_ms: total_latency.as_millis() as u64,
            avg_latency_ms: self.avg_latency().as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassCount {
    pub class: ErrorClass,
    pub count: u64,
}

/// Point-in-time copy of [`AttackMetrics`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub succeeded: u64,
    pub failed: u64,
    pub shots_fired: u64,
    pub failures_by_class: Vec<ClassCount>,
    pub total_latency_ms: u64,
    pub avg_latency_ms: u64,
}
