//! Scan counters.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Scheduler metrics.
#[derive(Debug, Default)]
pub struct ScanMetrics {
    /// Passes that ran to completion.
    pub scans_completed: AtomicU64,

    /// Requests dropped because a pass was already running.
    pub scans_dropped: AtomicU64,

    /// Nodes flagged across all passes.
    pub detections: AtomicU64,

    /// Mutation records received by the change loop.
    pub mutations: AtomicU64,

    /// Total time spent scanning (milliseconds), delays included.
    pub scan_time_ms: AtomicU64,

    last_scan_at: parking_lot::RwLock<Option<DateTime<Utc>>>,
}

impl ScanMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_scan(&self, detections: u64, elapsed_ms: u64) {
        self.scans_completed.fetch_add(1, Ordering::Relaxed);
        self.detections.fetch_add(detections, Ordering::Relaxed);
        self.scan_time_ms.fetch_add(elapsed_ms, Ordering::Relaxed);
        *self.last_scan_at.write() = Some(Utc::now());
    }

    pub fn record_dropped(&self) {
        self.scans_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_mutations(&self, count: u64) {
        self.mutations.fetch_add(count, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            timestamp: Utc::now(),
            scans_completed: self.scans_completed.load(Ordering::Relaxed),
            scans_dropped: self.scans_dropped.load(Ordering::Relaxed),
            detections: self.detections.load(Ordering::Relaxed),
            mutations: self.mutations.load(Ordering::Relaxed),
            scan_time_ms: self.scan_time_ms.load(Ordering::Relaxed),
            last_scan_at: *self.last_scan_at.read(),
        }
    }
}

/// Metrics at a point in time.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub scans_completed: u64,
    pub scans_dropped: u64,
    pub detections: u64,
    pub mutations: u64,
    pub scan_time_ms: u64,
    pub last_scan_at: Option<DateTime<Utc>>,
}

impl MetricsSnapshot {
    /// Average pass duration in milliseconds.
    pub fn avg_scan_time_ms(&self) -> f64 {
        if self.scans_completed == 0 {
            return 0.0;
        }
        self.scan_time_ms as f64 / self.scans_completed as f64
    }
}
