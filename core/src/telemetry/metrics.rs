use std::sync::Mutex;

/// Counters for detail fetches, shared between the orchestrator and the
/// controller that applies their completions.
pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub issued: usize,
    pub applied: usize,
    pub stale: usize,
    pub failed: usize,
}

#[derive(Default)]
struct Metrics {
    issued: usize,
    applied: usize,
    stale: usize,
    failed: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics::default()),
        }
    }

    pub fn record_issued(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.issued += 1;
        }
    }

    pub fn record_applied(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.applied += 1;
        }
    }

    pub fn record_stale(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.stale += 1;
        }
    }

    pub fn record_failed(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.failed += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            MetricsSnapshot {
                issued: metrics.issued,
                applied: metrics.applied,
                stale: metrics.stale,
                failed: metrics.failed,
            }
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
