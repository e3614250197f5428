//! Per-operation latency samples

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use costscope_core::{BoundedHistory, Error, HISTORY_SIZE, Result};
use parking_lot::Mutex;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencySample {
    pub millis: f64,
    pub recorded_at: DateTime<Utc>,
}

/// Thread-safe latency recorder keyed by operation name
///
/// Each operation keeps its most recent `capacity` samples. Statistics over an
/// operation with no samples are 0.
#[derive(Debug)]
pub struct LatencyMonitor {
    capacity: usize,
    samples: Mutex<HashMap<String, BoundedHistory<LatencySample>>>,
}

impl LatencyMonitor {
    pub fn new(capacity: usize) -> Self {
        LatencyMonitor {
            capacity,
            samples: Mutex::new(HashMap::new()),
        }
    }

    pub fn record(&self, operation: &str, millis: f64) {
        let sample = LatencySample {
            millis,
            recorded_at: Utc::now(),
        };
        let mut samples = self.samples.lock();
        samples
            .entry(operation.to_string())
            .or_insert_with(|| BoundedHistory::new(self.capacity))
            .push(sample);
    }

    pub fn record_duration(&self, operation: &str, elapsed: Duration) {
        self.record(operation, elapsed.as_secs_f64() * 1000.0);
    }

    pub fn count(&self, operation: &str) -> usize {
        self.samples.lock().get(operation).map_or(0, |h| h.len())
    }

    pub fn average(&self, operation: &str) -> f64 {
        let values = self.values(operation);
        if values.is_empty() {
            return 0.0;
        }
        values.iter().sum::<f64>() / values.len() as f64
    }

    pub fn min(&self, operation: &str) -> f64 {
        self.values(operation)
            .into_iter()
            .reduce(f64::min)
            .unwrap_or(0.0)
    }

    pub fn max(&self, operation: &str) -> f64 {
        self.values(operation)
            .into_iter()
            .reduce(f64::max)
            .unwrap_or(0.0)
    }

    /// Nearest-rank percentile: sorted sample at `⌊p/100 · (n−1)⌋`
    pub fn percentile(&self, operation: &str, p: f64) -> Result<f64> {
        if !(0.0..=100.0).contains(&p) {
            return Err(Error::invalid_input(format!(
                "percentile must be within [0, 100], got {p}"
            )));
        }
        let mut values = self.values(operation);
        if values.is_empty() {
            return Ok(0.0);
        }
        values.sort_by(f64::total_cmp);
        let index = (p / 100.0 * (values.len() - 1) as f64) as usize;
        Ok(values[index])
    }

    /// Most recent sample, if any
    pub fn latest(&self, operation: &str) -> Option<LatencySample> {
        self.samples
            .lock()
            .get(operation)
            .and_then(|h| h.latest().copied())
    }

    pub fn operations(&self) -> Vec<String> {
        self.samples.lock().keys().cloned().collect()
    }

    pub fn clear(&self) {
        self.samples.lock().clear();
    }

    fn values(&self, operation: &str) -> Vec<f64> {
        self.samples
            .lock()
            .get(operation)
            .map(|h| h.iter().map(|s| s.millis).collect())
            .unwrap_or_default()
    }
}

impl Default for LatencyMonitor {
    fn default() -> Self {
        Self::new(HISTORY_SIZE)
    }
}
