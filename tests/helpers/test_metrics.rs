#![allow(dead_code)]
//! An in-memory metrics recorder for tests.

use metrics::{Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Records counter increments by name. Gauges and histograms are ignored.
#[derive(Debug, Clone, Default)]
pub struct TestRecorder {
    counters: Arc<Mutex<HashMap<String, u64>>>,
}

impl TestRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counter(&self, name: &str) -> u64 {
        self.counters.lock().unwrap().get(name).copied().unwrap_or(0)
    }
}

impl Recorder for TestRecorder {
    fn describe_counter(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}
    fn describe_gauge(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}
    fn describe_histogram(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn register_counter(&self, key: &Key, _metadata: &Metadata<'_>) -> Counter {
        Counter::from_arc(Arc::new(RecordedCounter {
            name: key.name().to_string(),
            counters: self.counters.clone(),
        }))
    }

    fn register_gauge(&self, _key: &Key, _metadata: &Metadata<'_>) -> Gauge {
        Gauge::noop()
    }

    fn register_histogram(&self, _key: &Key, _metadata: &Metadata<'_>) -> Histogram {
        Histogram::noop()
    }
}

#[derive(Debug)]
struct RecordedCounter {
    name: String,
    counters: Arc<Mutex<HashMap<String, u64>>>,
}

impl metrics::CounterFn for RecordedCounter {
    fn increment(&self, value: u64) {
        *self.counters.lock().unwrap().entry(self.name.clone()).or_insert(0) += value;
    }

    fn absolute(&self, value: u64) {
        self.counters.lock().unwrap().insert(self.name.clone(), value);
    }
}
