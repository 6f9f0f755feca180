/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::{Arc, RwLock};

use ahash::AHashMap;

use g3mstore_proto::{MetricKind, MetricValue};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    Created,
    Replaced,
    Accumulated,
    /// the stored metric is of another kind, nothing changed
    KindConflict,
    /// the counter sum does not fit in i64, nothing changed
    Overflow,
}

/// Latest value of every known metric, keyed by name.
///
/// The kind of an entry is fixed by its first update.
#[derive(Default)]
pub struct MetricStore {
    inner: RwLock<AHashMap<Arc<str>, MetricValue>>,
}

impl MetricStore {
    pub fn new() -> Self {
        MetricStore::default()
    }

    pub fn update(&self, name: &str, value: MetricValue) -> UpdateOutcome {
        let mut map = self.inner.write().unwrap();
        let Some(stored) = map.get_mut(name) else {
            map.insert(Arc::from(name), value);
            return UpdateOutcome::Created;
        };

        match (stored, value) {
            (MetricValue::Gauge(old), MetricValue::Gauge(new)) => {
                *old = new;
                UpdateOutcome::Replaced
            }
            (MetricValue::Counter(old), MetricValue::Counter(delta)) => match old.checked_add(delta)
            {
                Some(sum) => {
                    *old = sum;
                    UpdateOutcome::Accumulated
                }
                None => UpdateOutcome::Overflow,
            },
            _ => UpdateOutcome::KindConflict,
        }
    }

    pub fn get(&self, name: &str) -> Option<MetricValue> {
        let map = self.inner.read().unwrap();
        map.get(name).copied()
    }

    /// Get the value only if it is stored as `kind`.
    pub fn get_kind(&self, kind: MetricKind, name: &str) -> Option<MetricValue> {
        self.get(name).filter(|v| v.kind() == kind)
    }

    pub fn list_sorted(&self) -> Vec<(Arc<str>, MetricValue)> {
        let map = self.inner.read().unwrap();
        let mut all: Vec<(Arc<str>, MetricValue)> =
            map.iter().map(|(k, v)| (Arc::clone(k), *v)).collect();
        drop(map);

        all.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        all
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().unwrap().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gauge_last_write_wins() {
        let store = MetricStore::new();
        assert_eq!(
            store.update("Alloc", MetricValue::Gauge(1.5)),
            UpdateOutcome::Created
        );
        assert_eq!(
            store.update("Alloc", MetricValue::Gauge(-2.0)),
            UpdateOutcome::Replaced
        );
        assert_eq!(store.get("Alloc"), Some(MetricValue::Gauge(-2.0)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn counter_accumulate() {
        let store = MetricStore::new();
        let deltas = [1, 2, 3, 0, 10];
        for d in deltas {
            store.update("PollCount", MetricValue::Counter(d));
        }
        assert_eq!(store.get("PollCount"), Some(MetricValue::Counter(16)));
    }

    #[test]
    fn kind_conflict() {
        let store = MetricStore::new();
        store.update("X", MetricValue::Counter(5));
        assert_eq!(
            store.update("X", MetricValue::Gauge(9.9)),
            UpdateOutcome::KindConflict
        );
        assert_eq!(store.get("X"), Some(MetricValue::Counter(5)));
        assert_eq!(store.get_kind(MetricKind::Counter, "X"), Some(MetricValue::Counter(5)));
        assert!(store.get_kind(MetricKind::Gauge, "X").is_none());

        store.update("Y", MetricValue::Gauge(1.0));
        assert_eq!(
            store.update("Y", MetricValue::Counter(1)),
            UpdateOutcome::KindConflict
        );
        assert_eq!(store.get("Y"), Some(MetricValue::Gauge(1.0)));
    }

    #[test]
    fn counter_overflow() {
        let store = MetricStore::new();
        store.update("C", MetricValue::Counter(i64::MAX - 1));
        assert_eq!(
            store.update("C", MetricValue::Counter(2)),
            UpdateOutcome::Overflow
        );
        assert_eq!(store.get("C"), Some(MetricValue::Counter(i64::MAX - 1)));
        assert_eq!(
            store.update("C", MetricValue::Counter(1)),
            UpdateOutcome::Accumulated
        );
        assert_eq!(store.get("C"), Some(MetricValue::Counter(i64::MAX)));
    }

    #[test]
    fn sorted_listing() {
        let store = MetricStore::new();
        assert!(store.is_empty());
        for name in ["b", "Z", "a", "aa", "B", "0"] {
            store.update(name, MetricValue::Gauge(1.0));
        }
        let names: Vec<String> = store
            .list_sorted()
            .into_iter()
            .map(|(n, _)| n.to_string())
            .collect();
        assert_eq!(names, ["0", "B", "Z", "a", "aa", "b"]);
    }

    #[test]
    fn concurrent_counter() {
        let store = Arc::new(MetricStore::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = Arc::clone(&store);
            handles.push(std::thread::spawn(move || {
                for _ in 0..1000 {
                    store.update("hits", MetricValue::Counter(1));
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(store.get("hits"), Some(MetricValue::Counter(8000)));
    }
}
