/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::collections::BTreeMap;
use std::io;

use log::warn;

mod procfs;
pub use procfs::ProcMemoryStats;

/// A source of named memory readings.
pub trait MemoryStatsSource {
    fn read(&mut self) -> io::Result<Vec<(&'static str, f64)>>;
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SampleSnapshot {
    pub readings: BTreeMap<String, f64>,
    /// number of sample passes so far
    pub poll_count: i64,
    pub random_value: f64,
}

pub struct Sampler<S> {
    source: S,
    snapshot: SampleSnapshot,
}

impl<S: MemoryStatsSource> Sampler<S> {
    pub fn new(source: S) -> Self {
        Sampler {
            source,
            snapshot: SampleSnapshot::default(),
        }
    }

    pub fn snapshot(&self) -> &SampleSnapshot {
        &self.snapshot
    }

    /// Run one sample pass.
    ///
    /// The readings are replaced as a whole. If the source fails, the previous
    /// readings are kept but the pass is still counted.
    pub fn sample(&mut self) {
        match self.source.read() {
            Ok(readings) => {
                self.snapshot.readings = readings
                    .into_iter()
                    .map(|(name, v)| (name.to_string(), v))
                    .collect();
            }
            Err(e) => warn!("failed to read memory stats: {e}"),
        }
        self.snapshot.poll_count = self.snapshot.poll_count.saturating_add(1);
        self.snapshot.random_value = fastrand::f64();
    }
}
