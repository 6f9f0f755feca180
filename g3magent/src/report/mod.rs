/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::io;

use http::StatusCode;
use log::{debug, warn};
use thiserror::Error;

use g3_http::client::HttpResponseParseError;
use g3mstore_proto::{MetricValue, UpdatePath};

use crate::sample::SampleSnapshot;

mod pusher;
pub use pusher::HttpPusher;

pub const POLL_COUNT_NAME: &str = "PollCount";
pub const RANDOM_VALUE_NAME: &str = "RandomValue";

#[derive(Debug, Error)]
pub enum PushError {
    #[error("connect failed: {0}")]
    ConnectFailed(io::Error),
    #[error("write request failed: {0}")]
    WriteFailed(io::Error),
    #[error("read response failed: {0}")]
    ReadFailed(#[from] HttpResponseParseError),
    #[error("unexpected response: {0}")]
    UnexpectedStatus(StatusCode),
    #[error("timed out")]
    Timeout,
}

pub trait MetricPusher {
    /// Deliver one metric, success means the server replied 200.
    fn push(&mut self, path: &UpdatePath) -> impl Future<Output = Result<(), PushError>>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub sent: usize,
    pub failed: usize,
}

pub struct Reporter<P> {
    pusher: P,
    /// poll count at the last successful counter push
    reported_poll_count: i64,
}

impl<P: MetricPusher> Reporter<P> {
    pub fn new(pusher: P) -> Self {
        Reporter {
            pusher,
            reported_poll_count: 0,
        }
    }

    #[cfg(test)]
    pub(crate) fn pusher(&self) -> &P {
        &self.pusher
    }

    /// Push every reading of the snapshot one by one.
    ///
    /// A failed push is logged and dropped, the pass goes on with the next one.
    pub async fn report(&mut self, snapshot: &SampleSnapshot) -> ReportSummary {
        let mut summary = ReportSummary::default();

        for (name, v) in &snapshot.readings {
            let path = UpdatePath::new(name.as_str(), MetricValue::Gauge(*v));
            self.push_one(&path, &mut summary).await;
        }

        // the server accumulates counters, so only send what it has not seen yet
        let delta = snapshot.poll_count - self.reported_poll_count;
        let path = UpdatePath::new(POLL_COUNT_NAME, MetricValue::Counter(delta));
        if self.push_one(&path, &mut summary).await {
            self.reported_poll_count = snapshot.poll_count;
        }

        let path = UpdatePath::new(RANDOM_VALUE_NAME, MetricValue::Gauge(snapshot.random_value));
        self.push_one(&path, &mut summary).await;

        debug!(
            "report pass finished: {} sent, {} failed",
            summary.sent, summary.failed
        );
        summary
    }

    async fn push_one(&mut self, path: &UpdatePath, summary: &mut ReportSummary) -> bool {
        match self.pusher.push(path).await {
            Ok(_) => {
                summary.sent += 1;
                true
            }
            Err(e) => {
                warn!("failed to push metric {}: {e}", path.name);
                summary.failed += 1;
                false
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::BTreeMap;

    /// Records every push, failing the names in `fail_names`.
    #[derive(Default)]
    pub(crate) struct RecordPusher {
        pub(crate) pushed: Vec<UpdatePath>,
        pub(crate) fail_names: Vec<&'static str>,
    }

    impl MetricPusher for RecordPusher {
        async fn push(&mut self, path: &UpdatePath) -> Result<(), PushError> {
            if self.fail_names.contains(&path.name.as_str()) {
                return Err(PushError::UnexpectedStatus(StatusCode::BAD_REQUEST));
            }
            self.pushed.push(path.clone());
            Ok(())
        }
    }

    fn snapshot(poll_count: i64) -> SampleSnapshot {
        let mut readings = BTreeMap::new();
        readings.insert("VmSize".to_string(), 2048.0);
        readings.insert("VmRSS".to_string(), 1024.0);
        SampleSnapshot {
            readings,
            poll_count,
            random_value: 0.5,
        }
    }

    #[tokio::test]
    async fn report_order() {
        let mut reporter = Reporter::new(RecordPusher::default());
        let summary = reporter.report(&snapshot(5)).await;
        assert_eq!(summary, ReportSummary { sent: 4, failed: 0 });

        let pushed: Vec<String> = reporter
            .pusher()
            .pushed
            .iter()
            .map(|p| p.to_string())
            .collect();
        assert_eq!(
            pushed,
            [
                "/update/gauge/VmRSS/1024",
                "/update/gauge/VmSize/2048",
                "/update/counter/PollCount/5",
                "/update/gauge/RandomValue/0.5",
            ]
        );
    }

    #[tokio::test]
    async fn counter_delta() {
        let mut reporter = Reporter::new(RecordPusher::default());
        reporter.report(&snapshot(5)).await;
        reporter.report(&snapshot(10)).await;

        let counters: Vec<MetricValue> = reporter
            .pusher()
            .pushed
            .iter()
            .filter(|p| p.name == POLL_COUNT_NAME)
            .map(|p| p.value)
            .collect();
        assert_eq!(
            counters,
            [MetricValue::Counter(5), MetricValue::Counter(5)]
        );
    }

    #[tokio::test]
    async fn failed_push_dropped() {
        let pusher = RecordPusher {
            fail_names: vec!["VmRSS", POLL_COUNT_NAME],
            ..Default::default()
        };
        let mut reporter = Reporter::new(pusher);
        let summary = reporter.report(&snapshot(3)).await;
        assert_eq!(summary, ReportSummary { sent: 2, failed: 2 });

        // the failed counter delta is carried into the next pass
        reporter.pusher.fail_names.clear();
        reporter.report(&snapshot(7)).await;
        let last_counter = reporter
            .pusher()
            .pushed
            .iter()
            .rfind(|p| p.name == POLL_COUNT_NAME)
            .map(|p| p.value);
        assert_eq!(last_counter, Some(MetricValue::Counter(7)));
    }
}
