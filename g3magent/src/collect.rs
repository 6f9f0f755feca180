/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::time::Duration;

use log::info;
use tokio::time::{Instant, MissedTickBehavior};

use crate::report::{MetricPusher, Reporter};
use crate::sample::{MemoryStatsSource, SampleSnapshot, Sampler};

/// Drive sample passes and report passes on their own periods.
pub struct CollectorLoop<S, P> {
    sampler: Sampler<S>,
    reporter: Reporter<P>,
    poll_interval: Duration,
    report_interval: Duration,
}

impl<S, P> CollectorLoop<S, P>
where
    S: MemoryStatsSource,
    P: MetricPusher,
{
    pub fn new(
        sampler: Sampler<S>,
        reporter: Reporter<P>,
        poll_interval: Duration,
        report_interval: Duration,
    ) -> Self {
        CollectorLoop {
            sampler,
            reporter,
            poll_interval,
            report_interval,
        }
    }

    pub fn snapshot(&self) -> &SampleSnapshot {
        self.sampler.snapshot()
    }

    #[cfg(test)]
    pub(crate) fn reporter(&self) -> &Reporter<P> {
        &self.reporter
    }

    /// Run until the process is killed.
    pub async fn run(&mut self) {
        self.run_reports(None).await
    }

    /// Run until `reports` report passes are finished.
    pub async fn run_for(&mut self, reports: usize) {
        self.run_reports(Some(reports)).await
    }

    async fn run_reports(&mut self, max_reports: Option<usize>) {
        // the first sample pass starts at once, the first report pass after a full period
        let mut sample_interval = tokio::time::interval(self.poll_interval);
        sample_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut report_interval = tokio::time::interval_at(
            Instant::now() + self.report_interval,
            self.report_interval,
        );
        report_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut finished: usize = 0;
        loop {
            tokio::select! {
                biased;

                _ = report_interval.tick() => {
                    let snapshot = self.sampler.snapshot().clone();
                    let summary = self.reporter.report(&snapshot).await;
                    info!(
                        "reported {} metrics of {} sample passes, {} failed",
                        summary.sent, snapshot.poll_count, summary.failed
                    );
                    finished += 1;
                    if max_reports.is_some_and(|max| finished >= max) {
                        return;
                    }
                }
                _ = sample_interval.tick() => {
                    self.sampler.sample();
                }
            }
        }
    }
}
