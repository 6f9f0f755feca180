/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use anyhow::Context;
use log::{error, info};

use g3_daemon::runtime::RuntimeConfig;

use g3magent::collect::CollectorLoop;
use g3magent::opts::ProcArgs;
use g3magent::report::{HttpPusher, Reporter};
use g3magent::sample::{ProcMemoryStats, Sampler};

fn main() -> anyhow::Result<()> {
    let Some(proc_args) =
        g3magent::opts::parse_clap().context("failed to parse command line options")?
    else {
        return Ok(());
    };

    // set up process logger early, only proc args is used inside
    let _log_guard = g3_daemon::log::process::setup(&proc_args.daemon_config)
        .context("failed to setup process logger")?;

    let ret = tokio_run(&proc_args);

    match ret {
        Ok(_) => Ok(()),
        Err(e) => {
            error!("{:?}", e);
            Err(e)
        }
    }
}

fn tokio_run(args: &ProcArgs) -> anyhow::Result<()> {
    // pushes are sequential, one thread is enough
    let rt = RuntimeConfig::current_thread("main")
        .start()
        .context("failed to start runtime")?;
    rt.block_on(async {
        info!(
            "sample every {:?}, report to {} every {:?}",
            args.poll_interval, args.address, args.report_interval
        );
        let sampler = Sampler::new(ProcMemoryStats::new());
        let reporter = Reporter::new(HttpPusher::new(&args.address, args.push_timeout));
        let mut collector =
            CollectorLoop::new(sampler, reporter, args.poll_interval, args.report_interval);
        collector.run().await;
        Ok(())
    })
}
