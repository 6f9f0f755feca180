/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;

use anyhow::Context;
use log::error;

use g3_daemon::runtime::RuntimeConfig;

use g3mstore::opts::ProcArgs;
use g3mstore::serve::HttpServer;
use g3mstore::store::MetricStore;

fn main() -> anyhow::Result<()> {
    let Some(proc_args) =
        g3mstore::opts::parse_clap().context("failed to parse command line options")?
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
    let rt = RuntimeConfig::new("main")
        .start()
        .context("failed to start runtime")?;
    rt.block_on(async {
        let store = Arc::new(MetricStore::new());
        let server = HttpServer::bind(&args.address, store, args.serve_config.clone()).await?;
        server.run().await;
        Ok(())
    })
}
