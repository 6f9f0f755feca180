/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::time::{Duration, Instant};

use anyhow::anyhow;
use clap::{Arg, ArgMatches, Command};

use g3_daemon::opts::{DaemonArgs, DaemonArgsExt};

const ARGS_ADDRESS: &str = "address";
const ARGS_POLL_INTERVAL: &str = "poll-interval";
const ARGS_REPORT_INTERVAL: &str = "report-interval";
const ARGS_PUSH_TIMEOUT: &str = "push-timeout";

const ENV_ADDRESS: &str = "ADDRESS";
const ENV_POLL_INTERVAL: &str = "POLL_INTERVAL";
const ENV_REPORT_INTERVAL: &str = "REPORT_INTERVAL";

const DEFAULT_ADDRESS: &str = "localhost:8080";
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_secs(10);
const DEFAULT_PUSH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug)]
pub struct ProcArgs {
    pub daemon_config: DaemonArgs,
    pub address: String,
    pub poll_interval: Duration,
    pub report_interval: Duration,
    pub push_timeout: Duration,
}

impl Default for ProcArgs {
    fn default() -> Self {
        ProcArgs {
            daemon_config: DaemonArgs::new(crate::build::PKG_NAME),
            address: DEFAULT_ADDRESS.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            report_interval: DEFAULT_REPORT_INTERVAL,
            push_timeout: DEFAULT_PUSH_TIMEOUT,
        }
    }
}

impl ProcArgs {
    fn parse_args(&mut self, args: &ArgMatches) -> anyhow::Result<()> {
        self.daemon_config.parse_clap(args)?;

        if let Some(addr) = args.get_one::<String>(ARGS_ADDRESS) {
            self.address.clone_from(addr);
        }
        if let Some(v) = g3_clap::humanize::get_duration(args, ARGS_POLL_INTERVAL)? {
            self.poll_interval = v;
        }
        if let Some(v) = g3_clap::humanize::get_duration(args, ARGS_REPORT_INTERVAL)? {
            self.report_interval = v;
        }
        if let Some(v) = g3_clap::humanize::get_duration(args, ARGS_PUSH_TIMEOUT)? {
            self.push_timeout = v;
        }
        Ok(())
    }

    fn apply_env(&mut self) -> anyhow::Result<()> {
        if let Some(addr) = g3_clap::env::get_override(ENV_ADDRESS)? {
            self.address = addr;
        }
        if let Some(v) = g3_clap::env::get_duration_override(ENV_POLL_INTERVAL)? {
            self.poll_interval = v;
        }
        if let Some(v) = g3_clap::env::get_duration_override(ENV_REPORT_INTERVAL)? {
            self.report_interval = v;
        }
        Ok(())
    }

    fn check(&self) -> anyhow::Result<()> {
        check_duration("poll interval", self.poll_interval)?;
        check_duration("report interval", self.report_interval)?;
        check_duration("push timeout", self.push_timeout)
    }
}

fn check_duration(name: &str, d: Duration) -> anyhow::Result<()> {
    if d.is_zero() {
        return Err(anyhow!("{name} should not be zero"));
    }
    // timers are armed at now + d
    if Instant::now().checked_add(d).is_none() {
        return Err(anyhow!("{name} {d:?} is too large"));
    }
    Ok(())
}

fn build_cli_args() -> Command {
    Command::new(crate::build::PKG_NAME)
        .append_daemon_args()
        .arg(
            Arg::new(ARGS_ADDRESS)
                .help("Address of the metric store, overridden by env ADDRESS")
                .num_args(1)
                .value_name("HOST:PORT")
                .default_value(DEFAULT_ADDRESS)
                .short('a')
                .long(ARGS_ADDRESS),
        )
        .arg(
            Arg::new(ARGS_POLL_INTERVAL)
                .help("Sample interval, overridden by env POLL_INTERVAL")
                .num_args(1)
                .value_name("DURATION")
                .short('p')
                .long(ARGS_POLL_INTERVAL),
        )
        .arg(
            Arg::new(ARGS_REPORT_INTERVAL)
                .help("Report interval, overridden by env REPORT_INTERVAL")
                .num_args(1)
                .value_name("DURATION")
                .short('r')
                .long(ARGS_REPORT_INTERVAL),
        )
        .arg(
            Arg::new(ARGS_PUSH_TIMEOUT)
                .help("Timeout of a single metric push")
                .num_args(1)
                .value_name("DURATION")
                .long(ARGS_PUSH_TIMEOUT),
        )
}

pub fn parse_clap() -> anyhow::Result<Option<ProcArgs>> {
    let args = build_cli_args().get_matches();

    let mut proc_args = ProcArgs::default();
    proc_args.parse_args(&args)?;

    if proc_args.daemon_config.print_version {
        crate::build::print_version(proc_args.daemon_config.verbose_level);
        return Ok(None);
    }

    proc_args.apply_env()?;
    proc_args.check()?;
    Ok(Some(proc_args))
}
