/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use anyhow::anyhow;
use clap::{Arg, ArgMatches, Command, value_parser};

use g3_daemon::opts::{DaemonArgs, DaemonArgsExt};

use crate::serve::ServeConfig;

const ARGS_ADDRESS: &str = "address";
const ARGS_MAX_HEADER_SIZE: &str = "max-header-size";
const ARGS_MAX_BODY_SIZE: &str = "max-body-size";

const ENV_ADDRESS: &str = "ADDRESS";

const DEFAULT_ADDRESS: &str = "localhost:8080";

#[derive(Debug)]
pub struct ProcArgs {
    pub daemon_config: DaemonArgs,
    pub address: String,
    pub serve_config: ServeConfig,
}

impl Default for ProcArgs {
    fn default() -> Self {
        ProcArgs {
            daemon_config: DaemonArgs::new(crate::build::PKG_NAME),
            address: DEFAULT_ADDRESS.to_string(),
            serve_config: ServeConfig::default(),
        }
    }
}

impl ProcArgs {
    fn parse_args(&mut self, args: &ArgMatches) -> anyhow::Result<()> {
        self.daemon_config.parse_clap(args)?;

        if let Some(addr) = args.get_one::<String>(ARGS_ADDRESS) {
            self.address.clone_from(addr);
        }
        if let Some(size) = args.get_one::<usize>(ARGS_MAX_HEADER_SIZE) {
            if *size == 0 {
                return Err(anyhow!("invalid zero max header size"));
            }
            self.serve_config.max_header_size = *size;
        }
        if let Some(size) = args.get_one::<u64>(ARGS_MAX_BODY_SIZE) {
            self.serve_config.max_body_size = *size;
        }
        Ok(())
    }

    fn apply_env(&mut self) -> anyhow::Result<()> {
        if let Some(addr) = g3_clap::env::get_override(ENV_ADDRESS)? {
            self.address = addr;
        }
        Ok(())
    }
}

fn build_cli_args() -> Command {
    Command::new(crate::build::PKG_NAME)
        .append_daemon_args()
        .arg(
            Arg::new(ARGS_ADDRESS)
                .help("Address to listen on, the host part is bound as given \
                    (use 0.0.0.0 for all interfaces), overridden by env ADDRESS")
                .num_args(1)
                .value_name("HOST:PORT")
                .default_value(DEFAULT_ADDRESS)
                .short('a')
                .long(ARGS_ADDRESS),
        )
        .arg(
            Arg::new(ARGS_MAX_HEADER_SIZE)
                .help("Max size of a request header")
                .num_args(1)
                .value_name("BYTES")
                .value_parser(value_parser!(usize))
                .long(ARGS_MAX_HEADER_SIZE),
        )
        .arg(
            Arg::new(ARGS_MAX_BODY_SIZE)
                .help("Max size of a request body to drop")
                .num_args(1)
                .value_name("BYTES")
                .value_parser(value_parser!(u64))
                .long(ARGS_MAX_BODY_SIZE),
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
    Ok(Some(proc_args))
}
