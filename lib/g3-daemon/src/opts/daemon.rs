/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use clap::{Arg, ArgAction, ArgMatches, Command};

const ARGS_VERBOSE: &str = "verbose";
const ARGS_VERSION: &str = "version";

pub trait DaemonArgsExt {
    fn append_daemon_args(self) -> Self;
}

#[derive(Debug)]
pub struct DaemonArgs {
    pub verbose_level: u8,
    pub process_name: &'static str,
    pub print_version: bool,
}

impl DaemonArgs {
    pub fn new(process_name: &'static str) -> Self {
        DaemonArgs {
            verbose_level: 0,
            process_name,
            print_version: false,
        }
    }

    pub fn parse_clap(&mut self, args: &ArgMatches) -> anyhow::Result<()> {
        if let Some(verbose_level) = args.get_one::<u8>(ARGS_VERBOSE) {
            self.verbose_level = *verbose_level;
        }
        if args.get_flag(ARGS_VERSION) {
            self.print_version = true;
        }
        Ok(())
    }
}

impl DaemonArgsExt for Command {
    fn append_daemon_args(self) -> Self {
        self.disable_version_flag(true)
            .arg(
                Arg::new(ARGS_VERBOSE)
                    .help("Show verbose output")
                    .num_args(0)
                    .action(ArgAction::Count)
                    .short('v')
                    .long(ARGS_VERBOSE),
            )
            .arg(
                Arg::new(ARGS_VERSION)
                    .help("Show version")
                    .action(ArgAction::SetTrue)
                    .short('V')
                    .long(ARGS_VERSION),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_count() {
        let cmd = Command::new("test").append_daemon_args();
        let args = cmd.try_get_matches_from(["test", "-vv"]).unwrap();

        let mut daemon_args = DaemonArgs::new("test");
        daemon_args.parse_clap(&args).unwrap();
        assert_eq!(daemon_args.verbose_level, 2);
        assert!(!daemon_args.print_version);
    }

    #[test]
    fn version() {
        let cmd = Command::new("test").append_daemon_args();
        let args = cmd.try_get_matches_from(["test", "-V"]).unwrap();

        let mut daemon_args = DaemonArgs::new("test");
        daemon_args.parse_clap(&args).unwrap();
        assert_eq!(daemon_args.verbose_level, 0);
        assert!(daemon_args.print_version);
    }
}
