/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::str::FromStr;
use std::time::Duration;

use anyhow::anyhow;
use clap::ArgMatches;
use humanize_rs::ParseError;

/// Parse a duration given either as a plain number of seconds or as a
/// humanized string like `500ms` or `1m`.
pub fn parse_duration(s: &str) -> anyhow::Result<Duration> {
    let s = s.trim();
    match humanize_rs::duration::parse(s) {
        Ok(v) => Ok(v),
        Err(ParseError::MissingUnit) => {
            if let Ok(u) = u64::from_str(s) {
                Ok(Duration::from_secs(u))
            } else if let Ok(f) = f64::from_str(s) {
                Duration::try_from_secs_f64(f).map_err(anyhow::Error::new)
            } else {
                Err(anyhow!("invalid duration string"))
            }
        }
        Err(e) => Err(anyhow!("invalid humanize duration string: {e}")),
    }
}

pub fn get_duration(args: &ArgMatches, id: &str) -> anyhow::Result<Option<Duration>> {
    match args.get_one::<String>(id) {
        Some(s) => parse_duration(s)
            .map(Some)
            .map_err(|e| anyhow!("invalid {id} value {s}: {e}")),
        None => Ok(None),
    }
}
