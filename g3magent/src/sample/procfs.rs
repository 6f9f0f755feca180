/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::io;
use std::str::FromStr;

use super::MemoryStatsSource;

const STATUS_FIELDS: &[&str] = &[
    "VmPeak", "VmSize", "VmHWM", "VmRSS", "RssAnon", "RssFile", "RssShmem", "VmData", "VmStk",
    "VmExe", "VmLib", "VmPTE", "VmSwap",
];

/// Memory statistics of the current process, read from procfs.
#[derive(Default)]
pub struct ProcMemoryStats {}

impl ProcMemoryStats {
    pub fn new() -> Self {
        ProcMemoryStats::default()
    }
}

impl MemoryStatsSource for ProcMemoryStats {
    #[cfg(target_os = "linux")]
    fn read(&mut self) -> io::Result<Vec<(&'static str, f64)>> {
        let status = std::fs::read_to_string("/proc/self/status")?;
        let mut readings = parse_status(&status);
        let stat = std::fs::read_to_string("/proc/self/stat")?;
        readings.extend(parse_stat(&stat)?);
        Ok(readings)
    }

    #[cfg(not(target_os = "linux"))]
    fn read(&mut self) -> io::Result<Vec<(&'static str, f64)>> {
        Ok(Vec::new())
    }
}

/// Parse the `Vm*` / `Rss*` lines, values are converted to bytes.
fn parse_status(content: &str) -> Vec<(&'static str, f64)> {
    let mut readings = Vec::with_capacity(STATUS_FIELDS.len());
    for line in content.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let Some(name) = STATUS_FIELDS.iter().find(|n| **n == key) else {
            continue;
        };

        let mut parts = value.split_whitespace();
        let Some(Ok(v)) = parts.next().map(u64::from_str) else {
            continue;
        };
        let bytes = match parts.next() {
            Some("kB") => v.saturating_mul(1024),
            _ => v,
        };
        readings.push((*name, bytes as f64));
    }
    readings
}

/// Parse the minor and major page fault counts.
fn parse_stat(content: &str) -> io::Result<Vec<(&'static str, f64)>> {
    // the command name may contain spaces, fields are counted after its closing ')'
    let Some(p) = memchr::memrchr(b')', content.as_bytes()) else {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "no command field found in stat",
        ));
    };
    let fields: Vec<&str> = content[p + 1..].split_whitespace().collect();
    // field 10 is minflt and field 12 is majflt, the state field 3 is the first one here
    let get = |i: usize| -> io::Result<f64> {
        fields
            .get(i)
            .and_then(|s| u64::from_str(s).ok())
            .map(|v| v as f64)
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "invalid stat field"))
    };
    Ok(vec![("MinFlt", get(7)?), ("MajFlt", get(9)?)])
}
