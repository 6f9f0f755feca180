/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::env::VarError;
use std::time::Duration;

use anyhow::anyhow;

/// Read an environment variable which should override a command line value.
///
/// An unset variable yields `None`, a set but empty or non UTF-8 one is an error.
pub fn get_override(name: &str) -> anyhow::Result<Option<String>> {
    match std::env::var(name) {
        Ok(s) if s.trim().is_empty() => Err(anyhow!("environment variable {name} is empty")),
        Ok(s) => Ok(Some(s)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(anyhow!(
            "environment variable {name} is not valid unicode"
        )),
    }
}

pub fn get_duration_override(name: &str) -> anyhow::Result<Option<Duration>> {
    let Some(s) = get_override(name)? else {
        return Ok(None);
    };
    crate::humanize::parse_duration(&s)
        .map(Some)
        .map_err(|e| anyhow!("invalid value {s} for environment variable {name}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_present() {
        assert!(get_override("G3_CLAP_TEST_NOT_PRESENT").unwrap().is_none());
        assert!(
            get_duration_override("G3_CLAP_TEST_NOT_PRESENT")
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn duration() {
        unsafe { std::env::set_var("G3_CLAP_TEST_DURATION_OK", "3") };
        assert_eq!(
            get_duration_override("G3_CLAP_TEST_DURATION_OK").unwrap(),
            Some(Duration::from_secs(3))
        );

        unsafe { std::env::set_var("G3_CLAP_TEST_DURATION_BAD", "ten") };
        assert!(get_duration_override("G3_CLAP_TEST_DURATION_BAD").is_err());

        unsafe { std::env::set_var("G3_CLAP_TEST_DURATION_EMPTY", "") };
        assert!(get_duration_override("G3_CLAP_TEST_DURATION_EMPTY").is_err());
    }
}
