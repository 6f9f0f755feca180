/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::num::{ParseFloatError, ParseIntError};
use std::str::FromStr;

use thiserror::Error;

use super::MetricKind;

#[derive(Debug, Error)]
pub enum ValueParseError {
    #[error("empty value")]
    Empty,
    #[error("invalid gauge value: {0}")]
    InvalidGauge(#[from] ParseFloatError),
    #[error("gauge value is not finite")]
    NotFiniteGauge,
    #[error("invalid counter value: {0}")]
    InvalidCounter(#[from] ParseIntError),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Gauge(f64),
    Counter(i64),
}

impl MetricValue {
    pub fn kind(&self) -> MetricKind {
        match self {
            MetricValue::Gauge(_) => MetricKind::Gauge,
            MetricValue::Counter(_) => MetricKind::Counter,
        }
    }

    pub fn parse(kind: MetricKind, s: &str) -> Result<Self, ValueParseError> {
        if s.is_empty() {
            return Err(ValueParseError::Empty);
        }

        match kind {
            MetricKind::Gauge => {
                // f64::from_str also takes "inf" and "NaN"
                let f = f64::from_str(s)?;
                if !f.is_finite() {
                    return Err(ValueParseError::NotFiniteGauge);
                }
                Ok(MetricValue::Gauge(f))
            }
            MetricKind::Counter => {
                let i = i64::from_str(s)?;
                Ok(MetricValue::Counter(i))
            }
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Gauge(v) => fmt::Display::fmt(v, f),
            MetricValue::Counter(i) => f.write_str(itoa::Buffer::new().format(*i)),
        }
    }
}
