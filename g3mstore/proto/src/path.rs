/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use thiserror::Error;

use super::{MetricKind, MetricKindParseError, MetricValue, ValueParseError};

const SEGMENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'_').remove(b'.').remove(b'-');

#[derive(Debug, Error)]
pub enum PathParseError {
    #[error("expect {0} path segments but got {1}")]
    InvalidSegmentCount(usize, usize),
    #[error("invalid percent-encoding in path segment")]
    InvalidEncoding,
    #[error("empty metric name")]
    EmptyName,
    #[error("invalid metric kind: {0}")]
    InvalidKind(#[from] MetricKindParseError),
    #[error("invalid metric value: {0}")]
    InvalidValue(#[from] ValueParseError),
}

impl PathParseError {
    /// Whether the path does not address any metric at all.
    ///
    /// Shape errors are reported as not-found, content errors as bad-request.
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            PathParseError::InvalidSegmentCount(_, _)
                | PathParseError::InvalidEncoding
                | PathParseError::EmptyName
        )
    }
}

fn split_segments<'a, const N: usize>(s: &'a str) -> Result<[Cow<'a, str>; N], PathParseError> {
    let count = s.split('/').count();
    if count != N {
        return Err(PathParseError::InvalidSegmentCount(N, count));
    }

    let mut segments: [Cow<'a, str>; N] = std::array::from_fn(|_| Cow::Borrowed(""));
    for (i, seg) in s.split('/').enumerate() {
        segments[i] = percent_decode_str(seg)
            .decode_utf8()
            .map_err(|_| PathParseError::InvalidEncoding)?;
    }
    Ok(segments)
}

struct EncodedSegment<'a>(&'a str);

impl fmt::Display for EncodedSegment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for s in utf8_percent_encode(self.0, SEGMENT_ENCODE_SET) {
            f.write_str(s)?;
        }
        Ok(())
    }
}

/// The `{kind}/{name}/{value}` part of a push request path.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdatePath {
    pub kind: MetricKind,
    pub name: String,
    pub value: MetricValue,
}

impl UpdatePath {
    pub fn new(name: impl Into<String>, value: MetricValue) -> Self {
        UpdatePath {
            kind: value.kind(),
            name: name.into(),
            value,
        }
    }

    /// Parse the path segments following `/update/`.
    pub fn parse(s: &str) -> Result<Self, PathParseError> {
        let [kind, name, value] = split_segments::<3>(s)?;
        if name.is_empty() {
            return Err(PathParseError::EmptyName);
        }
        let kind = MetricKind::from_str(&kind)?;
        let value = MetricValue::parse(kind, &value)?;
        Ok(UpdatePath {
            kind,
            name: name.into_owned(),
            value,
        })
    }
}

impl fmt::Display for UpdatePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}/{}/{}",
            crate::UPDATE_PATH_PREFIX,
            self.kind,
            EncodedSegment(&self.name),
            self.value
        )
    }
}

/// The `{kind}/{name}` part of a single value query path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValuePath {
    pub kind: MetricKind,
    pub name: String,
}

impl ValuePath {
    /// Parse the path segments following `/value/`.
    pub fn parse(s: &str) -> Result<Self, PathParseError> {
        let [kind, name] = split_segments::<2>(s)?;
        if name.is_empty() {
            return Err(PathParseError::EmptyName);
        }
        let kind = MetricKind::from_str(&kind)?;
        Ok(ValuePath {
            kind,
            name: name.into_owned(),
        })
    }
}

impl fmt::Display for ValuePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}/{}",
            crate::VALUE_PATH_PREFIX,
            self.kind,
            EncodedSegment(&self.name)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_ok() {
        let p = UpdatePath::parse("gauge/Alloc/1024.5").unwrap();
        assert_eq!(p.kind, MetricKind::Gauge);
        assert_eq!(p.name, "Alloc");
        assert_eq!(p.value, MetricValue::Gauge(1024.5));
        assert_eq!(p.to_string(), "/update/gauge/Alloc/1024.5");

        let p = UpdatePath::parse("Counter/PollCount/1").unwrap();
        assert_eq!(p.value, MetricValue::Counter(1));
        assert_eq!(p.to_string(), "/update/counter/PollCount/1");
    }

    #[test]
    fn update_encoded_name() {
        let p = UpdatePath::parse("gauge/heap%20used%2Fmax/1").unwrap();
        assert_eq!(p.name, "heap used/max");
        assert_eq!(p.to_string(), "/update/gauge/heap%20used%2Fmax/1");

        let p = UpdatePath::new("Mem.Rss_anon-1", MetricValue::Gauge(2.5));
        assert_eq!(p.to_string(), "/update/gauge/Mem.Rss_anon-1/2.5");
    }

    #[test]
    fn update_shape_error() {
        for s in ["gauge/Alloc", "gauge/Alloc/1/2", "", "gauge//1", "gauge/%FF/1"] {
            let e = UpdatePath::parse(s).unwrap_err();
            assert!(e.is_shape_error(), "{s}: {e}");
        }
    }

    #[test]
    fn update_content_error() {
        for s in [
            "histogram/Alloc/1",
            "gauge/Alloc/abc",
            "counter/PollCount/1.5",
            "counter/PollCount/abc",
            "gauge/M/NaN-looking-garbage",
            "gauge/Alloc/",
        ] {
            let e = UpdatePath::parse(s).unwrap_err();
            assert!(!e.is_shape_error(), "{s}: {e}");
        }
    }

    #[test]
    fn value_path() {
        let p = ValuePath::parse("counter/PollCount").unwrap();
        assert_eq!(p.kind, MetricKind::Counter);
        assert_eq!(p.name, "PollCount");
        assert_eq!(p.to_string(), "/value/counter/PollCount");

        assert!(ValuePath::parse("counter").unwrap_err().is_shape_error());
        assert!(ValuePath::parse("counter/").unwrap_err().is_shape_error());
        assert!(ValuePath::parse("counter/a/b").unwrap_err().is_shape_error());
        assert!(!ValuePath::parse("timer/a").unwrap_err().is_shape_error());
    }
}
