/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use atoi::FromRadix10;
use http::{StatusCode, Version};

use super::HttpLineParseError;

/// The response status line, `<version> <code> [reason]`.
pub struct HttpStatusLine<'a> {
    pub version: Version,
    pub code: StatusCode,
    pub reason: &'a str,
}

impl<'a> HttpStatusLine<'a> {
    pub fn parse(buf: &'a [u8]) -> Result<HttpStatusLine<'a>, HttpLineParseError> {
        const MINIMAL_LENGTH: usize = 12; // HTTP/1.x XYZ

        let line = super::trim_line_end(buf);
        if line.len() < MINIMAL_LENGTH {
            return Err(HttpLineParseError::NotLongEnough);
        }

        let Some(p) = memchr::memchr(b' ', line) else {
            return Err(HttpLineParseError::NoDelimiterFound(' '));
        };
        let version = super::parse_version(&line[..p])?;

        let left = &line[p + 1..];
        let (code, len) = u16::from_radix_10(left);
        if len != 3 {
            return Err(HttpLineParseError::InvalidStatusCode);
        }
        let code = StatusCode::from_u16(code).map_err(|_| HttpLineParseError::InvalidStatusCode)?;

        let reason = match left.get(len..) {
            Some([b' ', reason @ ..]) => std::str::from_utf8(reason)?.trim(),
            Some([]) | None => "",
            Some(_) => return Err(HttpLineParseError::InvalidStatusCode),
        };

        Ok(HttpStatusLine {
            version,
            code,
            reason,
        })
    }
}
