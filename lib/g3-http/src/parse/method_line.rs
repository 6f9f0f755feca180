/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use http::{Method, Uri, Version};

use super::HttpLineParseError;

/// The request line, `<method> <request-target> <version>`.
pub struct HttpMethodLine {
    pub method: Method,
    pub uri: Uri,
    pub version: Version,
}

impl HttpMethodLine {
    pub fn parse(buf: &[u8]) -> Result<HttpMethodLine, HttpLineParseError> {
        const MINIMAL_LENGTH: usize = 14; // GET / HTTP/1.x

        let line = super::trim_line_end(buf);
        if line.len() < MINIMAL_LENGTH {
            return Err(HttpLineParseError::NotLongEnough);
        }

        let Some(p1) = memchr::memchr(b' ', line) else {
            return Err(HttpLineParseError::NoDelimiterFound(' '));
        };
        let Some(p2) = memchr::memrchr(b' ', line) else {
            return Err(HttpLineParseError::NoDelimiterFound(' '));
        };
        if p1 == p2 {
            return Err(HttpLineParseError::NoDelimiterFound(' '));
        }

        let method =
            Method::from_bytes(&line[..p1]).map_err(|_| HttpLineParseError::InvalidMethod)?;
        let version = super::parse_version(&line[p2 + 1..])?;

        let target = std::str::from_utf8(&line[p1 + 1..p2])?.trim();
        if target.is_empty() {
            return Err(HttpLineParseError::InvalidRequestTarget);
        }
        let uri = Uri::try_from(target).map_err(|_| HttpLineParseError::InvalidRequestTarget)?;

        Ok(HttpMethodLine {
            method,
            uri,
            version,
        })
    }
}
