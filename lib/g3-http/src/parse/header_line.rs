/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use http::{HeaderName, HeaderValue};

use super::HttpLineParseError;

pub struct HttpHeaderLine {
    pub name: HeaderName,
    pub value: HeaderValue,
}

impl HttpHeaderLine {
    pub fn parse(buf: &[u8]) -> Result<HttpHeaderLine, HttpLineParseError> {
        let line = super::trim_line_end(buf);
        let Some(p) = memchr::memchr(b':', line) else {
            return Err(HttpLineParseError::NoDelimiterFound(':'));
        };

        let name = HeaderName::from_bytes(&line[..p])
            .map_err(|_| HttpLineParseError::InvalidHeaderName)?;
        let value = std::str::from_utf8(&line[p + 1..])?.trim();
        let value = HeaderValue::from_str(value).map_err(|_| HttpLineParseError::InvalidHeaderValue)?;

        Ok(HttpHeaderLine { name, value })
    }
}
