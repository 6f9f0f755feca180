/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

mod error;
pub use error::HttpLineParseError;

mod header_line;
pub use header_line::HttpHeaderLine;

mod status_line;
pub use status_line::HttpStatusLine;

mod method_line;
pub use method_line::HttpMethodLine;

fn trim_line_end(buf: &[u8]) -> &[u8] {
    match buf {
        [left @ .., b'\r', b'\n'] => left,
        [left @ .., b'\n'] => left,
        _ => buf,
    }
}

fn parse_version(buf: &[u8]) -> Result<http::Version, HttpLineParseError> {
    match buf {
        b"HTTP/1.0" => Ok(http::Version::HTTP_10),
        b"HTTP/1.1" => Ok(http::Version::HTTP_11),
        b"HTTP/2.0" | b"HTTP/2" => Err(HttpLineParseError::UnsupportedVersion),
        _ => Err(HttpLineParseError::InvalidVersion),
    }
}
