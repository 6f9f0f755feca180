/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io;

use http::StatusCode;
use thiserror::Error;

use crate::HttpLineParseError;

#[derive(Debug, Error)]
pub enum HttpRequestParseError {
    #[error("client closed")]
    ClientClosed,
    #[error("too large header, should be less than {0}")]
    TooLargeHeader(usize),
    #[error("invalid method line: {0}")]
    InvalidMethodLine(HttpLineParseError),
    #[error("invalid header line: {0}")]
    InvalidHeaderLine(HttpLineParseError),
    #[error("invalid content length")]
    InvalidContentLength,
    #[error("unsupported transfer encoding")]
    UnsupportedTransferEncoding,
    #[error("too large body, should be less than {0}")]
    TooLargeBody(u64),
    #[error("io failed: {0:?}")]
    IoFailed(#[from] io::Error),
}

impl HttpRequestParseError {
    /// The status code to reply with, `None` if the client is gone.
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            HttpRequestParseError::IoFailed(_) | HttpRequestParseError::ClientClosed => None,
            HttpRequestParseError::TooLargeHeader(_) => {
                Some(StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE)
            }
            HttpRequestParseError::TooLargeBody(_) => Some(StatusCode::PAYLOAD_TOO_LARGE),
            HttpRequestParseError::InvalidMethodLine(HttpLineParseError::UnsupportedVersion) => {
                Some(StatusCode::HTTP_VERSION_NOT_SUPPORTED)
            }
            _ => Some(StatusCode::BAD_REQUEST),
        }
    }
}
