/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io;

use thiserror::Error;

use crate::HttpLineParseError;

#[derive(Debug, Error)]
pub enum HttpResponseParseError {
    #[error("remote closed")]
    RemoteClosed,
    #[error("remote closed in the middle of the header")]
    IncompleteHeader,
    #[error("too large header, should be less than {0}")]
    TooLargeHeader(usize),
    #[error("invalid status line: {0}")]
    InvalidStatusLine(HttpLineParseError),
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
