/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io;

use tokio::io::{AsyncRead, AsyncReadExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpBodyType {
    ContentLength(u64),
    Chunked,
    ReadUntilEnd,
}

/// Read and drop exactly `len` bytes.
pub(crate) async fn discard_exact<R>(reader: &mut R, len: u64) -> io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut limited = reader.take(len);
    let nr = tokio::io::copy(&mut limited, &mut tokio::io::sink()).await?;
    if nr < len {
        Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("body closed after {nr} of {len} bytes"),
        ))
    } else {
        Ok(())
    }
}

/// Read and drop all data until EOF, at most `max_len` bytes.
///
/// Returns `Ok(false)` if the limit was hit before EOF.
pub(crate) async fn discard_to_end<R>(reader: &mut R, max_len: u64) -> io::Result<bool>
where
    R: AsyncRead + Unpin,
{
    let mut limited = reader.take(max_len.saturating_add(1));
    let nr = tokio::io::copy(&mut limited, &mut tokio::io::sink()).await?;
    Ok(nr <= max_len)
}
