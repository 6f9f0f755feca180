/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

/// Read until `\n`, but never more than `max_len` bytes.
///
/// Returns whether the delimiter was found and how many bytes were read.
pub(crate) async fn limited_read_line<R>(
    reader: &mut R,
    max_len: usize,
    buf: &mut Vec<u8>,
) -> io::Result<(bool, usize)>
where
    R: AsyncBufRead + Unpin,
{
    let start = buf.len();
    let mut limited = reader.take(max_len as u64);
    let nr = limited.read_until(b'\n', buf).await?;
    let found = buf.len() > start && buf.last() == Some(&b'\n');
    Ok((found, nr))
}
