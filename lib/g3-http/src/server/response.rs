/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io::{self, Write};

use http::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use http::{HeaderMap, StatusCode, Version};
use tokio::io::{AsyncWrite, AsyncWriteExt};

pub struct HttpServerResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl HttpServerResponse {
    const RESPONSE_BUFFER_SIZE: usize = 1024;

    pub fn new(status: StatusCode) -> Self {
        HttpServerResponse {
            status,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    pub fn with_body(status: StatusCode, content_type: &'static str, body: Vec<u8>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        HttpServerResponse {
            status,
            headers,
            body,
        }
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    #[inline]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    fn canonical_reason(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or("Unknown")
    }

    /// Encode the full response.
    ///
    /// Content-Length always reflects the body, even if the body is not sent
    /// as in the reply to a HEAD request.
    pub fn serialize(&self, version: Version, keep_alive: bool, send_body: bool) -> Vec<u8> {
        let mut buf = Vec::<u8>::with_capacity(Self::RESPONSE_BUFFER_SIZE + self.body.len());
        // writes to a Vec never fail
        let _ = write!(
            buf,
            "{:?} {} {}\r\n",
            version,
            self.status.as_str(),
            self.canonical_reason()
        );
        for (name, value) in &self.headers {
            buf.extend_from_slice(name.as_str().as_bytes());
            buf.extend_from_slice(b": ");
            buf.extend_from_slice(value.as_bytes());
            buf.extend_from_slice(b"\r\n");
        }
        buf.extend_from_slice(b"Content-Length: ");
        let mut len_buf = itoa::Buffer::new();
        buf.extend_from_slice(len_buf.format(self.body.len()).as_bytes());
        buf.extend_from_slice(b"\r\n");
        buf.extend_from_slice(connection_as_bytes(version, keep_alive));
        buf.extend_from_slice(b"\r\n");
        if send_body {
            buf.extend_from_slice(&self.body);
        }
        buf
    }

    pub async fn write_to<W>(
        &self,
        writer: &mut W,
        version: Version,
        keep_alive: bool,
        send_body: bool,
    ) -> io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let buf = self.serialize(version, keep_alive, send_body);
        writer.write_all(&buf).await?;
        writer.flush().await
    }
}

fn connection_as_bytes(version: Version, keep_alive: bool) -> &'static [u8] {
    match (version, keep_alive) {
        (Version::HTTP_10, true) => b"Connection: Keep-Alive\r\n",
        (_, true) => b"",
        (_, false) => b"Connection: close\r\n",
    }
}
