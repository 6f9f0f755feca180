/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::str::FromStr;

use http::{HeaderMap, Method, StatusCode, Version};
use tokio::io::AsyncBufRead;

use super::HttpResponseParseError;
use crate::{HttpBodyType, HttpHeaderLine, HttpStatusLine};

pub struct HttpClientResponse {
    pub version: Version,
    pub code: StatusCode,
    pub reason: String,
    pub headers: HeaderMap,
    keep_alive: bool,
    content_length: u64,
    has_content_length: bool,
    chunked_transfer: bool,
}

impl HttpClientResponse {
    fn new(version: Version, code: StatusCode, reason: String) -> Self {
        let keep_alive = version == Version::HTTP_11;
        HttpClientResponse {
            version,
            code,
            reason,
            headers: HeaderMap::new(),
            keep_alive,
            content_length: 0,
            has_content_length: false,
            chunked_transfer: false,
        }
    }

    #[inline]
    pub fn keep_alive(&self) -> bool {
        self.keep_alive
    }

    fn expect_no_body(&self, method: &Method) -> bool {
        self.code.is_informational()
            || self.code == StatusCode::NO_CONTENT
            || self.code == StatusCode::NOT_MODIFIED
            || method.eq(&Method::HEAD)
    }

    pub fn body_type(&self, method: &Method) -> Option<HttpBodyType> {
        if self.expect_no_body(method) {
            None
        } else if self.chunked_transfer {
            Some(HttpBodyType::Chunked)
        } else if self.has_content_length {
            if self.content_length > 0 {
                Some(HttpBodyType::ContentLength(self.content_length))
            } else {
                None
            }
        } else {
            Some(HttpBodyType::ReadUntilEnd)
        }
    }

    /// Drop the response body, at most `max_body_size` bytes of it.
    pub async fn skip_body<R>(
        &mut self,
        reader: &mut R,
        method: &Method,
        max_body_size: u64,
    ) -> Result<(), HttpResponseParseError>
    where
        R: AsyncBufRead + Unpin,
    {
        match self.body_type(method) {
            None => Ok(()),
            Some(HttpBodyType::ContentLength(len)) => {
                if len > max_body_size {
                    self.keep_alive = false;
                    return Err(HttpResponseParseError::TooLargeBody(max_body_size));
                }
                crate::body::discard_exact(reader, len).await?;
                Ok(())
            }
            Some(HttpBodyType::ReadUntilEnd) => {
                self.keep_alive = false;
                if crate::body::discard_to_end(reader, max_body_size).await? {
                    Ok(())
                } else {
                    Err(HttpResponseParseError::TooLargeBody(max_body_size))
                }
            }
            Some(HttpBodyType::Chunked) => {
                self.keep_alive = false;
                Err(HttpResponseParseError::UnsupportedTransferEncoding)
            }
        }
    }

    pub async fn parse<R>(
        reader: &mut R,
        method: &Method,
        max_header_size: usize,
    ) -> Result<Self, HttpResponseParseError>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut line_buf = Vec::<u8>::with_capacity(1024);
        let mut header_size: usize = 0;

        let (found, nr) =
            crate::io::limited_read_line(reader, max_header_size, &mut line_buf).await?;
        if nr == 0 {
            return Err(HttpResponseParseError::RemoteClosed);
        }
        if !found {
            return if nr < max_header_size {
                Err(HttpResponseParseError::IncompleteHeader)
            } else {
                Err(HttpResponseParseError::TooLargeHeader(max_header_size))
            };
        }
        header_size += nr;

        let line = HttpStatusLine::parse(line_buf.as_ref())
            .map_err(HttpResponseParseError::InvalidStatusLine)?;
        let mut rsp = HttpClientResponse::new(line.version, line.code, line.reason.to_string());

        loop {
            if header_size >= max_header_size {
                return Err(HttpResponseParseError::TooLargeHeader(max_header_size));
            }
            line_buf.clear();
            let max_len = max_header_size - header_size;
            let (found, nr) = crate::io::limited_read_line(reader, max_len, &mut line_buf).await?;
            if nr == 0 {
                return Err(HttpResponseParseError::IncompleteHeader);
            }
            if !found {
                return if nr < max_len {
                    Err(HttpResponseParseError::IncompleteHeader)
                } else {
                    Err(HttpResponseParseError::TooLargeHeader(max_header_size))
                };
            }
            header_size += nr;
            if line_buf.as_slice() == b"\n" || line_buf.as_slice() == b"\r\n" {
                // header end line
                break;
            }

            let header = HttpHeaderLine::parse(line_buf.as_ref())
                .map_err(HttpResponseParseError::InvalidHeaderLine)?;
            rsp.handle_header(header)?;
        }

        if !rsp.expect_no_body(method) && !rsp.chunked_transfer && !rsp.has_content_length {
            // read to end and close the connection
            rsp.keep_alive = false;
        }
        Ok(rsp)
    }

    fn handle_header(&mut self, header: HttpHeaderLine) -> Result<(), HttpResponseParseError> {
        match header.name.as_str() {
            "connection" => {
                let value = header
                    .value
                    .to_str()
                    .map(|s| s.to_lowercase())
                    .unwrap_or_default();
                for v in value.split(',') {
                    match v.trim() {
                        "keep-alive" => self.keep_alive = true,
                        "close" => self.keep_alive = false,
                        _ => {}
                    }
                }
            }
            "transfer-encoding" => {
                self.chunked_transfer = true;
            }
            "content-length" => {
                let content_length = header
                    .value
                    .to_str()
                    .ok()
                    .and_then(|s| u64::from_str(s).ok())
                    .ok_or(HttpResponseParseError::InvalidContentLength)?;
                if self.has_content_length && self.content_length != content_length {
                    return Err(HttpResponseParseError::InvalidContentLength);
                }
                self.has_content_length = true;
                self.content_length = content_length;
            }
            _ => {}
        }

        self.headers.append(header.name, header.value);
        Ok(())
    }
}
