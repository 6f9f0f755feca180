/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::str::FromStr;

use http::{HeaderMap, Method, Uri, Version};
use tokio::io::AsyncBufRead;

use super::HttpRequestParseError;
use crate::{HttpBodyType, HttpHeaderLine, HttpMethodLine};

pub struct HttpServerRequest {
    pub method: Method,
    pub uri: Uri,
    pub version: Version,
    pub headers: HeaderMap,
    keep_alive: bool,
    content_length: u64,
    has_content_length: bool,
    chunked_transfer: bool,
}

impl HttpServerRequest {
    fn new(method: Method, uri: Uri, version: Version) -> Self {
        let keep_alive = version == Version::HTTP_11;
        HttpServerRequest {
            method,
            uri,
            version,
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

    pub fn body_type(&self) -> Option<HttpBodyType> {
        if self.chunked_transfer {
            Some(HttpBodyType::Chunked)
        } else if self.content_length > 0 {
            Some(HttpBodyType::ContentLength(self.content_length))
        } else {
            None
        }
    }

    /// Read and drop the request body so the next request can be parsed.
    pub async fn skip_body<R>(
        &mut self,
        reader: &mut R,
        max_body_size: u64,
    ) -> Result<(), HttpRequestParseError>
    where
        R: AsyncBufRead + Unpin,
    {
        match self.body_type() {
            None => Ok(()),
            Some(HttpBodyType::ContentLength(len)) => {
                if len > max_body_size {
                    self.keep_alive = false;
                    return Err(HttpRequestParseError::TooLargeBody(max_body_size));
                }
                crate::body::discard_exact(reader, len).await?;
                Ok(())
            }
            Some(_) => {
                self.keep_alive = false;
                Err(HttpRequestParseError::UnsupportedTransferEncoding)
            }
        }
    }

    pub async fn parse<R>(
        reader: &mut R,
        max_header_size: usize,
    ) -> Result<Self, HttpRequestParseError>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut line_buf = Vec::<u8>::with_capacity(1024);
        let mut header_size: usize = 0;

        let (found, nr) =
            crate::io::limited_read_line(reader, max_header_size, &mut line_buf).await?;
        if nr == 0 {
            return Err(HttpRequestParseError::ClientClosed);
        }
        if !found {
            return if nr < max_header_size {
                Err(HttpRequestParseError::ClientClosed)
            } else {
                Err(HttpRequestParseError::TooLargeHeader(max_header_size))
            };
        }
        header_size += nr;

        let line = HttpMethodLine::parse(line_buf.as_ref())
            .map_err(HttpRequestParseError::InvalidMethodLine)?;
        let mut req = HttpServerRequest::new(line.method, line.uri, line.version);

        loop {
            if header_size >= max_header_size {
                return Err(HttpRequestParseError::TooLargeHeader(max_header_size));
            }
            line_buf.clear();
            let max_len = max_header_size - header_size;
            let (found, nr) = crate::io::limited_read_line(reader, max_len, &mut line_buf).await?;
            if nr == 0 {
                return Err(HttpRequestParseError::ClientClosed);
            }
            if !found {
                return if nr < max_len {
                    Err(HttpRequestParseError::ClientClosed)
                } else {
                    Err(HttpRequestParseError::TooLargeHeader(max_header_size))
                };
            }
            header_size += nr;
            if line_buf.as_slice() == b"\n" || line_buf.as_slice() == b"\r\n" {
                // header end line
                break;
            }

            let header = HttpHeaderLine::parse(line_buf.as_ref())
                .map_err(HttpRequestParseError::InvalidHeaderLine)?;
            req.handle_header(header)?;
        }

        Ok(req)
    }

    fn handle_header(&mut self, header: HttpHeaderLine) -> Result<(), HttpRequestParseError> {
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
                // chunked or not, we will not read it
                self.chunked_transfer = true;
                self.keep_alive = false;
            }
            "content-length" => {
                let content_length = header
                    .value
                    .to_str()
                    .ok()
                    .and_then(|s| u64::from_str(s).ok())
                    .ok_or(HttpRequestParseError::InvalidContentLength)?;
                if self.has_content_length && self.content_length != content_length {
                    return Err(HttpRequestParseError::InvalidContentLength);
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

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn read_post() {
        let content = b"POST /update/counter/PollCount/1 HTTP/1.1\r\n\
            Host: localhost:8080\r\n\
            Content-Type: text/plain\r\n\
            Content-Length: 0\r\n\r\n";
        let mut reader: &[u8] = content;
        let request = HttpServerRequest::parse(&mut reader, 4096).await.unwrap();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.uri.path(), "/update/counter/PollCount/1");
        assert_eq!(request.version, Version::HTTP_11);
        assert!(request.keep_alive());
        assert!(request.body_type().is_none());

        let result = HttpServerRequest::parse(&mut reader, 4096).await;
        assert!(matches!(result, Err(HttpRequestParseError::ClientClosed)));
    }

    #[tokio::test]
    async fn pipelined_with_body() {
        let content = b"POST /update/gauge/Alloc/1 HTTP/1.1\r\n\
            Content-Length: 5\r\n\r\n\
            hello\
            GET / HTTP/1.1\r\n\
            Connection: close\r\n\r\n";
        let mut reader: &[u8] = content;

        let mut request = HttpServerRequest::parse(&mut reader, 4096).await.unwrap();
        assert_eq!(request.body_type(), Some(HttpBodyType::ContentLength(5)));
        request.skip_body(&mut reader, 1024).await.unwrap();

        let request = HttpServerRequest::parse(&mut reader, 4096).await.unwrap();
        assert_eq!(request.method, Method::GET);
        assert!(!request.keep_alive());
    }

    #[tokio::test]
    async fn http10_keep_alive() {
        let mut reader: &[u8] = b"GET / HTTP/1.0\r\n\r\n";
        let request = HttpServerRequest::parse(&mut reader, 4096).await.unwrap();
        assert!(!request.keep_alive());

        let mut reader: &[u8] = b"GET / HTTP/1.0\r\nConnection: Keep-Alive\r\n\r\n";
        let request = HttpServerRequest::parse(&mut reader, 4096).await.unwrap();
        assert!(request.keep_alive());
    }

    #[tokio::test]
    async fn too_large_header() {
        let mut reader: &[u8] = b"GET / HTTP/1.1\r\nX-Long: aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa\r\n\r\n";
        let result = HttpServerRequest::parse(&mut reader, 32).await;
        assert!(matches!(
            result,
            Err(HttpRequestParseError::TooLargeHeader(32))
        ));
    }

    #[tokio::test]
    async fn chunked_body() {
        let mut reader: &[u8] =
            b"POST /update/gauge/A/1 HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n0\r\n\r\n";
        let mut request = HttpServerRequest::parse(&mut reader, 4096).await.unwrap();
        assert_eq!(request.body_type(), Some(HttpBodyType::Chunked));
        let result = request.skip_body(&mut reader, 1024).await;
        assert!(matches!(
            result,
            Err(HttpRequestParseError::UnsupportedTransferEncoding)
        ));
        assert!(!request.keep_alive());
    }

    #[tokio::test]
    async fn invalid_content_length() {
        let mut reader: &[u8] = b"POST / HTTP/1.1\r\nContent-Length: abc\r\n\r\n";
        let result = HttpServerRequest::parse(&mut reader, 4096).await;
        assert!(matches!(
            result,
            Err(HttpRequestParseError::InvalidContentLength)
        ));
    }

    #[tokio::test]
    async fn truncated_body() {
        let mut reader: &[u8] = b"POST / HTTP/1.1\r\nContent-Length: 10\r\n\r\nabc";
        let mut request = HttpServerRequest::parse(&mut reader, 4096).await.unwrap();
        let result = request.skip_body(&mut reader, 1024).await;
        assert!(matches!(result, Err(HttpRequestParseError::IoFailed(_))));
    }
}
