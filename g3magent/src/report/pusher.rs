/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::time::Duration;

use http::{Method, StatusCode};
use log::debug;
use tokio::io::{AsyncWriteExt, BufStream};
use tokio::net::TcpStream;

use g3_http::client::{HttpClientResponse, HttpResponseParseError};
use g3mstore_proto::UpdatePath;

use super::{MetricPusher, PushError};

const MAX_RESPONSE_HEADER_SIZE: usize = 4096;
const MAX_RESPONSE_BODY_SIZE: u64 = 64 * 1024;

/// Push metrics over a single reused HTTP/1.1 connection.
pub struct HttpPusher {
    address: String,
    timeout: Duration,
    stream: Option<BufStream<TcpStream>>,
}

impl HttpPusher {
    pub fn new(address: &str, timeout: Duration) -> Self {
        let address = address
            .strip_prefix("http://")
            .unwrap_or(address)
            .trim_end_matches('/');
        HttpPusher {
            address: address.to_string(),
            timeout,
            stream: None,
        }
    }

    async fn connect(&self) -> Result<BufStream<TcpStream>, PushError> {
        let stream = TcpStream::connect(&self.address)
            .await
            .map_err(PushError::ConnectFailed)?;
        debug!("connected to {}", self.address);
        Ok(BufStream::new(stream))
    }

    async fn send(
        &self,
        stream: &mut BufStream<TcpStream>,
        path: &UpdatePath,
    ) -> Result<HttpClientResponse, PushError> {
        let header = format!(
            "POST {path} HTTP/1.1\r\n\
             Host: {}\r\n\
             Content-Length: 0\r\n\
             \r\n",
            self.address
        );
        stream
            .write_all(header.as_bytes())
            .await
            .map_err(PushError::WriteFailed)?;
        stream.flush().await.map_err(PushError::WriteFailed)?;

        let mut rsp =
            HttpClientResponse::parse(stream, &Method::POST, MAX_RESPONSE_HEADER_SIZE).await?;
        rsp.skip_body(stream, &Method::POST, MAX_RESPONSE_BODY_SIZE)
            .await?;
        Ok(rsp)
    }

    async fn push_once(&mut self, path: &UpdatePath) -> Result<(), PushError> {
        let (mut stream, reused) = match self.stream.take() {
            Some(stream) => (stream, true),
            None => (self.connect().await?, false),
        };

        let rsp = match self.send(&mut stream, path).await {
            Ok(rsp) => rsp,
            Err(PushError::WriteFailed(_))
            | Err(PushError::ReadFailed(HttpResponseParseError::RemoteClosed))
                if reused =>
            {
                // closed while idle, before any response byte
                debug!("reused connection to {} closed, reconnecting", self.address);
                stream = self.connect().await?;
                self.send(&mut stream, path).await?
            }
            Err(e) => return Err(e),
        };

        if rsp.keep_alive() {
            self.stream = Some(stream);
        }
        if rsp.code != StatusCode::OK {
            return Err(PushError::UnexpectedStatus(rsp.code));
        }
        Ok(())
    }
}

impl MetricPusher for HttpPusher {
    async fn push(&mut self, path: &UpdatePath) -> Result<(), PushError> {
        match tokio::time::timeout(self.timeout, self.push_once(path)).await {
            Ok(r) => r,
            Err(_) => {
                // the connection state is unknown after a cancelled exchange
                self.stream = None;
                Err(PushError::Timeout)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use g3mstore_proto::MetricValue;
    use tokio::io::{AsyncBufReadExt, BufReader};
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn push_to_server() {
        let store = Arc::new(CountingStore::new());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(serve_counting(listener, Arc::clone(&store)));

        let mut pusher = HttpPusher::new(&format!("http://{addr}/"), Duration::from_secs(5));
        for i in 0..3 {
            let path = UpdatePath::new("Alloc", MetricValue::Gauge(i as f64));
            pusher.push(&path).await.unwrap();
        }
        // all three requests went over one connection
        assert_eq!(store.connections(), 1);
        assert_eq!(store.requests(), 3);
    }

    #[tokio::test]
    async fn reconnect_closed_idle() {
        let store = Arc::new(CountingStore::new());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (closed_tx, closed_rx) = tokio::sync::oneshot::channel();
        let server_store = Arc::clone(&store);
        tokio::spawn(async move {
            // answer one request, then close the kept-alive connection
            let (stream, _) = listener.accept().await.unwrap();
            let mut stream = BufReader::new(stream);
            read_request_head(&mut stream).await;
            server_store.requests.fetch_add(1, Ordering::Relaxed);
            stream
                .get_mut()
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n")
                .await
                .unwrap();
            drop(stream);
            let _ = closed_tx.send(());
            serve_counting(listener, server_store).await;
        });

        let mut pusher = HttpPusher::new(&addr.to_string(), Duration::from_secs(5));
        let path = UpdatePath::new("Alloc", MetricValue::Gauge(1.0));
        pusher.push(&path).await.unwrap();
        assert!(pusher.stream.is_some());
        closed_rx.await.unwrap();

        pusher.push(&path).await.unwrap();
        assert_eq!(store.requests(), 2);
        // one new connection besides the closed one
        assert_eq!(store.connections(), 1);
    }

    #[tokio::test]
    async fn no_resend_after_partial_response() {
        let store = Arc::new(CountingStore::new());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server_store = Arc::clone(&store);
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut stream = BufReader::new(stream);
            read_request_head(&mut stream).await;
            server_store.requests.fetch_add(1, Ordering::Relaxed);
            stream
                .get_mut()
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n")
                .await
                .unwrap();
            // the second request is taken but its response is cut short
            read_request_head(&mut stream).await;
            server_store.requests.fetch_add(1, Ordering::Relaxed);
            stream
                .get_mut()
                .write_all(b"HTTP/1.1 200 OK\r\nContent-")
                .await
                .unwrap();
            drop(stream);
            serve_counting(listener, server_store).await;
        });

        let mut pusher = HttpPusher::new(&addr.to_string(), Duration::from_secs(5));
        let path = UpdatePath::new("PollCount", MetricValue::Counter(1));
        pusher.push(&path).await.unwrap();

        let e = pusher.push(&path).await.unwrap_err();
        assert!(matches!(
            e,
            PushError::ReadFailed(HttpResponseParseError::IncompleteHeader)
        ));
        assert!(pusher.stream.is_none());
        assert_eq!(store.requests(), 2);
        // never reconnected to send it again
        assert_eq!(store.connections(), 0);
    }

    #[tokio::test]
    async fn bad_status() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut stream = BufReader::new(stream);
            let mut line = String::new();
            loop {
                line.clear();
                stream.read_line(&mut line).await.unwrap();
                if line == "\r\n" {
                    break;
                }
            }
            stream
                .get_mut()
                .write_all(b"HTTP/1.1 400 Bad Request\r\nContent-Length: 3\r\n\r\nbad")
                .await
                .unwrap();
        });

        let mut pusher = HttpPusher::new(&addr.to_string(), Duration::from_secs(5));
        let path = UpdatePath::new("Alloc", MetricValue::Gauge(1.0));
        let e = pusher.push(&path).await.unwrap_err();
        assert!(matches!(e, PushError::UnexpectedStatus(StatusCode::BAD_REQUEST)));
    }

    #[tokio::test]
    async fn connect_refused() {
        // bind then drop to get a port nobody listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut pusher = HttpPusher::new(&addr.to_string(), Duration::from_secs(5));
        let path = UpdatePath::new("Alloc", MetricValue::Gauge(1.0));
        let e = pusher.push(&path).await.unwrap_err();
        assert!(matches!(e, PushError::ConnectFailed(_)));
    }

    #[tokio::test]
    async fn timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            // accept but never reply
            let (_stream, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(60)).await;
        });

        let mut pusher = HttpPusher::new(&addr.to_string(), Duration::from_millis(100));
        let path = UpdatePath::new("Alloc", MetricValue::Gauge(1.0));
        let e = pusher.push(&path).await.unwrap_err();
        assert!(matches!(e, PushError::Timeout));
        assert!(pusher.stream.is_none());
    }

    struct CountingStore {
        connections: AtomicUsize,
        requests: AtomicUsize,
    }

    impl CountingStore {
        fn new() -> Self {
            CountingStore {
                connections: Default::default(),
                requests: Default::default(),
            }
        }

        fn connections(&self) -> usize {
            self.connections.load(Ordering::Relaxed)
        }

        fn requests(&self) -> usize {
            self.requests.load(Ordering::Relaxed)
        }
    }

    /// Reply 200 to every request, counting connections and requests.
    async fn serve_counting(listener: TcpListener, store: Arc<CountingStore>) {
        loop {
            let (stream, _) = listener.accept().await.unwrap();
            store.connections.fetch_add(1, Ordering::Relaxed);
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                let mut stream = BufReader::new(stream);
                let mut line = String::new();
                loop {
                    line.clear();
                    if stream.read_line(&mut line).await.unwrap() == 0 {
                        return;
                    }
                    if line == "\r\n" {
                        store.requests.fetch_add(1, Ordering::Relaxed);
                        stream
                            .get_mut()
                            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n")
                            .await
                            .unwrap();
                    }
                }
            });
        }
    }

    async fn read_request_head(stream: &mut BufReader<TcpStream>) {
        let mut line = String::new();
        loop {
            line.clear();
            if stream.read_line(&mut line).await.unwrap() == 0 || line == "\r\n" {
                break;
            }
        }
    }
}
