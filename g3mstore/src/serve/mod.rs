/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use http::StatusCode;
use log::{info, warn};
use tokio::net::{TcpListener, TcpStream};

use g3_http::server::HttpServerResponse;

use crate::store::MetricStore;

mod ingest;
mod query;
mod render;
mod route;
mod task;

use task::HttpConnectionTask;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const TEXT_HTML: &str = "text/html; charset=utf-8";

#[derive(Clone, Debug)]
pub struct ServeConfig {
    pub max_header_size: usize,
    pub max_body_size: u64,
}

impl Default for ServeConfig {
    fn default() -> Self {
        ServeConfig {
            max_header_size: 4096,
            max_body_size: 64 * 1024,
        }
    }
}

pub(crate) struct ServeContext {
    store: Arc<MetricStore>,
    config: ServeConfig,
}

pub struct HttpServer {
    listener: TcpListener,
    ctx: Arc<ServeContext>,
}

impl HttpServer {
    pub async fn bind(
        addr: &str,
        store: Arc<MetricStore>,
        config: ServeConfig,
    ) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .context(format!("failed to listen on {addr}"))?;
        Ok(HttpServer {
            listener,
            ctx: Arc::new(ServeContext { store, config }),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections forever, each one served in its own task.
    pub async fn run(self) {
        if let Ok(addr) = self.listener.local_addr() {
            info!("listening on {addr}");
        }
        loop {
            match self.listener.accept().await {
                Ok((stream, peer_addr)) => self.run_task(stream, peer_addr),
                Err(e) => warn!("accept: {e:?}"),
            }
        }
    }

    fn run_task(&self, stream: TcpStream, peer_addr: SocketAddr) {
        let task = HttpConnectionTask::new(&self.ctx, peer_addr);
        tokio::spawn(async move {
            task.into_running(stream).await;
        });
    }
}

fn text_response(status: StatusCode, msg: impl std::fmt::Display) -> HttpServerResponse {
    HttpServerResponse::with_body(status, TEXT_PLAIN, format!("{msg}\n").into_bytes())
}
