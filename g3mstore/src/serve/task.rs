/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use http::{Method, Version};
use log::debug;
use tokio::io::{AsyncBufRead, AsyncWrite, BufReader};
use tokio::net::TcpStream;

use g3_http::server::{HttpRequestParseError, HttpServerRequest};

use super::ServeContext;

enum LoopAction {
    Continue,
    Break,
}

pub(super) struct HttpConnectionTask {
    ctx: Arc<ServeContext>,
    peer_addr: SocketAddr,
}

impl HttpConnectionTask {
    pub(super) fn new(ctx: &Arc<ServeContext>, peer_addr: SocketAddr) -> Self {
        HttpConnectionTask {
            ctx: Arc::clone(ctx),
            peer_addr,
        }
    }

    pub(super) async fn into_running(self, stream: TcpStream) {
        let (r, mut w) = stream.into_split();
        let mut reader = BufReader::new(r);

        loop {
            match self.serve_one(&mut reader, &mut w).await {
                Ok(LoopAction::Continue) => {}
                Ok(LoopAction::Break) => break,
                Err(e) => {
                    debug!("peer {}: write response failed: {e}", self.peer_addr);
                    break;
                }
            }
        }
    }

    async fn serve_one<R, W>(&self, reader: &mut R, writer: &mut W) -> io::Result<LoopAction>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut req =
            match HttpServerRequest::parse(reader, self.ctx.config.max_header_size).await {
                Ok(req) => req,
                Err(HttpRequestParseError::ClientClosed) => return Ok(LoopAction::Break),
                Err(e) => {
                    self.reply_parse_error(writer, e).await?;
                    return Ok(LoopAction::Break);
                }
            };

        if let Err(e) = req
            .skip_body(reader, self.ctx.config.max_body_size)
            .await
        {
            self.reply_parse_error(writer, e).await?;
            return Ok(LoopAction::Break);
        }

        let rsp = super::route::handle(&self.ctx, &req);
        debug!(
            "peer {}: {} {} -> {}",
            self.peer_addr,
            req.method,
            req.uri,
            rsp.status().as_u16()
        );
        let keep_alive = req.keep_alive();
        let send_body = req.method != Method::HEAD;
        rsp.write_to(writer, req.version, keep_alive, send_body)
            .await?;

        if keep_alive {
            Ok(LoopAction::Continue)
        } else {
            Ok(LoopAction::Break)
        }
    }

    async fn reply_parse_error<W>(&self, writer: &mut W, e: HttpRequestParseError) -> io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        match e.status_code() {
            Some(status) => {
                debug!("peer {}: invalid request: {e}", self.peer_addr);
                super::text_response(status, &e)
                    .write_to(writer, Version::HTTP_11, false, true)
                    .await
            }
            None => {
                debug!("peer {}: read request failed: {e}", self.peer_addr);
                Ok(())
            }
        }
    }
}
