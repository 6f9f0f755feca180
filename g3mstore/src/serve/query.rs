/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use http::StatusCode;

use g3_http::server::HttpServerResponse;
use g3mstore_proto::ValuePath;

use super::ServeContext;

pub(super) fn handle_value(ctx: &ServeContext, path: &str) -> HttpServerResponse {
    let query = match ValuePath::parse(path) {
        Ok(query) => query,
        Err(e) => {
            let status = if e.is_shape_error() {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::BAD_REQUEST
            };
            return super::text_response(status, e);
        }
    };

    match ctx.store.get_kind(query.kind, &query.name) {
        Some(v) => HttpServerResponse::with_body(
            StatusCode::OK,
            super::TEXT_PLAIN,
            v.to_string().into_bytes(),
        ),
        None => super::text_response(StatusCode::NOT_FOUND, "metric not found"),
    }
}

pub(super) fn handle_list(ctx: &ServeContext) -> HttpServerResponse {
    let all = ctx.store.list_sorted();
    let body = super::render::render_listing(&all);
    HttpServerResponse::with_body(StatusCode::OK, super::TEXT_HTML, body.into_bytes())
}
