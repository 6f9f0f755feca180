/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use http::header::{ALLOW, HeaderValue};
use http::{Method, StatusCode};

use g3_http::server::{HttpServerRequest, HttpServerResponse};
use g3mstore_proto::{UPDATE_PATH_PREFIX, VALUE_PATH_PREFIX};

use super::ServeContext;

fn method_not_allowed(allow: &'static str) -> HttpServerResponse {
    super::text_response(StatusCode::METHOD_NOT_ALLOWED, "method not allowed")
        .with_header(ALLOW, HeaderValue::from_static(allow))
}

fn is_read_method(method: &Method) -> bool {
    method == Method::GET || method == Method::HEAD
}

pub(super) fn handle(ctx: &ServeContext, req: &HttpServerRequest) -> HttpServerResponse {
    let path = req.uri.path();

    if let Some(left) = path.strip_prefix(UPDATE_PATH_PREFIX) {
        // the method is checked before the path shape
        if req.method != Method::POST {
            return method_not_allowed("POST");
        }
        super::ingest::handle_update(ctx, left)
    } else if let Some(left) = path.strip_prefix(VALUE_PATH_PREFIX) {
        if !is_read_method(&req.method) {
            return method_not_allowed("GET, HEAD");
        }
        super::query::handle_value(ctx, left)
    } else if path == "/" {
        if !is_read_method(&req.method) {
            return method_not_allowed("GET, HEAD");
        }
        super::query::handle_list(ctx)
    } else {
        super::text_response(StatusCode::NOT_FOUND, "not found")
    }
}
