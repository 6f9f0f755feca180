/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use http::StatusCode;
use log::debug;

use g3_http::server::HttpServerResponse;
use g3mstore_proto::UpdatePath;

use super::ServeContext;

/// Apply one push. Invalid input never reaches the store.
pub(super) fn handle_update(ctx: &ServeContext, path: &str) -> HttpServerResponse {
    let update = match UpdatePath::parse(path) {
        Ok(update) => update,
        Err(e) => {
            let status = if e.is_shape_error() {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::BAD_REQUEST
            };
            return super::text_response(status, e);
        }
    };

    let outcome = ctx.store.update(&update.name, update.value);
    debug!(
        "update {} {} {}: {outcome:?}",
        update.kind, update.name, update.value
    );
    HttpServerResponse::new(StatusCode::OK)
}
