/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::fmt::Write;
use std::sync::Arc;

use g3mstore_proto::MetricValue;

fn push_escaped(buf: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '<' => buf.push_str("&lt;"),
            '>' => buf.push_str("&gt;"),
            '&' => buf.push_str("&amp;"),
            '"' => buf.push_str("&quot;"),
            '\'' => buf.push_str("&#39;"),
            _ => buf.push(c),
        }
    }
}

pub(super) fn render_listing(all: &[(Arc<str>, MetricValue)]) -> String {
    let mut buf = String::with_capacity(64 + all.len() * 32);
    buf.push_str("<html><body><h1>Metrics</h1>");
    for (name, value) in all {
        buf.push_str("<p>");
        push_escaped(&mut buf, name);
        // writes to a String never fail
        let _ = write!(buf, ": {value}</p>");
    }
    buf.push_str("</body></html>");
    buf
}
