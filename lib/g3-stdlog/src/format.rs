/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::fmt;

use slog::{Key, Serializer};

pub(crate) struct KvCollector<'a> {
    pairs: &'a mut Vec<(String, String)>,
}

impl<'a> KvCollector<'a> {
    pub(crate) fn new(pairs: &'a mut Vec<(String, String)>) -> Self {
        KvCollector { pairs }
    }
}

impl Serializer for KvCollector<'_> {
    fn emit_arguments(&mut self, key: Key, val: &fmt::Arguments) -> slog::Result {
        self.pairs.push((key.to_string(), val.to_string()));
        Ok(())
    }
}
