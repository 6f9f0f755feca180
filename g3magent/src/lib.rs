/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

pub mod collect;
pub mod opts;
pub mod report;
pub mod sample;

mod build;
