/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

mod kind;
pub use kind::{MetricKind, MetricKindParseError};

mod value;
pub use value::{MetricValue, ValueParseError};

mod path;
pub use path::{PathParseError, UpdatePath, ValuePath};

pub const UPDATE_PATH_PREFIX: &str = "/update/";
pub const VALUE_PATH_PREFIX: &str = "/value/";
