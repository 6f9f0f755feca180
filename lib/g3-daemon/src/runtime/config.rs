/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use anyhow::anyhow;
use log::debug;
use tokio::runtime::{Builder, Runtime};

pub struct RuntimeConfig {
    current_thread: bool,
    thread_name: String,
}

impl RuntimeConfig {
    /// Spread tasks over one worker thread per cpu core.
    pub fn new(thread_name: &str) -> Self {
        RuntimeConfig {
            current_thread: false,
            thread_name: thread_name.to_string(),
        }
    }

    /// Run all tasks on the thread which calls `block_on`.
    pub fn current_thread(thread_name: &str) -> Self {
        RuntimeConfig {
            current_thread: true,
            thread_name: thread_name.to_string(),
        }
    }

    pub fn start(&self) -> anyhow::Result<Runtime> {
        let mut builder = if self.current_thread {
            Builder::new_current_thread()
        } else {
            Builder::new_multi_thread()
        };
        debug!(
            "starting runtime {}, current thread: {}",
            self.thread_name, self.current_thread
        );
        builder
            .thread_name(&self.thread_name)
            .enable_all()
            .build()
            .map_err(|e| anyhow!("failed to build runtime {}: {e}", self.thread_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_thread() {
        let rt = RuntimeConfig::current_thread("test-main").start().unwrap();
        let v = rt.block_on(async { 1 + 1 });
        assert_eq!(v, 2);
    }

    #[test]
    fn multi_thread() {
        let rt = RuntimeConfig::new("test-worker").start().unwrap();
        let v = rt.block_on(async { tokio::spawn(async { 40 + 2 }).await.unwrap() });
        assert_eq!(v, 42);
    }
}
