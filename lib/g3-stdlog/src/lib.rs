/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io::{self, IsTerminal, Write};

use chrono::Local;
use flume::{Receiver, Sender};
use slog::{Drain, KV, Level, OwnedKVList, Record};

mod format;
use format::KvCollector;

const DEFAULT_CHANNEL_CAPACITY: usize = 4096;
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

pub struct AsyncLogConfig {
    pub channel_capacity: usize,
    pub thread_name: String,
}

impl AsyncLogConfig {
    pub fn with_name(thread_name: &str) -> Self {
        AsyncLogConfig {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            thread_name: thread_name.to_string(),
        }
    }
}

pub struct StdLogValue {
    level: Level,
    message: String,
    kv_pairs: Vec<(String, String)>,
    location: Option<String>,
}

impl StdLogValue {
    fn message_str(&self) -> &str {
        if self.message.is_empty() {
            "()"
        } else {
            &self.message
        }
    }
}

/// A slog drain which formats records on the caller side and hands them over
/// to a dedicated io thread. Records are dropped if the channel is full.
pub struct StdLogDrain {
    sender: Sender<StdLogValue>,
    append_code_position: bool,
}

impl Drain for StdLogDrain {
    type Ok = ();
    type Err = slog::Never;

    fn log(&self, record: &Record, logger_values: &OwnedKVList) -> Result<(), slog::Never> {
        let mut kv_pairs = Vec::new();
        let mut collector = KvCollector::new(&mut kv_pairs);
        let _ = logger_values.serialize(record, &mut collector);
        let _ = record.kv().serialize(record, &mut collector);

        let location = if self.append_code_position {
            Some(format!("{}:{}", record.file(), record.line()))
        } else {
            None
        };

        let v = StdLogValue {
            level: record.level(),
            message: record.msg().to_string(),
            kv_pairs,
            location,
        };
        let _ = self.sender.try_send(v);
        Ok(())
    }
}

pub fn new_async_logger(
    async_conf: &AsyncLogConfig,
    append_code_position: bool,
    use_stdout: bool,
) -> StdLogDrain {
    let (sender, receiver) = flume::bounded::<StdLogValue>(async_conf.channel_capacity);

    let io_thread = AsyncIoThread { receiver };

    let _detached_thread = std::thread::Builder::new()
        .name(async_conf.thread_name.clone())
        .spawn(move || {
            if use_stdout {
                io_thread.run_with_stdout();
            } else {
                io_thread.run_with_stderr();
            }
        });

    StdLogDrain {
        sender,
        append_code_position,
    }
}

struct AsyncIoThread {
    receiver: Receiver<StdLogValue>,
}

impl AsyncIoThread {
    fn write_time<IO: Write>(&self, io: &mut IO) -> io::Result<()> {
        let datetime = Local::now();
        write!(io, "{}", datetime.format(TIME_FORMAT))
    }

    fn run_with_stderr(self) {
        let stderr = io::stderr();
        if stderr.is_terminal() {
            self.run(stderr, Self::write_console)
        } else {
            self.run(stderr, Self::write_plain)
        }
    }

    fn run_with_stdout(self) {
        let stdout = io::stdout();
        if stdout.is_terminal() {
            self.run(stdout, Self::write_console)
        } else {
            self.run(stdout, Self::write_plain)
        }
    }

    fn run<IO, F>(&self, mut io: IO, format: F)
    where
        IO: Write,
        F: Fn(&Self, &mut Vec<u8>, StdLogValue) -> io::Result<()>,
    {
        let mut buf: Vec<u8> = Vec::with_capacity(1024);
        while let Ok(v) = self.receiver.recv() {
            buf.clear();
            let _ = format(self, &mut buf, v);
            let _ = io.write_all(&buf);

            while let Ok(v) = self.receiver.try_recv() {
                buf.clear();
                let _ = format(self, &mut buf, v);
                let _ = io.write_all(&buf);
            }

            let _ = io.flush();
        }
    }

    fn write_plain(&self, buf: &mut Vec<u8>, v: StdLogValue) -> io::Result<()> {
        self.write_time(buf)?;
        write!(buf, " {}", v.level.as_short_str())?;
        for (k, v) in &v.kv_pairs {
            write!(buf, " {k}: {v},")?;
        }
        write!(buf, " {}", v.message_str())?;
        if let Some(location) = &v.location {
            write!(buf, " <{location}>")?;
        }
        writeln!(buf)
    }

    fn write_console(&self, buf: &mut Vec<u8>, v: StdLogValue) -> io::Result<()> {
        use anstyle::{AnsiColor, Color, Style};

        const COLOR_MAGENTA: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Magenta)));
        const COLOR_RED: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red)));
        const COLOR_YELLOW: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow)));
        const COLOR_GREEN: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green)));
        const COLOR_CYAN: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan)));
        const COLOR_BLUE: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Blue)));
        const STYLE_BOLD: Style = Style::new().bold();
        const STYLE_ITALIC: Style = Style::new().italic();

        let bold_s = STYLE_BOLD.render();
        let bold_e = STYLE_BOLD.render_reset();

        self.write_time(buf)?;
        let level_color = match v.level {
            Level::Critical => COLOR_MAGENTA,
            Level::Error => COLOR_RED,
            Level::Warning => COLOR_YELLOW,
            Level::Info => COLOR_GREEN,
            Level::Debug => COLOR_CYAN,
            Level::Trace => COLOR_BLUE,
        };
        write!(
            buf,
            " {}{}{}",
            level_color.render(),
            v.level.as_short_str(),
            level_color.render_reset(),
        )?;

        for (k, v) in &v.kv_pairs {
            write!(buf, " {bold_s}{k}{bold_e}={v},")?;
        }

        write!(buf, " {bold_s}{}{bold_e}", v.message_str())?;

        if let Some(location) = &v.location {
            write!(
                buf,
                " <{}{location}{}>",
                STYLE_ITALIC.render(),
                STYLE_ITALIC.render_reset()
            )?;
        }
        writeln!(buf)
    }
}
