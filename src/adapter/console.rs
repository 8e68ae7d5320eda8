// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Adapter that writes colored log lines to a terminal.

use std::fmt;
use std::io;
use std::io::Write;
use std::sync::Mutex;
use std::sync::MutexGuard;

use anyhow::Context;
use jiff::Zoned;
use serde::Deserialize;

use crate::Adapter;
use crate::Level;
use crate::Record;
use crate::adapter::color::ConsoleColors;
use crate::adapter::color::HexColor;
use crate::adapter::exit_after_fatal;
use crate::record::display_value;
use crate::trap::DefaultTrap;
use crate::trap::Trap;

/// Configuration of the [`ConsoleAdapter`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Whether the adapter writes anything at all.
    pub enable: bool,
    /// The minimum level written.
    pub level: Level,
    /// The palette. Unset entries keep their defaults.
    pub colors: ConsoleColors,
    /// Write plain text without any styling.
    pub no_color: bool,
    /// Terminate the process after writing a fatal record.
    pub exit_on_fatal: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enable: true,
            level: Level::Debug,
            colors: ConsoleColors::default(),
            no_color: false,
            exit_on_fatal: true,
        }
    }
}

/// An adapter that writes colored log lines to stdout or any other stream.
///
/// Output format:
///
/// ```text
/// 2024-08-11 22:44:57 INFO [http]: listening on :8080 port=8080
/// 2024-08-11 22:44:57 ERROR request failed err=connection reset
/// 2024-08-11 22:44:57 printed without a level label
/// ```
///
/// The trace name and fields are painted with the level color, the error with the error color.
///
/// # Examples
///
/// ```
/// use logfan::Level;
/// use logfan::Logger;
/// use logfan::adapter::ConsoleAdapter;
///
/// let logger = Logger::builder()
///     .adapter(ConsoleAdapter::with_level(Level::Info))
///     .build();
/// logger.info("hello");
/// ```
pub struct ConsoleAdapter {
    config: ConsoleConfig,
    writer: Mutex<Box<dyn Write + Send>>,
    trap: Box<dyn Trap>,
}

impl fmt::Debug for ConsoleAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleAdapter")
            .field("config", &self.config)
            .field("trap", &self.trap)
            .finish_non_exhaustive()
    }
}

impl Default for ConsoleAdapter {
    fn default() -> Self {
        Self::new(ConsoleConfig::default())
    }
}

impl ConsoleAdapter {
    /// Create a console adapter writing to stdout.
    pub fn new(config: ConsoleConfig) -> Self {
        Self {
            config,
            writer: Mutex::new(Box::new(io::stdout())),
            trap: Box::new(DefaultTrap::default()),
        }
    }

    /// Create a console adapter with the default configuration and the given threshold.
    pub fn with_level(level: Level) -> Self {
        Self::new(ConsoleConfig {
            level,
            ..ConsoleConfig::default()
        })
    }

    /// Write to the given stream instead of stdout.
    ///
    /// Callers sharing one stream between several adapters are responsible for its consistency.
    pub fn with_writer(mut self, writer: impl Write + Send + 'static) -> Self {
        self.writer = Mutex::new(Box::new(writer));
        self
    }

    /// Set the trap for write errors.
    ///
    /// Default to [`DefaultTrap`].
    pub fn with_trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.trap = trap.into();
        self
    }

    /// The configuration of this adapter.
    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    fn writer(&self) -> MutexGuard<'_, Box<dyn Write + Send>> {
        self.writer.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn paint(&self, color: HexColor, text: impl Into<String>) -> String {
        if self.config.no_color {
            text.into()
        } else {
            color.paint(text).to_string()
        }
    }

    fn write(&self, record: &Record) -> anyhow::Result<()> {
        let colors = &self.config.colors;
        let time = Zoned::now().strftime("%Y-%m-%d %H:%M:%S").to_string();
        let time = self.paint(colors.timestamp, time);
        let trace = record.trace_name();
        let message = record.message();

        let line = match record.level() {
            Level::Unselected => format!("{time} {trace}{message}\n"),
            level => {
                let label = level.as_str().to_uppercase();
                let label = self.paint(colors.levels.get(level), label);
                format!("{time} {label} {trace}{message}\n")
            }
        };

        let mut writer = self.writer();
        writer
            .write_all(line.as_bytes())
            .context("failed to write log line to console")?;
        Ok(())
    }
}

impl Adapter for ConsoleAdapter {
    fn format(&self, record: &mut Record) {
        let colors = &self.config.colors;
        let level_color = colors.levels.get(record.level());

        if !record.trace_name().is_empty() {
            let trace = format!("[{}]: ", record.trace_name());
            *record.trace_name_mut() = self.paint(level_color, trace);
        }

        let mut message = self.paint(colors.message, record.message());
        if let Some(err) = record.error() {
            message.push(' ');
            message.push_str(&self.paint(colors.levels.error, format!("err={err}")));
        }
        for (key, value) in record.fields() {
            message.push(' ');
            let field = format!("{key}={}", display_value(value));
            message.push_str(&self.paint(level_color, field));
        }
        *record.message_mut() = message;
    }

    fn log(&self, mut record: Record) {
        if !self.config.enable || !self.config.level.is_enabled(record.level()) {
            return;
        }

        self.format(&mut record);
        if let Err(err) = self.write(&record) {
            self.trap.trap(&err);
        }

        if record.level() == Level::Fatal && self.config.exit_on_fatal {
            exit_after_fatal(self);
        }
    }

    fn flush(&self) {
        if let Err(err) = self.writer().flush() {
            self.trap.trap(&anyhow::Error::new(err).context("failed to flush console"));
        }
    }
}
