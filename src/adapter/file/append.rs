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

use std::io::Write;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use anyhow::Context;
use jiff::Zoned;
use serde::Deserialize;
use serde::Serialize;

use crate::Adapter;
use crate::Level;
use crate::Record;
use crate::adapter::exit_after_fatal;
use crate::adapter::file::RollingFileWriter;
use crate::adapter::file::RollingFileWriterBuilder;
use crate::adapter::file::Rotation;
use crate::record::Fields;
use crate::trap::DefaultTrap;
use crate::trap::Trap;

/// Configuration of the [`FileAdapter`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Whether the adapter writes anything at all.
    pub enable: bool,
    /// The minimum level written.
    pub level: Level,
    /// Where to write and when to roll over.
    pub rotation: Rotation,
    /// Terminate the process after writing a fatal record.
    pub exit_on_fatal: bool,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            enable: true,
            level: Level::Debug,
            rotation: Rotation::default(),
            exit_on_fatal: true,
        }
    }
}

/// A builder to configure and create a [`FileAdapter`].
#[derive(Debug)]
pub struct FileBuilder {
    config: FileConfig,
    trap: Arc<dyn Trap>,
}

impl FileBuilder {
    /// Create a new file adapter builder.
    pub fn new(config: FileConfig) -> Self {
        Self {
            config,
            trap: Arc::new(DefaultTrap::default()),
        }
    }

    /// Set the trap for construction and write errors.
    ///
    /// Default to [`DefaultTrap`].
    pub fn trap(mut self, trap: impl Trap) -> Self {
        self.trap = Arc::new(trap);
        self
    }

    /// Build the [`FileAdapter`].
    ///
    /// Never fails: if the log file cannot be opened, the error goes to the trap and the adapter
    /// writes nothing.
    pub fn build(self) -> FileAdapter {
        let FileBuilder { config, trap } = self;

        let writer = if config.enable {
            RollingFileWriterBuilder::from_rotation(&config.rotation)
                .trap(trap.clone())
                .build()
                .with_context(|| {
                    format!(
                        "failed to open log file {}; file adapter disabled",
                        config.rotation.filename.display()
                    )
                })
                .inspect_err(|err| trap.trap(err))
                .ok()
        } else {
            None
        };

        FileAdapter {
            config,
            writer: writer.map(Mutex::new),
            trap,
        }
    }
}

/// An adapter that writes one JSON object per line to a rolling file.
///
/// Output format:
///
/// ```json
/// {"level":"info","ts":"2024-08-11T22:44:57.172+0800","msg":"http: listening","fields":{"port":8080}}
/// {"level":"error","ts":"2024-08-11T22:44:57.172+0800","msg":"request failed","error":"connection reset"}
/// ```
///
/// Only the trace name is decorated, as a `name: ` prefix of the message.
#[derive(Debug)]
pub struct FileAdapter {
    config: FileConfig,
    writer: Option<Mutex<RollingFileWriter>>,
    trap: Arc<dyn Trap>,
}

impl FileAdapter {
    /// Create a file adapter from the given configuration.
    pub fn new(config: FileConfig) -> Self {
        FileBuilder::new(config).build()
    }

    /// Create a file adapter with the default configuration and the given threshold.
    pub fn with_level(level: Level) -> Self {
        Self::new(FileConfig {
            level,
            ..FileConfig::default()
        })
    }

    /// The configuration of this adapter.
    pub fn config(&self) -> &FileConfig {
        &self.config
    }

    fn write(&self, writer: &Mutex<RollingFileWriter>, record: &Record) -> anyhow::Result<()> {
        let line = RecordLine {
            level: match record.level() {
                Level::Unselected => Level::Info.as_str(),
                level => level.as_str(),
            },
            ts: Zoned::now().strftime("%Y-%m-%dT%H:%M:%S.%3f%z").to_string(),
            msg: format!("{}{}", record.trace_name(), record.message()),
            error: record.error().map(|err| err.to_string()),
            fields: record.fields(),
        };

        let mut bytes = serde_json::to_vec(&line).context("failed to encode log line")?;
        bytes.push(b'\n');
        lock(writer)
            .write_all(&bytes)
            .context("failed to write log line to file")?;
        Ok(())
    }
}

fn lock(writer: &Mutex<RollingFileWriter>) -> MutexGuard<'_, RollingFileWriter> {
    writer.lock().unwrap_or_else(|e| e.into_inner())
}

#[derive(Debug, Serialize)]
struct RecordLine<'a> {
    level: &'a str,
    ts: String,
    msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Fields::is_empty")]
    fields: &'a Fields,
}

impl Adapter for FileAdapter {
    fn format(&self, record: &mut Record) {
        if !record.trace_name().is_empty() {
            let trace = format!("{}: ", record.trace_name());
            *record.trace_name_mut() = trace;
        }
    }

    fn log(&self, mut record: Record) {
        if !self.config.enable || !self.config.level.is_enabled(record.level()) {
            return;
        }
        let Some(writer) = &self.writer else {
            return;
        };

        self.format(&mut record);
        if let Err(err) = self.write(writer, &record) {
            self.trap.trap(&err);
        }

        if record.level() == Level::Fatal && self.config.exit_on_fatal {
            exit_after_fatal(self);
        }
    }

    fn flush(&self) {
        if let Some(writer) = &self.writer {
            if let Err(err) = lock(writer).flush() {
                self.trap
                    .trap(&anyhow::Error::new(err).context("failed to flush log file"));
            }
        }
    }
}
