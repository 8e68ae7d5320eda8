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

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::Entry;
use super::Mode;
use super::json_message;
use crate::Adapter;
use crate::Level;
use crate::Record;
use crate::adapter::ConsoleAdapter;
use crate::adapter::FileAdapter;
use crate::record::Fields;

/// A logger that fans every record out to its adapters.
///
/// Adapters run synchronously on the calling thread, in registration order. Each one receives
/// its own copy of the record, so decorations made by one adapter never leak into another.
///
/// Cloning a logger is cheap and shares the adapters.
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
///
/// logger.info("server started");
/// logger.info_named("http", "listening on :8080");
/// logger.with_field("port", 8080).info("listening");
/// ```
#[derive(Clone, Debug, Default)]
pub struct Logger {
    adapters: Arc<Vec<Box<dyn Adapter>>>,
}

/// A builder for configuring a [`Logger`].
#[derive(Debug, Default)]
pub struct LoggerBuilder {
    adapters: Vec<Box<dyn Adapter>>,
}

impl LoggerBuilder {
    /// Register an adapter. Records reach adapters in registration order.
    #[must_use = "call `build` to create the logger"]
    pub fn adapter(mut self, adapter: impl Into<Box<dyn Adapter>>) -> Self {
        self.adapters.push(adapter.into());
        self
    }

    /// Create the [`Logger`].
    pub fn build(self) -> Logger {
        Logger::new(self.adapters)
    }
}

macro_rules! level_methods {
    ($($level:ident => $plain:ident, $fmt:ident, $named:ident;)+) => {
        $(
            #[doc = concat!("Log a message at the [`Level::", stringify!($level), "`] level.")]
            pub fn $plain(&self, message: impl fmt::Display) {
                self.log(Record::plain(Level::$level, message));
            }

            #[doc = concat!("Log a formatted message at the [`Level::", stringify!($level), "`] level.")]
            pub fn $fmt(&self, args: fmt::Arguments) {
                self.log(Record::formatted(Level::$level, args));
            }

            #[doc = concat!("Log a message with a trace name at the [`Level::", stringify!($level), "`] level.")]
            pub fn $named(&self, trace_name: impl Into<String>, message: impl fmt::Display) {
                self.log(Record::named(Level::$level, trace_name, message));
            }
        )+
    };
}

impl Logger {
    /// Create a logger over the given adapters.
    pub fn new(adapters: impl IntoIterator<Item = Box<dyn Adapter>>) -> Self {
        Self {
            adapters: Arc::new(adapters.into_iter().collect()),
        }
    }

    /// Create a new [`LoggerBuilder`].
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::default()
    }

    /// Create a logger with a default file adapter followed by a default console adapter, with
    /// thresholds taken from the [`Mode`].
    pub fn with_mode(mode: Mode) -> Self {
        Self::builder()
            .adapter(FileAdapter::with_level(mode.file_level()))
            .adapter(ConsoleAdapter::with_level(mode.console_level()))
            .build()
    }

    /// The registered adapters, in dispatch order.
    pub fn adapters(&self) -> &[Box<dyn Adapter>] {
        &self.adapters
    }

    /// Hand a copy of the record to every adapter.
    pub fn log(&self, record: Record) {
        for adapter in self.adapters.iter() {
            adapter.log(record.clone());
        }
    }

    /// Flush every adapter.
    pub fn flush(&self) {
        for adapter in self.adapters.iter() {
            adapter.flush();
        }
    }

    /// Start an [`Entry`] carrying a single field.
    pub fn with_field(&self, key: impl Into<String>, value: impl Into<Value>) -> Entry {
        let mut entry = Entry::new(self.clone());
        entry.with_field(key, value);
        entry
    }

    /// Start an [`Entry`] carrying the given fields.
    pub fn with_fields(&self, fields: Fields) -> Entry {
        let mut entry = Entry::new(self.clone());
        entry.with_fields(fields);
        entry
    }

    /// Start an [`Entry`] with a trace name that sticks across its log calls.
    pub fn with_trace(&self, trace_name: impl Into<String>) -> Entry {
        let mut entry = Entry::new(self.clone());
        entry.with_trace(trace_name);
        entry
    }

    /// Start an [`Entry`] carrying an error.
    pub fn with_error(&self, err: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Entry {
        let mut entry = Entry::new(self.clone());
        entry.with_error(err);
        entry
    }

    /// Log a message without a level.
    ///
    /// Every enabled adapter writes it regardless of its threshold.
    pub fn print(&self, message: impl fmt::Display) {
        self.log(Record::plain(Level::Unselected, message));
    }

    /// Log a formatted message without a level.
    pub fn print_fmt(&self, args: fmt::Arguments) {
        self.log(Record::formatted(Level::Unselected, args));
    }

    level_methods! {
        Debug => debug, debug_fmt, debug_named;
        Info => info, info_fmt, info_named;
        Warn => warn, warn_fmt, warn_named;
        Error => error, error_fmt, error_named;
        Fatal => fatal, fatal_fmt, fatal_named;
    }

    /// Log the pretty-printed JSON form of a value at the debug level.
    ///
    /// If the value cannot be serialized, `error marshaling struct` is logged instead.
    pub fn debug_json(&self, value: &impl Serialize) {
        self.log(Record::plain(Level::Debug, json_message(value)));
    }

    /// Log the pretty-printed JSON form of a value at the debug level, with a trace name.
    pub fn debug_json_named(&self, trace_name: impl Into<String>, value: &impl Serialize) {
        self.log(Record::named(Level::Debug, trace_name, json_message(value)));
    }
}
