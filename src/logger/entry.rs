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
use std::mem;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::json_message;
use crate::Level;
use crate::Logger;
use crate::Record;
use crate::record::Fields;
use crate::record::SharedError;

/// A builder that accumulates context for the next log call of a [`Logger`].
///
/// Fields and the error are one-shot: every log call consumes them. The trace name sticks until
/// [`Entry::clear_trace`] is called.
///
/// # Examples
///
/// ```
/// use logfan::Logger;
/// use logfan::adapter::Testing;
///
/// let logger = Logger::builder().adapter(Testing::default()).build();
///
/// let mut entry = logger.with_trace("db");
/// entry.with_field("table", "users").warn("slow query");
/// // The trace name is still set, the field is gone.
/// entry.info("query finished");
/// ```
#[derive(Debug)]
pub struct Entry {
    logger: Logger,
    trace_name: Option<String>,
    fields: Fields,
    error: Option<SharedError>,
}

macro_rules! level_methods {
    ($($level:ident => $plain:ident, $fmt:ident;)+) => {
        $(
            #[doc = concat!("Log a message at the [`Level::", stringify!($level), "`] level.")]
            pub fn $plain(&mut self, message: impl fmt::Display) {
                self.log(Record::plain(Level::$level, message));
            }

            #[doc = concat!("Log a formatted message at the [`Level::", stringify!($level), "`] level.")]
            pub fn $fmt(&mut self, args: fmt::Arguments) {
                self.log(Record::formatted(Level::$level, args));
            }
        )+
    };
}

impl Entry {
    /// Create an empty entry bound to the logger.
    pub fn new(logger: Logger) -> Self {
        Self {
            logger,
            trace_name: None,
            fields: Fields::new(),
            error: None,
        }
    }

    /// Set the fields to a single key-value pair.
    ///
    /// This **replaces** any fields accumulated so far: two calls in a row keep only the second
    /// pair. Build a [`Fields`] map and use [`Entry::with_fields`] to attach several.
    pub fn with_field(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.fields = Fields::from([(key.into(), value.into())]);
        self
    }

    /// Set the fields, replacing any fields accumulated so far.
    pub fn with_fields(&mut self, fields: Fields) -> &mut Self {
        self.fields = fields;
        self
    }

    /// Set a trace name that applies to every following log call.
    pub fn with_trace(&mut self, trace_name: impl Into<String>) -> &mut Self {
        self.trace_name = Some(trace_name.into());
        self
    }

    /// Remove the trace name.
    pub fn clear_trace(&mut self) -> &mut Self {
        self.trace_name = None;
        self
    }

    /// Attach an error to the next log call.
    pub fn with_error(&mut self, err: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> &mut Self {
        self.error = Some(Arc::from(err.into()));
        self
    }

    /// Dispatch a record carrying the accumulated context, then reset fields and error.
    ///
    /// The record's own trace name, fields and error are replaced by the entry's.
    pub fn log(&mut self, record: Record) {
        let record = record
            .with_trace_name(self.trace_name.clone().unwrap_or_default())
            .with_fields(mem::take(&mut self.fields))
            .with_error(self.error.take());
        self.logger.log(record);
    }

    /// Log a message without a level.
    pub fn print(&mut self, message: impl fmt::Display) {
        self.log(Record::plain(Level::Unselected, message));
    }

    /// Log a formatted message without a level.
    pub fn print_fmt(&mut self, args: fmt::Arguments) {
        self.log(Record::formatted(Level::Unselected, args));
    }

    level_methods! {
        Debug => debug, debug_fmt;
        Info => info, info_fmt;
        Warn => warn, warn_fmt;
        Error => error, error_fmt;
        Fatal => fatal, fatal_fmt;
    }

    /// Log the pretty-printed JSON form of a value at the debug level.
    ///
    /// If the value cannot be serialized, `error marshaling struct` is logged instead.
    pub fn debug_json(&mut self, value: &impl Serialize) {
        self.log(Record::plain(Level::Debug, json_message(value)));
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use serde_json::json;

    use super::*;
    use crate::logger::testkit::Capture;

    fn capture_logger() -> (Logger, Capture) {
        let capture = Capture::default();
        let logger = Logger::builder().adapter(capture.clone()).build();
        (logger, capture)
    }

    #[test]
    fn test_fields_and_error_are_one_shot() {
        let (logger, capture) = capture_logger();
        let mut entry = logger.with_field("k", 1);
        entry.with_error(io::Error::other("boom"));
        entry.info("a");
        entry.info("b");

        let records = capture.records();
        assert_eq!(records[0].fields(), &Fields::from([("k".to_string(), json!(1))]));
        assert_eq!(records[0].error().unwrap().to_string(), "boom");
        assert!(records[1].fields().is_empty());
        assert!(records[1].error().is_none());
    }

    #[test]
    fn test_with_field_replaces() {
        let (logger, capture) = capture_logger();
        logger.with_field("a", 1).with_field("b", 2).warn("x");

        let mut fields = Fields::new();
        fields.insert("x".to_string(), json!("y"));
        fields.insert("z".to_string(), json!(false));
        logger.with_field("a", 1).with_fields(fields.clone()).warn("y");

        let records = capture.records();
        assert_eq!(records[0].fields(), &Fields::from([("b".to_string(), json!(2))]));
        assert_eq!(records[1].fields(), &fields);
    }

    #[test]
    fn test_trace_persists_until_cleared() {
        let (logger, capture) = capture_logger();
        let mut entry = logger.with_trace("T");
        entry.info("one");
        entry.error_fmt(format_args!("two {}", 2));
        entry.clear_trace().debug("three");

        let records = capture.records();
        assert_eq!(records[0].trace_name(), "T");
        assert_eq!(records[1].trace_name(), "T");
        assert_eq!(records[1].message(), "two 2");
        assert_eq!(records[2].trace_name(), "");
    }

    #[test]
    fn test_entry_levels() {
        let (logger, capture) = capture_logger();
        let mut entry = Entry::new(logger);
        entry.print("p");
        entry.print_fmt(format_args!("{}", "pf"));
        entry.fatal("f");
        entry.debug_json(&vec![1, 2]);

        let records = capture.records();
        assert_eq!(records[0].level(), Level::Unselected);
        assert_eq!(records[1].message(), "pf");
        assert_eq!(records[2].level(), Level::Fatal);
        assert_eq!(records[3].message(), "[\n  1,\n  2\n]");
    }
}
