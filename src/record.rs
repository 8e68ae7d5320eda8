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

//! Log record.

use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Write;
use std::sync::Arc;

use crate::Level;

pub use serde_json::Value;

/// Structured key-values attached to a record.
pub type Fields = BTreeMap<String, Value>;

/// An error attached to a record.
///
/// Shared read-only between the copies handed to each adapter.
pub type SharedError = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// The payload of a log call.
///
/// Every adapter receives its own clone, so decorating a record in [`Adapter::format`] never leaks
/// into another adapter.
///
/// [`Adapter::format`]: crate::Adapter::format
#[derive(Clone, Debug)]
pub struct Record {
    level: Level,
    message: String,
    trace_name: String,
    fields: Fields,
    error: Option<SharedError>,
}

impl Record {
    /// Create a record whose message is the `Display` form of `message`.
    ///
    /// Use [`concat`] to join several arguments.
    pub fn plain(level: Level, message: impl fmt::Display) -> Self {
        Self::from_message(level, message.to_string())
    }

    /// Create a record whose message is the interpolated `args`.
    ///
    /// # Examples
    ///
    /// ```
    /// use logfan::Level;
    /// use logfan::Record;
    ///
    /// let record = Record::formatted(Level::Info, format_args!("{} + {} = {}", 1, 2, 3));
    /// assert_eq!(record.message(), "1 + 2 = 3");
    /// ```
    pub fn formatted(level: Level, args: fmt::Arguments) -> Self {
        Self::from_message(level, fmt::format(args))
    }

    /// Create a plain record carrying a trace name.
    pub fn named(level: Level, trace_name: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::plain(level, message).with_trace_name(trace_name)
    }

    fn from_message(level: Level, message: String) -> Self {
        Self {
            level,
            message,
            trace_name: String::new(),
            fields: Fields::new(),
            error: None,
        }
    }

    /// Replace the trace name.
    pub fn with_trace_name(mut self, trace_name: impl Into<String>) -> Self {
        self.trace_name = trace_name.into();
        self
    }

    /// Replace the fields.
    pub fn with_fields(mut self, fields: Fields) -> Self {
        self.fields = fields;
        self
    }

    /// Attach an error.
    pub fn with_error(mut self, error: Option<SharedError>) -> Self {
        self.error = error;
        self
    }

    /// The level of the record.
    pub fn level(&self) -> Level {
        self.level
    }

    /// The message of the record.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Mutable access to the message, for decorating adapters.
    pub fn message_mut(&mut self) -> &mut String {
        &mut self.message
    }

    /// The trace name. Empty if the record has none.
    pub fn trace_name(&self) -> &str {
        &self.trace_name
    }

    /// Mutable access to the trace name, for decorating adapters.
    pub fn trace_name_mut(&mut self) -> &mut String {
        &mut self.trace_name
    }

    /// The structured fields. Always present, possibly empty.
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Mutable access to the fields, for decorating adapters.
    pub fn fields_mut(&mut self) -> &mut Fields {
        &mut self.fields
    }

    /// The attached error, if any.
    pub fn error(&self) -> Option<&SharedError> {
        self.error.as_ref()
    }
}

/// Join the `Display` forms of `args` with no separator.
///
/// # Examples
///
/// ```
/// use logfan::record::concat;
///
/// assert_eq!(concat(&[&"retry ", &3, &"/", &5]), "retry 3/5");
/// ```
pub fn concat(args: &[&dyn fmt::Display]) -> String {
    let mut message = String::new();
    for arg in args {
        // writing into a String never fails
        let _ = write!(message, "{arg}");
    }
    message
}

/// Render a field value the way a human reads it: strings without quotes, everything else as
/// JSON.
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
