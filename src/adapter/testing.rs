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

use std::fmt::Write;

use crate::Adapter;
use crate::Level;
use crate::Record;
use crate::record::display_value;

/// An adapter that writes log records that can be captured by a test harness (like `cargo test`),
/// and thus the outputs are suppressed unless `--nocapture` or `--show-output` is specified.
///
/// # Examples
///
/// ```
/// use logfan::Logger;
/// use logfan::adapter::Testing;
///
/// let logger = Logger::builder().adapter(Testing::default()).build();
/// logger.info("captured by the test harness");
/// ```
#[derive(Debug)]
pub struct Testing {
    level: Level,
}

impl Default for Testing {
    fn default() -> Self {
        Self {
            level: Level::Debug,
        }
    }
}

impl Testing {
    /// Set the minimum level written.
    ///
    /// Default to [`Level::Debug`].
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }
}

impl Adapter for Testing {
    fn format(&self, record: &mut Record) {
        if !record.trace_name().is_empty() {
            let trace = format!("[{}]: ", record.trace_name());
            *record.trace_name_mut() = trace;
        }
    }

    fn log(&self, mut record: Record) {
        if !self.level.is_enabled(record.level()) {
            return;
        }
        self.format(&mut record);
        eprintln!("{}", plain_line(&record));
    }
}

fn plain_line(record: &Record) -> String {
    let mut line = match record.level() {
        Level::Unselected => String::new(),
        level => format!("{:>5} ", level.as_str().to_uppercase()),
    };
    line.push_str(record.trace_name());
    line.push_str(record.message());
    if let Some(err) = record.error() {
        let _ = write!(line, " err={err}");
    }
    for (key, value) in record.fields() {
        let _ = write!(line, " {key}={}", display_value(value));
    }
    line
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::record::Fields;

    #[test]
    fn test_plain_line() {
        let testing = Testing::default();
        let mut fields = Fields::new();
        fields.insert("user".to_string(), json!("ana"));
        let err: crate::record::SharedError = Arc::new(io::Error::other("denied"));
        let mut record = Record::named(Level::Warn, "auth", "login failed")
            .with_fields(fields)
            .with_error(Some(err));
        testing.format(&mut record);

        assert_eq!(
            plain_line(&record),
            " WARN [auth]: login failed err=denied user=ana"
        );
        assert_eq!(
            plain_line(&Record::plain(Level::Unselected, "printed")),
            "printed"
        );
    }
}
