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

use std::collections::BTreeMap;

use jiff::Timestamp;
use serde::Serialize;
use serde_json::Value;

use crate::Record;

/// A GELF 1.1 message.
///
/// Record fields become additional fields with a leading underscore. GELF only accepts word
/// characters, `.` and `-` in field names, so every other character of a key is replaced with
/// `_`. A field named `id` is dropped since GELF reserves `_id`.
#[derive(Debug, Serialize)]
pub struct GelfMessage<'a> {
    version: &'static str,
    host: &'a str,
    short_message: &'a str,
    full_message: String,
    timestamp: f64,
    level: u8,
    #[serde(flatten)]
    additional: BTreeMap<String, &'a Value>,
}

impl<'a> GelfMessage<'a> {
    /// Build a message from a formatted record, stamped with the current time.
    pub fn new(host: &'a str, record: &'a Record) -> Self {
        Self::at(host, record, Timestamp::now())
    }

    fn at(host: &'a str, record: &'a Record, now: Timestamp) -> Self {
        let full_message = match record.trace_name() {
            "" => record.message().to_string(),
            trace => format!("{trace}: {}", record.message()),
        };
        let additional = record
            .fields()
            .iter()
            .filter(|(key, _)| key.as_str() != "id")
            .map(|(key, value)| (format!("_{}", sanitize_key(key)), value))
            .collect();

        Self {
            version: "1.1",
            host,
            short_message: record.message(),
            full_message,
            timestamp: now.as_millisecond() as f64 / 1000.0,
            level: record.level().gelf_severity(),
            additional,
        }
    }
}

fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '.' | '-' => c,
            _ => '_',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::Level;
    use crate::record::Fields;

    #[test]
    fn test_message_layout() {
        let mut fields = Fields::new();
        fields.insert("id".to_string(), json!(7));
        fields.insert("user".to_string(), json!("ana"));
        let record = Record::plain(Level::Debug, "hello").with_fields(fields);
        let now: Timestamp = "2024-08-11T14:44:57.172Z".parse().unwrap();

        let message = serde_json::to_value(GelfMessage::at("api", &record, now)).unwrap();
        assert_eq!(
            message,
            json!({
                "version": "1.1",
                "host": "api",
                "short_message": "hello",
                "full_message": "hello",
                "timestamp": 1723387497.172,
                "level": 7,
                "_user": "ana",
            })
        );
    }

    #[test]
    fn test_field_keys_are_sanitized() {
        let mut fields = Fields::new();
        fields.insert("request id".to_string(), json!("r-1"));
        fields.insert("db.latency-ms".to_string(), json!(12));
        fields.insert("naïve/key".to_string(), json!(true));
        let record = Record::plain(Level::Info, "hello").with_fields(fields);

        let message = serde_json::to_value(GelfMessage::new("api", &record)).unwrap();
        assert_eq!(message["_request_id"], "r-1");
        assert_eq!(message["_db.latency-ms"], 12);
        assert_eq!(message["_na_ve_key"], true);
        assert!(message.get("_request id").is_none());
    }
}
