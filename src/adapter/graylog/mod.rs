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

//! Adapter for sending GELF messages to a Graylog server over UDP.
//!
//! # Example
//!
//!```no_run
//! use logfan::Level;
//! use logfan::Logger;
//! use logfan::adapter::GraylogAdapter;
//! use logfan::adapter::GraylogConfig;
//!
//! let graylog = GraylogAdapter::new(GraylogConfig {
//!     level: Level::Warn,
//!     addr: "graylog.internal:12201".to_string(),
//!     host: "billing".to_string(),
//!     ..GraylogConfig::default()
//! });
//!
//! let logger = Logger::builder().adapter(graylog).build();
//! logger.warn("This log will be sent to Graylog.");
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
use serde_json::Value;

use crate::Adapter;
use crate::Level;
use crate::Record;
use crate::non_blocking::NonBlocking;
use crate::non_blocking::NonBlockingBuilder;
use crate::non_blocking::WorkerGuard;
use crate::trap::DefaultTrap;
use crate::trap::Trap;

pub use self::message::GelfMessage;
pub use self::writer::GelfUdpWriter;

mod message;
mod writer;

/// How long a flush waits for the sending thread.
const FLUSH_TIMEOUT: Duration = Duration::from_secs(1);

/// Configuration of the [`GraylogAdapter`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GraylogConfig {
    /// Whether the adapter sends anything at all.
    pub enable: bool,
    /// The minimum level sent.
    pub level: Level,
    /// The `host:port` of the Graylog GELF UDP input.
    pub addr: String,
    /// The `host` reported in every message.
    pub host: String,
    /// Gzip every payload before sending.
    pub compress: bool,
}

impl Default for GraylogConfig {
    fn default() -> Self {
        Self {
            enable: true,
            level: Level::Debug,
            addr: "localhost:12201".to_string(),
            host: "APP".to_string(),
            compress: true,
        }
    }
}

/// A builder to configure and create a [`GraylogAdapter`].
#[derive(Debug)]
pub struct GraylogBuilder {
    config: GraylogConfig,
    thread_name: String,
    buffered_lines_limit: Option<usize>,
    trap: Arc<dyn Trap>,
}

impl GraylogBuilder {
    /// Create a new Graylog adapter builder.
    pub fn new(config: GraylogConfig) -> Self {
        Self {
            config,
            thread_name: "logfan-graylog".to_string(),
            buffered_lines_limit: None,
            trap: Arc::new(DefaultTrap::default()),
        }
    }

    /// Set the name of the sending thread.
    pub fn thread_name(mut self, thread_name: impl Into<String>) -> Self {
        self.thread_name = thread_name.into();
        self
    }

    /// Set how many messages may wait for the sending thread before callers block.
    ///
    /// Default to unbounded.
    pub fn buffered_lines_limit(mut self, buffered_lines_limit: Option<usize>) -> Self {
        self.buffered_lines_limit = buffered_lines_limit;
        self
    }

    /// Set the trap for construction and send errors.
    ///
    /// Default to [`DefaultTrap`].
    pub fn trap(mut self, trap: impl Trap) -> Self {
        self.trap = Arc::new(trap);
        self
    }

    /// Build the [`GraylogAdapter`].
    ///
    /// Never fails: if the address cannot be resolved or the socket cannot be opened, the error
    /// goes to the trap and the adapter sends nothing.
    pub fn build(self) -> GraylogAdapter {
        let GraylogBuilder {
            config,
            thread_name,
            buffered_lines_limit,
            trap,
        } = self;

        let sender = if config.enable {
            GelfUdpWriter::connect(&config.addr, config.compress)
                .and_then(|writer| {
                    NonBlockingBuilder::new(thread_name, writer)
                        .buffered_lines_limit(buffered_lines_limit)
                        .trap(trap.clone())
                        .build()
                })
                .with_context(|| format!("error with init graylog at {}", config.addr))
                .inspect_err(|err| trap.trap(err))
                .ok()
        } else {
            None
        };

        GraylogAdapter {
            config,
            sender,
            trap,
        }
    }
}

/// An adapter that sends GELF 1.1 messages to Graylog.
///
/// The trace name and the error are folded into the additional fields as `_trace_name` and
/// `_error`. Sending happens on a dedicated thread. [`Adapter::flush`] and dropping the adapter
/// wait briefly for pending messages to go out. A fatal record is flushed before `log` returns,
/// so it is sent even if a later adapter terminates the process.
#[derive(Debug)]
pub struct GraylogAdapter {
    config: GraylogConfig,
    sender: Option<(NonBlocking<GelfUdpWriter>, WorkerGuard)>,
    trap: Arc<dyn Trap>,
}

impl GraylogAdapter {
    /// Create a Graylog adapter from the given configuration.
    pub fn new(config: GraylogConfig) -> Self {
        GraylogBuilder::new(config).build()
    }

    /// Create a Graylog adapter with the default configuration and the given threshold.
    pub fn with_level(level: Level) -> Self {
        Self::new(GraylogConfig {
            level,
            ..GraylogConfig::default()
        })
    }

    /// The configuration of this adapter.
    pub fn config(&self) -> &GraylogConfig {
        &self.config
    }

    /// Whether the transport was opened.
    pub fn is_connected(&self) -> bool {
        self.sender.is_some()
    }
}

impl Adapter for GraylogAdapter {
    fn format(&self, record: &mut Record) {
        if !record.trace_name().is_empty() {
            let trace = Value::String(record.trace_name().to_string());
            record.fields_mut().insert("trace_name".to_string(), trace);
        }
        if let Some(err) = record.error() {
            let err = Value::String(err.to_string());
            record.fields_mut().insert("error".to_string(), err);
        }
    }

    fn log(&self, mut record: Record) {
        if !self.config.enable || !self.config.level.is_enabled(record.level()) {
            return;
        }
        let Some((sender, _)) = &self.sender else {
            return;
        };

        self.format(&mut record);
        let message = GelfMessage::new(&self.config.host, &record);
        let result = serde_json::to_vec(&message)
            .context("failed to encode gelf message")
            .and_then(|payload| sender.send(payload));
        if let Err(err) = result {
            self.trap.trap(&err);
        }

        if record.level() == Level::Fatal {
            self.flush();
        }
    }

    fn flush(&self) {
        if let Some((sender, _)) = &self.sender {
            if let Err(err) = sender.flush(FLUSH_TIMEOUT) {
                self.trap.trap(&err.context("failed to flush gelf messages"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::io::Read;
    use std::net::UdpSocket;
    use std::sync::Mutex;
    use std::time::Duration;

    use flate2::read::GzDecoder;
    use serde_json::json;

    use super::*;
    use crate::record::Fields;

    #[derive(Debug, Default, Clone)]
    struct Recording(Arc<Mutex<Vec<String>>>);

    impl Trap for Recording {
        fn trap(&self, err: &anyhow::Error) {
            self.0.lock().unwrap().push(format!("{err:#}"));
        }
    }

    fn listen() -> UdpSocket {
        let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
        socket
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        socket
    }

    fn adapter_for(socket: &UdpSocket, compress: bool) -> GraylogAdapter {
        GraylogAdapter::new(GraylogConfig {
            addr: socket.local_addr().unwrap().to_string(),
            host: "billing".to_string(),
            compress,
            ..GraylogConfig::default()
        })
    }

    fn receive(socket: &UdpSocket) -> Vec<u8> {
        let mut buf = vec![0; 65536];
        let n = socket.recv(&mut buf).unwrap();
        buf.truncate(n);
        buf
    }

    #[test]
    fn test_sends_gelf_message() {
        let socket = listen();
        let adapter = adapter_for(&socket, false);
        assert!(adapter.is_connected());

        let mut fields = Fields::new();
        fields.insert("port".to_string(), json!(8080));
        let err: crate::record::SharedError = Arc::new(io::Error::other("reset"));
        adapter.log(
            Record::named(Level::Error, "http", "request failed")
                .with_fields(fields)
                .with_error(Some(err)),
        );
        drop(adapter);

        let message: Value = serde_json::from_slice(&receive(&socket)).unwrap();
        assert_eq!(message["version"], "1.1");
        assert_eq!(message["host"], "billing");
        assert_eq!(message["short_message"], "request failed");
        assert_eq!(message["full_message"], "http: request failed");
        assert_eq!(message["level"], 3);
        assert_eq!(message["_port"], 8080);
        assert_eq!(message["_trace_name"], "http");
        assert_eq!(message["_error"], "reset");
        assert!(message["timestamp"].as_f64().unwrap() > 0.0);
    }

    #[test]
    fn test_sends_compressed_message() {
        let socket = listen();
        let adapter = adapter_for(&socket, true);
        adapter.log(Record::plain(Level::Info, "compressed"));
        drop(adapter);

        let payload = receive(&socket);
        assert_eq!(&payload[..2], &[0x1f, 0x8b]);
        let mut decoded = String::new();
        GzDecoder::new(payload.as_slice())
            .read_to_string(&mut decoded)
            .unwrap();
        let message: Value = serde_json::from_str(&decoded).unwrap();
        assert_eq!(message["short_message"], "compressed");
        assert_eq!(message["level"], 6);
    }

    #[test]
    fn test_flush_sends_pending_messages() {
        let socket = listen();
        let adapter = adapter_for(&socket, false);
        for i in 0..10 {
            adapter.log(Record::plain(Level::Info, format!("message {i}")));
        }
        adapter.flush();

        // every datagram is already queued at the receiver
        socket.set_nonblocking(true).unwrap();
        for i in 0..10 {
            let message: Value = serde_json::from_slice(&receive(&socket)).unwrap();
            assert_eq!(message["short_message"], format!("message {i}"));
        }
        drop(adapter);
    }

    #[test]
    fn test_fatal_is_sent_before_log_returns() {
        let socket = listen();
        let adapter = adapter_for(&socket, false);
        adapter.log(Record::plain(Level::Fatal, "going down"));

        socket.set_nonblocking(true).unwrap();
        let message: Value = serde_json::from_slice(&receive(&socket)).unwrap();
        assert_eq!(message["short_message"], "going down");
        assert_eq!(message["level"], 0);
        drop(adapter);
    }

    #[test]
    fn test_threshold() {
        let socket = listen();
        let adapter = GraylogAdapter::new(GraylogConfig {
            level: Level::Warn,
            compress: false,
            addr: socket.local_addr().unwrap().to_string(),
            ..GraylogConfig::default()
        });
        adapter.log(Record::plain(Level::Info, "dropped"));
        adapter.log(Record::plain(Level::Warn, "kept"));
        drop(adapter);

        let message: Value = serde_json::from_slice(&receive(&socket)).unwrap();
        assert_eq!(message["short_message"], "kept");
    }

    #[test]
    fn test_unresolvable_address_degrades_to_noop() {
        let trap = Recording::default();
        let adapter = GraylogBuilder::new(GraylogConfig {
            addr: "definitely not an address".to_string(),
            ..GraylogConfig::default()
        })
        .trap(trap.clone())
        .build();

        assert!(!adapter.is_connected());
        adapter.log(Record::plain(Level::Fatal, "ignored"));

        let trapped = trap.0.lock().unwrap();
        assert_eq!(trapped.len(), 1);
        assert!(trapped[0].contains("error with init graylog"));
    }

    #[test]
    fn test_disabled_adapter_opens_nothing() {
        let trap = Recording::default();
        let adapter = GraylogBuilder::new(GraylogConfig {
            enable: false,
            addr: "definitely not an address".to_string(),
            ..GraylogConfig::default()
        })
        .trap(trap.clone())
        .build();

        assert!(!adapter.is_connected());
        assert!(trap.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_format_folds_trace_and_error() {
        let adapter = GraylogBuilder::new(GraylogConfig {
            enable: false,
            ..GraylogConfig::default()
        })
        .build();

        let err: crate::record::SharedError = Arc::new(io::Error::other("boom"));
        let mut record = Record::named(Level::Warn, "db", "slow").with_error(Some(err));
        adapter.format(&mut record);
        assert_eq!(record.fields()["trace_name"], "db");
        assert_eq!(record.fields()["error"], "boom");

        let mut record = Record::plain(Level::Warn, "plain");
        adapter.format(&mut record);
        assert!(record.fields().is_empty());
    }
}
