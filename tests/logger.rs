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

use std::io;
use std::io::Write;
use std::net::UdpSocket;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use logfan::Adapter;
use logfan::Level;
use logfan::Logger;
use logfan::Mode;
use logfan::Record;
use logfan::adapter::ConsoleAdapter;
use logfan::adapter::ConsoleConfig;
use logfan::adapter::FileAdapter;
use logfan::adapter::FileConfig;
use logfan::adapter::GraylogAdapter;
use logfan::adapter::GraylogConfig;
use logfan::adapter::file::Rotation;
use logfan::record::Value;
use tempfile::TempDir;

#[derive(Debug, Default, Clone)]
struct Capture(Arc<Mutex<Vec<Record>>>);

impl Capture {
    fn records(&self) -> Vec<Record> {
        self.0.lock().unwrap().clone()
    }
}

impl Adapter for Capture {
    fn log(&self, record: Record) {
        self.0.lock().unwrap().push(record);
    }
}

#[derive(Debug)]
struct Meddler;

impl Adapter for Meddler {
    fn format(&self, record: &mut Record) {
        record.fields_mut().clear();
        record
            .fields_mut()
            .insert("meddled".to_string(), Value::Bool(true));
        record.trace_name_mut().push_str("!!");
    }

    fn log(&self, mut record: Record) {
        self.format(&mut record);
    }
}

#[derive(Clone, Default)]
struct Buffer(Arc<Mutex<Vec<u8>>>);

impl Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Buffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

fn console(level: Level, enable: bool) -> (ConsoleAdapter, Buffer) {
    let buffer = Buffer::default();
    let adapter = ConsoleAdapter::new(ConsoleConfig {
        enable,
        level,
        no_color: true,
        ..ConsoleConfig::default()
    })
    .with_writer(buffer.clone());
    (adapter, buffer)
}

#[test]
fn test_console_end_to_end() {
    let (adapter, buffer) = console(Level::Info, true);
    let logger = Logger::builder().adapter(adapter).build();

    logger.debug("x");
    assert_eq!(buffer.contents(), "");

    logger.info("x");
    let contents = buffer.contents();
    assert_eq!(contents.lines().count(), 1);
    assert!(contents.contains("x"));
    assert!(contents.contains(" INFO "));
}

#[test]
fn test_unselected_passes_every_threshold() {
    let (adapter, buffer) = console(Level::Fatal, true);
    let logger = Logger::builder().adapter(adapter).build();

    logger.error("dropped");
    logger.print("kept");
    assert_eq!(buffer.contents().lines().count(), 1);
    assert!(buffer.contents().ends_with(" kept\n"));
}

#[test]
fn test_dispatch_isolation() {
    let capture = Capture::default();
    let logger = Logger::builder()
        .adapter(Meddler)
        .adapter(capture.clone())
        .build();

    logger.with_trace("svc").with_field("k", "v").warn("hello");

    let records = capture.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].trace_name(), "svc");
    assert_eq!(records[0].fields().len(), 1);
    assert_eq!(records[0].fields()["k"], "v");
}

#[test]
fn test_entry_one_shot_and_sticky_trace() {
    let capture = Capture::default();
    let logger = Logger::builder().adapter(capture.clone()).build();

    let mut entry = logger.with_trace("first");
    entry.with_trace("second");
    entry
        .with_field("k", 1)
        .with_error(io::Error::other("boom"))
        .error("failed");
    entry.info("again");

    let records = capture.records();
    assert_eq!(records[0].trace_name(), "second");
    assert_eq!(records[0].fields().len(), 1);
    assert!(records[0].error().is_some());
    assert_eq!(records[1].trace_name(), "second");
    assert!(records[1].fields().is_empty());
    assert!(records[1].error().is_none());
}

#[test]
fn test_with_field_replaces_previous_fields() {
    let capture = Capture::default();
    let logger = Logger::builder().adapter(capture.clone()).build();

    logger.with_field("a", 1).with_field("b", 2).info("x");

    let fields = capture.records()[0].fields().clone();
    assert_eq!(fields.len(), 1);
    assert_eq!(fields["b"], 2);
}

#[test]
fn test_disabled_adapters_never_write() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let filename = temp_dir.path().join("disabled.log");
    let (console, buffer) = console(Level::Debug, false);
    let file = FileAdapter::new(FileConfig {
        enable: false,
        rotation: Rotation {
            filename: filename.clone(),
            ..Rotation::default()
        },
        ..FileConfig::default()
    });
    let logger = Logger::builder().adapter(console).adapter(file).build();

    for level in Level::ALL {
        if level != Level::Fatal {
            logger.log(Record::plain(level, "nothing"));
        }
    }
    logger.with_field("k", 1).print("nothing");
    logger.flush();

    assert_eq!(buffer.contents(), "");
    assert!(!filename.exists());
}

#[test]
fn test_mode_factory() {
    for (mode, console, file) in [
        (Mode::Dev, Level::Debug, Level::Debug),
        (Mode::Debug, Level::Debug, Level::Info),
        (Mode::Prod, Level::Info, Level::Warn),
    ] {
        assert_eq!(mode.console_level(), console);
        assert_eq!(mode.file_level(), file);
    }
    assert_eq!("prod".parse::<Mode>().unwrap(), Mode::Prod);
}

#[test]
fn test_file_and_console_share_a_call() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let filename = temp_dir.path().join("app.log");
    let (console, buffer) = console(Level::Debug, true);
    let file = FileAdapter::new(FileConfig {
        level: Level::Warn,
        rotation: Rotation {
            filename: filename.clone(),
            ..Rotation::default()
        },
        exit_on_fatal: false,
        ..FileConfig::default()
    });
    let logger = Logger::builder().adapter(file).adapter(console).build();

    logger.info("only on console");
    logger.with_trace("db").with_field("ms", 1200).warn("slow");
    logger.flush();

    let console = buffer.contents();
    assert_eq!(console.lines().count(), 2);
    assert!(console.contains("WARN [db]: slow ms=1200"));

    let file = std::fs::read_to_string(&filename).unwrap();
    let lines: Vec<Value> = file
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["level"], "warn");
    assert_eq!(lines[0]["msg"], "db: slow");
    assert_eq!(lines[0]["fields"]["ms"], 1200);
}

#[test]
fn test_graylog_severity_on_the_wire() {
    let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    socket
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();
    let graylog = GraylogAdapter::new(GraylogConfig {
        addr: socket.local_addr().unwrap().to_string(),
        compress: false,
        ..GraylogConfig::default()
    });
    let logger = Logger::builder().adapter(graylog).build();

    for level in [Level::Debug, Level::Info, Level::Warn, Level::Error, Level::Fatal] {
        logger.log(Record::plain(level, level));
    }
    drop(logger);

    let mut buf = vec![0; 65536];
    let mut severities = Vec::new();
    for _ in 0..5 {
        let n = socket.recv(&mut buf).unwrap();
        let message: Value = serde_json::from_slice(&buf[..n]).unwrap();
        assert_eq!(message["host"], "APP");
        let level: Level = message["short_message"].as_str().unwrap().parse().unwrap();
        severities.push((level, message["level"].as_u64().unwrap()));
    }
    severities.sort();
    assert_eq!(
        severities,
        [
            (Level::Debug, 7),
            (Level::Info, 6),
            (Level::Warn, 4),
            (Level::Error, 3),
            (Level::Fatal, 0)
        ]
    );
}
