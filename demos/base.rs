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

use logfan::Level;
use logfan::Logger;
use logfan::adapter::ConsoleAdapter;
use logfan::adapter::FileAdapter;
use logfan::adapter::FileConfig;
use logfan::adapter::GraylogAdapter;
use logfan::adapter::GraylogConfig;
use logfan::adapter::file::Rotation;
use logfan::record::Fields;
use serde::Serialize;

#[derive(Serialize)]
struct Config {
    port: u16,
    workers: usize,
}

fn main() {
    let logger = Logger::builder()
        .adapter(FileAdapter::new(FileConfig {
            level: Level::Info,
            rotation: Rotation {
                filename: "logs/example.log".into(),
                max_size_mb: 1,
                max_backups: 10,
                ..Rotation::default()
            },
            ..FileConfig::default()
        }))
        .adapter(ConsoleAdapter::with_level(Level::Debug))
        .adapter(GraylogAdapter::new(GraylogConfig {
            level: Level::Warn,
            ..GraylogConfig::default()
        }))
        .build();

    logger.print("Hello print!");
    logger.debug("Hello debug!");
    logger.info("Hello info!");
    logger.warn("Hello warn!");
    logger.error("Hello error!");
    logger.info_named("http", "listening");
    logfan::log_info!(logger, "{} workers ready", 4);

    logger.debug_json(&Config {
        port: 8080,
        workers: 4,
    });

    let mut fields = Fields::new();
    fields.insert("method".to_string(), "GET".into());
    fields.insert("status".to_string(), 503.into());
    logger
        .with_trace("http")
        .with_fields(fields)
        .with_error(std::io::Error::other("upstream unavailable"))
        .error("request failed");

    let mut entry = logger.with_trace("db");
    entry.with_field("table", "users").warn("slow query");
    entry.info("query finished");
    entry.clear_trace().info("done");

    logger.flush();
}
