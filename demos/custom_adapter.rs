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

use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use logfan::Adapter;
use logfan::Level;
use logfan::Logger;
use logfan::Record;
use logfan::adapter::ConsoleAdapter;

/// Counts problems and prints them in upper case.
#[derive(Debug, Default)]
struct Alarm {
    count: AtomicUsize,
}

impl Adapter for Alarm {
    fn format(&self, record: &mut Record) {
        *record.message_mut() = record.message().to_uppercase();
    }

    fn log(&self, mut record: Record) {
        if !Level::Warn.is_enabled(record.level()) {
            return;
        }
        self.format(&mut record);
        let n = self.count.fetch_add(1, Ordering::Relaxed) + 1;
        println!("ALARM #{n}: {}", record.message());
    }
}

fn main() {
    let logger = Logger::builder()
        .adapter(ConsoleAdapter::with_level(Level::Info))
        .adapter(Alarm::default())
        .build();

    logger.info("all good");
    logger.warn("disk almost full");
    logger.with_field("code", 500).error("request failed");
}
