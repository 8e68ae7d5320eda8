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

use std::fmt;
use std::sync::OnceLock;

use logfan::Level;
use logfan::Logger;
use logfan::adapter::ConsoleAdapter;
use logfan::adapter::ConsoleConfig;
use logfan::adapter::FileAdapter;
use logfan::adapter::FileConfig;
use logfan::adapter::Testing;
use logfan::adapter::file::Rotation;
use tempfile::TempDir;

static LOGGER: OnceLock<Logger> = OnceLock::new();

struct Thing<'a>(&'a str);

impl fmt::Display for Thing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(logger) = LOGGER.get() {
            logger.debug_fmt(format_args!("formatting wrapping ({})", self.0));
        }
        f.write_str(self.0)
    }
}

// logging from inside the formatting of another log call must not deadlock
#[test]
fn test_meta_logging_in_format_works() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let logger = Logger::builder()
        .adapter(ConsoleAdapter::new(ConsoleConfig {
            no_color: true,
            ..ConsoleConfig::default()
        }))
        .adapter(FileAdapter::new(FileConfig {
            rotation: Rotation {
                filename: temp_dir.path().join("example.log"),
                ..Rotation::default()
            },
            ..FileConfig::default()
        }))
        .adapter(Testing::default().with_level(Level::Debug))
        .build();
    let logger = LOGGER.get_or_init(|| logger);

    logger.info_fmt(format_args!("I'm logging {}!", Thing("aha")));
    logger.with_field("k", 1).info(Thing("entry"));
    logger.flush();

    let contents = std::fs::read_to_string(temp_dir.path().join("example.log")).unwrap();
    assert_eq!(contents.lines().count(), 4);
    assert!(contents.contains("formatting wrapping (aha)"));
    assert!(contents.contains("I'm logging aha!"));
}
