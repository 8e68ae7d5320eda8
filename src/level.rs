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

//! Log levels.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

/// The severity of a log record.
///
/// Levels are totally ordered from the most verbose to the most severe:
///
/// ```text
/// Debug < Info < Warn < Error < Fatal < Unselected
/// ```
///
/// `Unselected` is the level of `print`-style calls. It sorts above every other level so that it
/// passes any threshold.
#[repr(i8)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Designates lower priority information.
    Debug = -2,
    /// Designates useful information.
    Info = -1,
    /// Designates hazardous situations.
    Warn = 0,
    /// Designates very serious errors.
    Error = 1,
    /// Designates errors after which the process terminates.
    Fatal = 2,
    /// Designates records that bypass every threshold.
    Unselected = 3,
}

impl Level {
    /// All levels, from the most verbose to the most severe.
    pub const ALL: [Level; 6] = [
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Fatal,
        Level::Unselected,
    ];

    /// Returns `true` if a record of the `candidate` level passes `self` as a threshold.
    ///
    /// # Examples
    ///
    /// ```
    /// use logfan::Level;
    ///
    /// assert!(Level::Info.is_enabled(Level::Warn));
    /// assert!(Level::Info.is_enabled(Level::Info));
    /// assert!(!Level::Info.is_enabled(Level::Debug));
    /// assert!(Level::Fatal.is_enabled(Level::Unselected));
    /// ```
    pub fn is_enabled(self, candidate: Level) -> bool {
        candidate >= self
    }

    /// Return the lowercase name of the level.
    ///
    /// This returns the same string as the `fmt::Display` implementation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Fatal => "fatal",
            Level::Unselected => "unselected",
        }
    }

    /// The syslog-style severity used on the GELF wire.
    pub fn gelf_severity(self) -> u8 {
        match self {
            Level::Debug => 7,
            Level::Info => 6,
            Level::Warn => 4,
            Level::Error => 3,
            Level::Fatal => 0,
            Level::Unselected => 6,
        }
    }
}

impl fmt::Debug for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Level {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Level, Self::Err> {
        for (name, level) in [
            ("debug", Level::Debug),
            ("info", Level::Info),
            ("warn", Level::Warn),
            ("warning", Level::Warn),
            ("error", Level::Error),
            ("fatal", Level::Fatal),
            ("unselected", Level::Unselected),
        ] {
            if s.eq_ignore_ascii_case(name) {
                return Ok(level);
            }
        }

        Err(anyhow::anyhow!("malformed level: {s:?}"))
    }
}
