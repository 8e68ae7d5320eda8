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

//! Color configuration for the console adapter.

use std::fmt;
use std::str::FromStr;

use anyhow::Context;
use colored::Color;
use colored::ColoredString;
use colored::Colorize;
use serde::Deserialize;

use crate::Level;

/// A 24-bit color written as `#rrggbb`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct HexColor {
    r: u8,
    g: u8,
    b: u8,
}

impl HexColor {
    /// Create a color from its components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Paint `text` with this color.
    pub fn paint(&self, text: impl Into<String>) -> ColoredString {
        ColoredString::from(text.into()).color(Color::from(*self))
    }
}

impl From<HexColor> for Color {
    fn from(color: HexColor) -> Self {
        Color::TrueColor {
            r: color.r,
            g: color.g,
            b: color.b,
        }
    }
}

impl fmt::Debug for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl FromStr for HexColor {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            anyhow::bail!("malformed color {s:?}: expected #rrggbb");
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).with_context(|| format!("malformed color {s:?}"))
        };
        Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl TryFrom<String> for HexColor {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Colors for different log levels.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LevelColor {
    /// Color for fatal level logs.
    pub fatal: HexColor,
    /// Color for error level logs.
    pub error: HexColor,
    /// Color for warning level logs.
    pub warn: HexColor,
    /// Color for info level logs.
    pub info: HexColor,
    /// Color for debug level logs.
    pub debug: HexColor,
}

impl Default for LevelColor {
    fn default() -> Self {
        Self {
            fatal: HexColor::rgb(0xff, 0x00, 0x00),
            error: HexColor::rgb(0xaf, 0x00, 0x00),
            warn: HexColor::rgb(0xff, 0xff, 0x18),
            info: HexColor::rgb(0xaf, 0xd7, 0xff),
            debug: HexColor::rgb(0x96, 0x96, 0x96),
        }
    }
}

impl LevelColor {
    /// The color of the given level.
    ///
    /// Unselected records use the info color.
    pub fn get(&self, level: Level) -> HexColor {
        match level {
            Level::Debug => self.debug,
            Level::Info => self.info,
            Level::Warn => self.warn,
            Level::Error => self.error,
            Level::Fatal => self.fatal,
            Level::Unselected => self.info,
        }
    }
}

/// The full palette of the console adapter.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConsoleColors {
    /// Color of the timestamp column.
    pub timestamp: HexColor,
    /// Color of the message text.
    pub message: HexColor,
    /// Per-level colors for labels, trace names and fields.
    pub levels: LevelColor,
}

impl Default for ConsoleColors {
    fn default() -> Self {
        Self {
            timestamp: HexColor::rgb(0x8a, 0x8a, 0x8a),
            message: HexColor::rgb(0xe3, 0xe3, 0xe3),
            levels: LevelColor::default(),
        }
    }
}
