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
use std::str::FromStr;

use serde::Deserialize;

use crate::Level;

/// A deployment mode, selecting the thresholds of [`Logger::with_mode`].
///
/// | mode    | console | file  |
/// |---------|---------|-------|
/// | `dev`   | debug   | debug |
/// | `debug` | debug   | info  |
/// | `prod`  | info    | warn  |
///
/// [`Logger::with_mode`]: crate::Logger::with_mode
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Everything everywhere.
    Dev,
    /// Full console output, informational file output.
    Debug,
    /// Quiet console, only problems in the file.
    Prod,
}

impl Mode {
    /// The threshold of the console adapter.
    pub fn console_level(self) -> Level {
        match self {
            Mode::Dev | Mode::Debug => Level::Debug,
            Mode::Prod => Level::Info,
        }
    }

    /// The threshold of the file adapter.
    pub fn file_level(self) -> Level {
        match self {
            Mode::Dev => Level::Debug,
            Mode::Debug => Level::Info,
            Mode::Prod => Level::Warn,
        }
    }

    /// The lowercase name of the mode.
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Dev => "dev",
            Mode::Debug => "debug",
            Mode::Prod => "prod",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dev" => Ok(Mode::Dev),
            "debug" => Ok(Mode::Debug),
            "prod" => Ok(Mode::Prod),
            _ => Err(anyhow::anyhow!(
                "unknown mode {s:?}, expected one of dev, debug, prod"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_table() {
        assert_eq!(Mode::Dev.console_level(), Level::Debug);
        assert_eq!(Mode::Dev.file_level(), Level::Debug);
        assert_eq!(Mode::Debug.console_level(), Level::Debug);
        assert_eq!(Mode::Debug.file_level(), Level::Info);
        assert_eq!(Mode::Prod.console_level(), Level::Info);
        assert_eq!(Mode::Prod.file_level(), Level::Warn);
    }

    #[test]
    fn test_parse() {
        assert_eq!("dev".parse::<Mode>().unwrap(), Mode::Dev);
        assert_eq!("DEBUG".parse::<Mode>().unwrap(), Mode::Debug);
        assert_eq!(" prod ".parse::<Mode>().unwrap(), Mode::Prod);
        assert!("staging".parse::<Mode>().is_err());

        for mode in [Mode::Dev, Mode::Debug, Mode::Prod] {
            assert_eq!(mode.to_string().parse::<Mode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_deserialize() {
        let mode: Mode = serde_json::from_str("\"prod\"").unwrap();
        assert_eq!(mode, Mode::Prod);
    }
}
