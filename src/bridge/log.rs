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

use crate::Level;
use crate::Logger;
use crate::Record;

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Level::Error,
            log::Level::Warn => Level::Warn,
            log::Level::Info => Level::Info,
            log::Level::Debug | log::Level::Trace => Level::Debug,
        }
    }
}

impl log::Log for Logger {
    fn enabled(&self, _: &log::Metadata) -> bool {
        // each adapter applies its own threshold
        !self.adapters().is_empty()
    }

    fn log(&self, record: &log::Record) {
        Logger::log(self, Record::formatted(record.level().into(), *record.args()));
    }

    fn flush(&self) {
        Logger::flush(self);
    }
}

impl Logger {
    /// Set up the log crate global logger with this [`Logger`].
    ///
    /// Records from the `log` macros keep their message and level. `trace` maps to
    /// [`Level::Debug`].
    ///
    /// This function will set the global maximum log level to `Trace`. To override this, call
    /// [`log::set_max_level`] after this function.
    ///
    /// # Errors
    ///
    /// An error is returned if the global logger has already been set.
    ///
    /// # Examples
    ///
    /// ```
    /// use logfan::Logger;
    /// use logfan::adapter::Testing;
    ///
    /// let logger = Logger::builder().adapter(Testing::default()).build();
    /// logger.clone().apply().unwrap();
    ///
    /// log::info!("forwarded to every adapter");
    /// ```
    pub fn apply(self) -> Result<(), log::SetLoggerError> {
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(log::LevelFilter::Trace);
        Ok(())
    }
}
