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

//! Adapters that write log records to a concrete destination.

use std::fmt;

use crate::Record;

pub mod color;
pub mod console;
pub mod file;
pub mod graylog;
mod testing;

pub use self::console::ConsoleAdapter;
pub use self::console::ConsoleConfig;
pub use self::file::FileAdapter;
pub use self::file::FileConfig;
pub use self::graylog::GraylogAdapter;
pub use self::graylog::GraylogConfig;
pub use self::testing::Testing;

/// A destination-specific writer of log records.
///
/// The [`Logger`] hands every adapter its own copy of each record and does no filtering of its
/// own: an adapter is responsible for its own enable flag and level threshold, checked in
/// [`Adapter::log`].
///
/// # Examples
///
/// ```
/// use logfan::Adapter;
/// use logfan::Level;
/// use logfan::Logger;
/// use logfan::Record;
///
/// #[derive(Debug)]
/// struct Shout;
///
/// impl Adapter for Shout {
///     fn format(&self, record: &mut Record) {
///         *record.message_mut() = record.message().to_uppercase();
///     }
///
///     fn log(&self, mut record: Record) {
///         if !Level::Info.is_enabled(record.level()) {
///             return;
///         }
///         self.format(&mut record);
///         println!("{}", record.message());
///     }
/// }
///
/// let logger = Logger::builder().adapter(Shout).build();
/// logger.info("hello");
/// ```
///
/// [`Logger`]: crate::Logger
pub trait Adapter: fmt::Debug + Send + Sync + 'static {
    /// Decorate the record in place before it is written.
    ///
    /// Default to a no-op.
    fn format(&self, record: &mut Record) {
        let _ = record;
    }

    /// Filter, decorate and write a record.
    fn log(&self, record: Record);

    /// Flush any buffered records.
    ///
    /// Default to a no-op.
    fn flush(&self) {}
}

impl<T: Adapter> From<T> for Box<dyn Adapter> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}

/// Terminate the process after a fatal record has been handed to its writer.
pub(crate) fn exit_after_fatal(adapter: &dyn Adapter) -> ! {
    adapter.flush();
    std::process::exit(1)
}
