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

//! Format-string shorthands for the `*_fmt` methods of [`Logger`] and [`Entry`].
//!
//! ```
//! use logfan::Logger;
//! use logfan::adapter::Testing;
//!
//! let logger = Logger::builder().adapter(Testing::default()).build();
//! let port = 8080;
//! logfan::log_info!(logger, "listening on :{port}");
//! logfan::log_warn!(logger.with_trace("db"), "{} slow queries", 3);
//! ```
//!
//! [`Logger`]: crate::Logger
//! [`Entry`]: crate::Entry

/// Log a formatted message without a level.
#[macro_export]
macro_rules! log_print {
    ($logger:expr, $($arg:tt)+) => {
        $logger.print_fmt(format_args!($($arg)+))
    };
}

/// Log a formatted message at the debug level.
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)+) => {
        $logger.debug_fmt(format_args!($($arg)+))
    };
}

/// Log a formatted message at the info level.
#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)+) => {
        $logger.info_fmt(format_args!($($arg)+))
    };
}

/// Log a formatted message at the warn level.
#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)+) => {
        $logger.warn_fmt(format_args!($($arg)+))
    };
}

/// Log a formatted message at the error level.
#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)+) => {
        $logger.error_fmt(format_args!($($arg)+))
    };
}

/// Log a formatted message at the fatal level.
#[macro_export]
macro_rules! log_fatal {
    ($logger:expr, $($arg:tt)+) => {
        $logger.fatal_fmt(format_args!($($arg)+))
    };
}
