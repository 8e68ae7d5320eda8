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

//! A leveled logging facade that fans every record out to a list of adapters.
//!
//! # Overview
//!
//! A [`Logger`] owns an ordered list of [`Adapter`]s. Each log call builds one [`Record`] and
//! hands every adapter its own copy. Adapters apply their own enable flag and [`Level`]
//! threshold, decorate the record and write it: colored lines to a terminal
//! ([`ConsoleAdapter`]), JSON lines to a rolling file ([`FileAdapter`]), GELF messages to
//! Graylog ([`GraylogAdapter`]) or anything a custom adapter does.
//!
//! An [`Entry`] accumulates fields, an error and a trace name for the next log calls.
//!
//! # Examples
//!
//! Console and file adapters with thresholds from a deployment mode:
//!
//! ```no_run
//! use logfan::Logger;
//! use logfan::Mode;
//!
//! let logger = Logger::with_mode(Mode::Prod);
//! logger.info("This is an info message.");
//! logger.with_field("port", 8080).warn("port already in use");
//! ```
//!
//! Hand-picked adapters:
//!
//! ```
//! use logfan::Level;
//! use logfan::Logger;
//! use logfan::adapter::ConsoleAdapter;
//! use logfan::adapter::ConsoleConfig;
//!
//! let logger = Logger::builder()
//!     .adapter(ConsoleAdapter::new(ConsoleConfig {
//!         level: Level::Info,
//!         no_color: true,
//!         ..ConsoleConfig::default()
//!     }))
//!     .build();
//!
//! let mut entry = logger.with_trace("http");
//! entry.info("listening");
//! logfan::log_error!(entry, "request {} failed", 42);
//! ```
//!
//! [`ConsoleAdapter`]: adapter::ConsoleAdapter
//! [`FileAdapter`]: adapter::FileAdapter
//! [`GraylogAdapter`]: adapter::GraylogAdapter

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod adapter;
pub mod bridge;
pub mod non_blocking;
pub mod record;
pub mod trap;

mod level;
mod logger;
mod macros;

pub use self::adapter::Adapter;
pub use self::level::Level;
pub use self::logger::Entry;
pub use self::logger::Logger;
pub use self::logger::LoggerBuilder;
pub use self::logger::Mode;
pub use self::record::Record;
pub use self::trap::Trap;
