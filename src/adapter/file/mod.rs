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

//! Adapter for writing JSON log lines to a size-bounded rolling file.
//!
//! # Example
//!
//!```no_run
//! use logfan::Level;
//! use logfan::Logger;
//! use logfan::adapter::FileAdapter;
//! use logfan::adapter::FileConfig;
//! use logfan::adapter::file::Rotation;
//!
//! let file = FileAdapter::new(FileConfig {
//!     level: Level::Info,
//!     rotation: Rotation {
//!         filename: "logs/app.log".into(),
//!         max_size_mb: 100,
//!         compress: true,
//!         ..Rotation::default()
//!     },
//!     ..FileConfig::default()
//! });
//!
//! let logger = Logger::builder().adapter(file).build();
//! logger.info("This log will be written to logs/app.log.");
//! ```

pub use self::append::FileAdapter;
pub use self::append::FileBuilder;
pub use self::append::FileConfig;
pub use self::rolling::RollingFileWriter;
pub use self::rolling::RollingFileWriterBuilder;
pub use self::rolling::Rotation;

mod append;
mod clock;
mod rolling;
