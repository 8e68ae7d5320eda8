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

//! Hand records to a dedicated thread so the caller never blocks on the destination.

use std::io;

use crossbeam_channel::Sender;

pub use self::builder::NonBlocking;
pub use self::builder::NonBlockingBuilder;
pub use self::builder::WorkerGuard;

mod builder;
mod worker;

/// A destination written to by the worker thread.
///
/// Every buffer passed to [`Writer::write_all`] is one complete, already encoded record.
pub trait Writer {
    /// Write one record.
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()>;

    /// Flush buffered records.
    fn flush(&mut self) -> io::Result<()>;
}

#[derive(Debug)]
enum Message {
    Record(Vec<u8>),
    // answered once every earlier record is written and the writer flushed
    Flush(Sender<()>),
    Shutdown,
}
