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

use std::marker::PhantomData;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::Context;
use crossbeam_channel::SendTimeoutError;
use crossbeam_channel::Sender;
use crossbeam_channel::bounded;
use crossbeam_channel::unbounded;

use super::Message;
use super::Writer;
use super::worker::Worker;
use crate::trap::DefaultTrap;
use crate::trap::Trap;

/// A guard that flushes records associated with a [`NonBlocking`] writer on drop.
///
/// Writing to a [`NonBlocking`] writer will **not** immediately write the record to the
/// destination. Instead, the record will be written by a dedicated thread at some later point. If
/// the program terminates abruptly (such as through an uncaught `panic` or a
/// `std::process::exit`), some records may not be written.
///
/// Dropping the guard asks the worker to drain all pending records, waiting at most the shutdown
/// timeout.
#[derive(Debug)]
pub struct WorkerGuard {
    _guard: Option<JoinHandle<()>>,
    sender: Sender<Message>,
    shutdown: Sender<()>,
    shutdown_timeout: Duration,
    trap: Arc<dyn Trap>,
}

impl WorkerGuard {
    fn new(
        handle: JoinHandle<()>,
        sender: Sender<Message>,
        shutdown: Sender<()>,
        shutdown_timeout: Option<Duration>,
        trap: Arc<dyn Trap>,
    ) -> Self {
        const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_millis(100);

        WorkerGuard {
            _guard: Some(handle),
            sender,
            shutdown,
            shutdown_timeout: shutdown_timeout.unwrap_or(DEFAULT_SHUTDOWN_TIMEOUT),
            trap,
        }
    }
}

impl Drop for WorkerGuard {
    fn drop(&mut self) {
        let shutdown_timeout = self.shutdown_timeout;
        match self
            .sender
            .send_timeout(Message::Shutdown, shutdown_timeout)
        {
            Ok(()) => {
                // Wait for the worker to drain all messages. This happens when the worker calls
                // `recv()` on the zero-capacity shutdown channel.
                let _ = self.shutdown.send_timeout((), shutdown_timeout);
            }
            Err(SendTimeoutError::Disconnected(_)) => (),
            Err(SendTimeoutError::Timeout(_)) => {
                let err = anyhow::anyhow!("failed to send shutdown signal to logging worker");
                self.trap.trap(&err);
            }
        }
    }
}

/// A handle that sends encoded records to a worker thread.
#[derive(Debug)]
pub struct NonBlocking<T: Writer + Send + 'static> {
    sender: Sender<Message>,
    marker: PhantomData<fn(T)>,
}

impl<T: Writer + Send + 'static> Clone for NonBlocking<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            marker: PhantomData,
        }
    }
}

impl<T: Writer + Send + 'static> NonBlocking<T> {
    fn create(
        writer: T,
        thread_name: String,
        buffered_lines_limit: Option<usize>,
        shutdown_timeout: Option<Duration>,
        trap: Arc<dyn Trap>,
    ) -> anyhow::Result<(Self, WorkerGuard)> {
        let (sender, receiver) = match buffered_lines_limit {
            Some(cap) => bounded(cap),
            None => unbounded(),
        };

        let (shutdown_sender, shutdown_receiver) = bounded(0);

        let worker = Worker::new(writer, receiver, shutdown_receiver, trap.clone());
        let handle = worker
            .make_thread(thread_name)
            .context("failed to spawn logging worker thread")?;
        let worker_guard = WorkerGuard::new(
            handle,
            sender.clone(),
            shutdown_sender,
            shutdown_timeout,
            trap,
        );

        let marker = PhantomData;
        Ok((Self { sender, marker }, worker_guard))
    }

    /// Enqueue one encoded record.
    pub fn send(&self, record: Vec<u8>) -> anyhow::Result<()> {
        self.sender
            .send(Message::Record(record))
            .context("failed to send log message")
    }

    /// Wait until every record enqueued so far has been written and the writer flushed.
    ///
    /// # Errors
    ///
    /// Return an error if the worker does not answer within `timeout`, or fails to write a
    /// pending record.
    pub fn flush(&self, timeout: Duration) -> anyhow::Result<()> {
        let (done, flushed) = bounded(1);
        self.sender
            .send_timeout(Message::Flush(done), timeout)
            .map_err(|_| anyhow::anyhow!("failed to send flush request to logging worker"))?;
        flushed
            .recv_timeout(timeout)
            .context("logging worker did not flush in time")
    }
}

/// A builder for configuring [`NonBlocking`].
#[derive(Debug)]
pub struct NonBlockingBuilder<T: Writer + Send + 'static> {
    thread_name: String,
    buffered_lines_limit: Option<usize>,
    shutdown_timeout: Option<Duration>,
    trap: Arc<dyn Trap>,
    writer: T,
}

impl<T: Writer + Send + 'static> NonBlockingBuilder<T> {
    /// Creates a new [`NonBlockingBuilder`] with the specified writer.
    pub fn new(thread_name: impl Into<String>, writer: T) -> Self {
        Self {
            thread_name: thread_name.into(),
            buffered_lines_limit: None,
            shutdown_timeout: None,
            trap: Arc::new(DefaultTrap::default()),
            writer,
        }
    }

    /// Sets the buffer size of pending messages.
    ///
    /// Senders block once the buffer is full. Default to unbounded.
    pub fn buffered_lines_limit(mut self, buffered_lines_limit: Option<usize>) -> Self {
        self.buffered_lines_limit = buffered_lines_limit;
        self
    }

    /// Sets the shutdown timeout before the worker guard dropped.
    pub fn shutdown_timeout(mut self, shutdown_timeout: Option<Duration>) -> Self {
        self.shutdown_timeout = shutdown_timeout;
        self
    }

    /// Sets the trap for errors raised on the worker thread.
    pub fn trap(mut self, trap: Arc<dyn Trap>) -> Self {
        self.trap = trap;
        self
    }

    /// Completes the builder, returning the configured `NonBlocking`.
    ///
    /// # Errors
    ///
    /// Return an error if the worker thread cannot be spawned.
    pub fn build(self) -> anyhow::Result<(NonBlocking<T>, WorkerGuard)> {
        NonBlocking::create(
            self.writer,
            self.thread_name,
            self.buffered_lines_limit,
            self.shutdown_timeout,
            self.trap,
        )
    }
}
