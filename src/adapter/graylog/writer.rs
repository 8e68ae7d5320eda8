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

use std::io;
use std::io::Write;
use std::net::Ipv4Addr;
use std::net::Ipv6Addr;
use std::net::SocketAddr;
use std::net::ToSocketAddrs;
use std::net::UdpSocket;

use anyhow::Context;
use flate2::Compression;
use flate2::write::GzEncoder;
use jiff::Timestamp;

use crate::non_blocking::Writer;

/// The largest datagram sent in one piece.
const CHUNK_SIZE: usize = 1420;
const CHUNK_HEADER_LEN: usize = 12;
const CHUNK_DATA_LEN: usize = CHUNK_SIZE - CHUNK_HEADER_LEN;
const MAX_CHUNKS: usize = 128;
const CHUNK_MAGIC: [u8; 2] = [0x1e, 0x0f];

/// A connected UDP socket that sends one GELF payload per write, chunked when needed.
#[derive(Debug)]
pub struct GelfUdpWriter {
    socket: UdpSocket,
    compress: bool,
    sequence: u64,
}

impl GelfUdpWriter {
    /// Resolve `addr` and connect a UDP socket to it.
    pub fn connect(addr: &str, compress: bool) -> anyhow::Result<Self> {
        let target = addr
            .to_socket_addrs()
            .with_context(|| format!("failed to resolve {addr}"))?
            .next()
            .with_context(|| format!("no address found for {addr}"))?;
        let local = match target {
            SocketAddr::V4(_) => SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)),
            SocketAddr::V6(_) => SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0)),
        };

        let socket = UdpSocket::bind(local).context("failed to bind udp socket")?;
        socket
            .connect(target)
            .with_context(|| format!("failed to connect udp socket to {target}"))?;

        Ok(Self {
            socket,
            compress,
            sequence: 0,
        })
    }

    fn next_message_id(&mut self) -> [u8; 8] {
        self.sequence = self.sequence.wrapping_add(1);
        let nanos = Timestamp::now().as_nanosecond() as u64;
        (nanos ^ self.sequence.rotate_left(48)).to_be_bytes()
    }
}

impl Writer for GelfUdpWriter {
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        let compressed;
        let payload = if self.compress {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(buf)?;
            compressed = encoder.finish()?;
            compressed.as_slice()
        } else {
            buf
        };

        if payload.len() <= CHUNK_SIZE {
            self.socket.send(payload)?;
            return Ok(());
        }

        let id = self.next_message_id();
        for chunk in split_chunks(id, payload)? {
            self.socket.send(&chunk)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Split a payload into GELF chunks, each carrying the magic bytes, the message id, its sequence
/// number and the chunk count.
fn split_chunks(id: [u8; 8], payload: &[u8]) -> io::Result<Vec<Vec<u8>>> {
    let count = payload.len().div_ceil(CHUNK_DATA_LEN);
    if count > MAX_CHUNKS {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "gelf message of {} bytes needs {count} chunks, at most {MAX_CHUNKS} allowed",
                payload.len()
            ),
        ));
    }

    let chunks = payload
        .chunks(CHUNK_DATA_LEN)
        .enumerate()
        .map(|(seq, data)| {
            let mut chunk = Vec::with_capacity(CHUNK_HEADER_LEN + data.len());
            chunk.extend_from_slice(&CHUNK_MAGIC);
            chunk.extend_from_slice(&id);
            chunk.push(seq as u8);
            chunk.push(count as u8);
            chunk.extend_from_slice(data);
            chunk
        })
        .collect();
    Ok(chunks)
}
