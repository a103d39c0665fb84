// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Simulated PPC HLE server.
//!
//! [`MockRemote`] is a [`Channel`] that answers the socket protocol in
//! process. Requests are parsed as they are written and replies are queued
//! for the next read:
//!
//! - `Read` returns bytes from [`GuestMemory`]
//! - `Write` stores the payload and replies `"OK"`
//! - `Message` replies `"OK"`, runs the IOS handler on the request, stores
//!   the result in place and sends the request address as response pointer
//! - `Ack` replies `"OK"`
//! - `MessageNoReturn` records the request and replies nothing
//!
//! An unknown request kind hangs up the connection, as the real server does.

use crate::memory::GuestMemory;
use pyronic_abi::layout::{HEADER_SIZE, MESSAGE_SIZE, RESULT_OFFSET};
use pyronic_abi::transport::{ACK, TransportHeader, TransportKind};
use pyronic_abi::{IpcMessage, Paddr};
use pyronic_client::Channel;
use std::collections::VecDeque;
use std::fmt;
use std::io::{self, Read, Write};
use tracing::{debug, warn};

/// IOS request handler: returns the result code for a message.
pub type Handler = Box<dyn FnMut(&IpcMessage, &mut GuestMemory) -> i32>;

/// In-process stand-in for the HLE server.
pub struct MockRemote {
    memory: GuestMemory,
    handler: Handler,
    inbox: Vec<u8>,
    outbox: VecDeque<u8>,
    ack: Vec<u8>,
    requests: Vec<TransportHeader>,
    messages: Vec<IpcMessage>,
    no_return: Vec<IpcMessage>,
    hung_up: bool,
    closed: bool,
}

impl MockRemote {
    /// A server whose IOS answers every request with 0.
    #[must_use]
    pub fn new() -> Self {
        Self::with_handler(|_, _| 0)
    }

    /// A server driven by `handler`.
    #[must_use]
    pub fn with_handler(handler: impl FnMut(&IpcMessage, &mut GuestMemory) -> i32 + 'static) -> Self {
        Self {
            memory: GuestMemory::new(),
            handler: Box::new(handler),
            inbox: Vec::new(),
            outbox: VecDeque::new(),
            ack: ACK.to_vec(),
            requests: Vec::new(),
            messages: Vec::new(),
            no_return: Vec::new(),
            hung_up: false,
            closed: false,
        }
    }

    /// Replace the acknowledgement bytes, e.g. to provoke a nack.
    pub fn set_ack(&mut self, ack: &[u8]) {
        self.ack = ack.to_vec();
    }

    /// Guest memory as seen by the server.
    #[must_use]
    pub const fn memory(&self) -> &GuestMemory {
        &self.memory
    }

    /// Guest memory, mutably.
    pub const fn memory_mut(&mut self) -> &mut GuestMemory {
        &mut self.memory
    }

    /// Every request header received, in order.
    #[must_use]
    pub fn requests(&self) -> &[TransportHeader] {
        &self.requests
    }

    /// Completed IPC requests, with their result filled in.
    #[must_use]
    pub fn messages(&self) -> &[IpcMessage] {
        &self.messages
    }

    /// Requests delivered without a return path.
    #[must_use]
    pub fn no_return_messages(&self) -> &[IpcMessage] {
        &self.no_return
    }

    /// Returns true once the server dropped the connection.
    #[must_use]
    pub const fn is_hung_up(&self) -> bool {
        self.hung_up
    }

    /// Returns true once the client closed the channel.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    fn process(&mut self) {
        while !self.hung_up && self.inbox.len() >= HEADER_SIZE {
            let mut raw = [0u8; HEADER_SIZE];
            raw.copy_from_slice(&self.inbox[..HEADER_SIZE]);
            let Some(header) = TransportHeader::decode(raw) else {
                warn!(kind = ?&raw[..4], "invalid request kind, hanging up");
                self.hung_up = true;
                self.inbox.clear();
                return;
            };

            let payload_len = if header.kind == TransportKind::Write {
                header.length as usize
            } else {
                0
            };
            if self.inbox.len() < HEADER_SIZE + payload_len {
                return;
            }
            let frame: Vec<u8> = self.inbox.drain(..HEADER_SIZE + payload_len).collect();
            self.requests.push(header);
            self.handle(header, &frame[HEADER_SIZE..]);
        }
    }

    fn handle(&mut self, header: TransportHeader, payload: &[u8]) {
        debug!(kind = ?header.kind, addr = %header.addr, len = header.length, "mock request");
        match header.kind {
            TransportKind::Read => {
                let data = self.memory.read(header.addr, header.length as usize);
                self.outbox.extend(data);
            }
            TransportKind::Write => {
                self.memory.write(header.addr, payload);
                self.outbox.extend(&self.ack);
            }
            TransportKind::Message => {
                self.outbox.extend(&self.ack);
                if let Some(message) = self.dispatch(header.addr) {
                    self.messages.push(message);
                    self.outbox.extend(header.addr.as_u32().to_le_bytes());
                } else {
                    self.hung_up = true;
                }
            }
            TransportKind::Ack => self.outbox.extend(&self.ack),
            TransportKind::MessageNoReturn => {
                let bytes = self.memory.read(header.addr, MESSAGE_SIZE);
                if let Ok(message) = IpcMessage::decode(&bytes) {
                    self.no_return.push(message);
                }
            }
        }
    }

    /// Run the handler on the request at `ptr` and store its result.
    fn dispatch(&mut self, ptr: Paddr) -> Option<IpcMessage> {
        let bytes = self.memory.read(ptr, MESSAGE_SIZE);
        let mut message = IpcMessage::decode(&bytes).ok()?;
        message.result = (self.handler)(&message, &mut self.memory);
        self.memory
            .write(ptr.add(RESULT_OFFSET as u32), &message.result.to_be_bytes());
        debug!(command = message.command, result = message.result, "mock ipc");
        Some(message)
    }
}

impl Default for MockRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MockRemote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockRemote")
            .field("requests", &self.requests.len())
            .field("messages", &self.messages.len())
            .field("pending", &self.outbox.len())
            .field("hung_up", &self.hung_up)
            .finish_non_exhaustive()
    }
}

impl Read for MockRemote {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.outbox.read(buf)
    }
}

impl Write for MockRemote {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.closed || self.hung_up {
            return Err(io::ErrorKind::BrokenPipe.into());
        }
        self.inbox.extend_from_slice(buf);
        self.process();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Channel for MockRemote {
    fn close(&mut self) -> io::Result<()> {
        self.closed = true;
        Ok(())
    }
}
