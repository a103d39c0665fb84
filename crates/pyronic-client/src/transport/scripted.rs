// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Scripted channel for unit tests.
//!
//! Replies are queued up front; everything the client sends is captured.

use crate::channel::Channel;
use std::collections::VecDeque;
use std::io::{self, Read, Write};

/// A channel that plays back canned replies and records requests.
#[derive(Debug, Default)]
pub struct ScriptedChannel {
    rx: VecDeque<u8>,
    tx: Vec<u8>,
    closed: bool,
}

impl ScriptedChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue bytes for the client to receive.
    pub fn reply(&mut self, bytes: &[u8]) -> &mut Self {
        self.rx.extend(bytes);
        self
    }

    /// Queue an `"OK"` acknowledgement.
    pub fn ok(&mut self) -> &mut Self {
        self.reply(b"OK")
    }

    /// Queue a little-endian response pointer.
    pub fn response_ptr(&mut self, ptr: u32) -> &mut Self {
        self.reply(&ptr.to_le_bytes())
    }

    /// Everything the client has written so far.
    pub fn sent(&self) -> &[u8] {
        &self.tx
    }

    /// Bytes queued but not yet consumed.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    pub const fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Read for ScriptedChannel {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.rx.read(buf)
    }
}

impl Write for ScriptedChannel {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.closed {
            return Err(io::ErrorKind::BrokenPipe.into());
        }
        self.tx.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Channel for ScriptedChannel {
    fn close(&mut self) -> io::Result<()> {
        self.closed = true;
        Ok(())
    }
}
