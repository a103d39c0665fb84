// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Control protocol over a [`Channel`].
//!
//! See [`pyronic_abi::transport`] for the wire format. Every operation is a
//! blocking round trip. A short read, a missing acknowledgement or an I/O
//! error leaves the stream in an unknown position, so the session poisons
//! itself and refuses further traffic with [`ClientError::Desynchronized`].

#[cfg(test)]
pub(crate) mod scripted;

use crate::channel::Channel;
use crate::error::{ClientError, Result};
use pyronic_abi::Paddr;
use pyronic_abi::layout::RESPONSE_PTR_SIZE;
use pyronic_abi::transport::{ACK, TransportHeader, decode_response_ptr};
use std::io::{self, Read, Write};
use tracing::{debug, trace, warn};

/// Protocol state wrapped around a byte channel.
#[derive(Debug)]
pub struct TransportSession<C> {
    channel: C,
    poisoned: bool,
}

impl<C: Channel> TransportSession<C> {
    /// Wrap a connected channel.
    #[must_use]
    pub const fn new(channel: C) -> Self {
        Self {
            channel,
            poisoned: false,
        }
    }

    /// The underlying channel.
    #[must_use]
    pub const fn channel(&self) -> &C {
        &self.channel
    }

    /// The underlying channel, mutably.
    pub const fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    /// Unwrap the channel.
    #[must_use]
    pub fn into_inner(self) -> C {
        self.channel
    }

    /// Returns true once a protocol failure has desynchronized the stream.
    #[must_use]
    pub const fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Read `len` bytes of guest memory at `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ShortRead`] if the stream ends early.
    pub fn guest_read(&mut self, addr: Paddr, len: u32) -> Result<Vec<u8>> {
        debug!(%addr, len, "guest read");
        self.run(|channel| {
            send_header(channel, TransportHeader::read(addr, len))?;
            let data = recv_exact(channel, len as usize)?;
            trace!(data = ?data, "guest read data");
            Ok(data)
        })
    }

    /// Write `data` to guest memory at `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::PayloadTooLarge`] before sending anything if
    /// `data` does not fit the length field, or
    /// [`ClientError::TransportNack`] if the server does not acknowledge.
    pub fn guest_write(&mut self, addr: Paddr, data: &[u8]) -> Result<()> {
        let len = u32::try_from(data.len()).map_err(|_| ClientError::PayloadTooLarge(data.len()))?;
        debug!(%addr, len, "guest write");
        trace!(data = ?data, "guest write data");
        self.run(|channel| {
            channel.write_all(&TransportHeader::write(addr, len).encode())?;
            channel.write_all(data)?;
            channel.flush()?;
            await_ack(channel)
        })
    }

    /// Deliver the IPC request at `ptr` and wait for the acknowledgement.
    ///
    /// The response pointer follows once the request completes; collect it
    /// with [`receive_response`](Self::receive_response).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::TransportNack`] if the server does not
    /// acknowledge.
    pub fn send_message(&mut self, ptr: Paddr) -> Result<()> {
        debug!(%ptr, "send message");
        self.run(|channel| {
            send_header(channel, TransportHeader::message(ptr))?;
            await_ack(channel)
        })
    }

    /// Deliver the IPC request at `ptr` without waiting for anything.
    ///
    /// Used when the guest is not expected to hand control back.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from sending the header.
    pub fn send_message_no_return(&mut self, ptr: Paddr) -> Result<()> {
        debug!(%ptr, "send message without return");
        self.run(|channel| send_header(channel, TransportHeader::message_no_return(ptr)))
    }

    /// Wait for the guest address of the completed response message.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ShortRead`] if the stream ends early.
    pub fn receive_response(&mut self) -> Result<Paddr> {
        let ptr = self.run(|channel| {
            let bytes = recv_exact(channel, RESPONSE_PTR_SIZE)?;
            let mut raw = [0u8; RESPONSE_PTR_SIZE];
            raw.copy_from_slice(&bytes);
            Ok(decode_response_ptr(raw))
        })?;
        debug!(%ptr, "response received");
        Ok(ptr)
    }

    /// Acknowledge a delivered response.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::TransportNack`] if the server does not
    /// acknowledge.
    pub fn send_ack(&mut self) -> Result<()> {
        debug!("send ack");
        self.run(|channel| {
            send_header(channel, TransportHeader::ack())?;
            await_ack(channel)
        })
    }

    /// Close the channel. Allowed on a poisoned session.
    ///
    /// # Errors
    ///
    /// Returns the channel's I/O error.
    pub fn close(&mut self) -> Result<()> {
        self.channel.close()?;
        Ok(())
    }

    fn run<T>(&mut self, op: impl FnOnce(&mut C) -> Result<T>) -> Result<T> {
        if self.poisoned {
            return Err(ClientError::Desynchronized);
        }
        let result = op(&mut self.channel);
        if let Err(err) = &result {
            if err.is_fatal() {
                warn!(error = %err, "transport desynchronized, session poisoned");
                self.poisoned = true;
            }
        }
        result
    }
}

fn send_header<C: Channel>(channel: &mut C, header: TransportHeader) -> Result<()> {
    channel.write_all(&header.encode())?;
    channel.flush()?;
    Ok(())
}

/// Read up to `len` bytes, stopping early only at end of stream.
fn recv_up_to<R: Read>(channel: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; len];
    let mut got = 0;
    while got < len {
        match channel.read(&mut buf[got..]) {
            Ok(0) => break,
            Ok(n) => got += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => return Err(err.into()),
        }
    }
    buf.truncate(got);
    Ok(buf)
}

fn recv_exact<R: Read>(channel: &mut R, len: usize) -> Result<Vec<u8>> {
    let buf = recv_up_to(channel, len)?;
    if buf.len() < len {
        return Err(ClientError::ShortRead {
            expected: len,
            got: buf.len(),
        });
    }
    Ok(buf)
}

fn await_ack<R: Read>(channel: &mut R) -> Result<()> {
    let reply = recv_up_to(channel, ACK.len())?;
    if reply != ACK {
        return Err(ClientError::TransportNack { reply });
    }
    Ok(())
}
