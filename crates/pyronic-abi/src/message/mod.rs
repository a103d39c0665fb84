// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! IOS IPC request messages.
//!
//! The PPC side talks to IOS by placing a request structure in physical
//! memory and handing its address to the IPC hardware. The server relays
//! that address to the emulated kernel, which fills in the result and hands
//! back the address of the completed structure.
//!
//! # Wire Layout (32 bytes, big-endian)
//!
//! | Offset | Field | Type |
//! |--------|-------|------|
//! | 0x00 | `command` | u32 |
//! | 0x04 | `result` | i32 |
//! | 0x08 | `fd` | i32 |
//! | 0x0c | `args[0]` | u32 |
//! | 0x10 | `args[1]` | u32 |
//! | 0x14 | `args[2]` | u32 |
//! | 0x18 | `args[3]` | u32 |
//! | 0x1c | `args[4]` | u32 |
//!
//! Argument meaning depends on the command:
//!
//! | Command | args |
//! |---------|------|
//! | `Open` | path ptr, mode |
//! | `Close` | - |
//! | `Read` | buffer ptr, length |
//! | `Write` | buffer ptr, length |
//! | `Seek` | offset, whence |
//! | `Ioctl` | ioctl number, input ptr, input length, output ptr, output length |
//! | `Ioctlv` | ioctlv number, input count, output count, table ptr |

use crate::error::CodecError;
use crate::layout::{MESSAGE_ARG_COUNT, MESSAGE_SIZE, RESULT_OFFSET};


// =============================================================================
// Commands
// =============================================================================

/// IOS IPC command opcodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Command {
    /// Open a device or file node by path.
    Open = 1,
    /// Close a file descriptor.
    Close = 2,
    /// Read into a buffer.
    Read = 3,
    /// Write from a buffer.
    Write = 4,
    /// Move the file position.
    Seek = 5,
    /// Single-buffer ioctl.
    Ioctl = 6,
    /// Vectored ioctl.
    Ioctlv = 7,
}

impl Command {
    /// Try to convert from a raw opcode.
    #[must_use]
    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            1 => Some(Self::Open),
            2 => Some(Self::Close),
            3 => Some(Self::Read),
            4 => Some(Self::Write),
            5 => Some(Self::Seek),
            6 => Some(Self::Ioctl),
            7 => Some(Self::Ioctlv),
            _ => None,
        }
    }

    /// Get the raw opcode.
    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self as u32
    }
}

// =============================================================================
// Message
// =============================================================================

/// An IOS IPC request or completed response.
///
/// `command` is kept raw so that any 32-byte buffer decodes; use
/// [`IpcMessage::opcode`] to interpret it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IpcMessage {
    /// Raw command opcode.
    pub command: u32,
    /// Result code, zero in requests and filled in by IOS.
    pub result: i32,
    /// Target file descriptor.
    pub fd: i32,
    /// Command arguments.
    pub args: [u32; MESSAGE_ARG_COUNT],
}

impl IpcMessage {
    /// Build a request for `command` on `fd`.
    ///
    /// Missing arguments are zero-filled. Each message owns its own
    /// argument array.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::TooManyArguments`] if more than five arguments
    /// are supplied.
    pub fn new(command: Command, fd: i32, args: &[u32]) -> Result<Self, CodecError> {
        if args.len() > MESSAGE_ARG_COUNT {
            return Err(CodecError::TooManyArguments {
                given: args.len(),
                max: MESSAGE_ARG_COUNT,
            });
        }
        let mut words = [0u32; MESSAGE_ARG_COUNT];
        words[..args.len()].copy_from_slice(args);
        Ok(Self {
            command: command.as_u32(),
            result: 0,
            fd,
            args: words,
        })
    }

    /// Interpret the raw command word.
    #[must_use]
    pub const fn opcode(&self) -> Option<Command> {
        Command::from_u32(self.command)
    }

    /// Encode this message into its 32-byte big-endian wire form.
    #[must_use]
    pub fn encode(&self) -> [u8; MESSAGE_SIZE] {
        let mut out = [0u8; MESSAGE_SIZE];
        out[0..4].copy_from_slice(&self.command.to_be_bytes());
        out[4..8].copy_from_slice(&self.result.to_be_bytes());
        out[8..12].copy_from_slice(&self.fd.to_be_bytes());
        for (chunk, word) in out[12..].chunks_exact_mut(4).zip(self.args) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        out
    }

    /// Decode a message from the first 32 bytes of `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::ShortBuffer`] if fewer than 32 bytes are given.
    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        if bytes.len() < MESSAGE_SIZE {
            return Err(CodecError::ShortBuffer {
                len: bytes.len(),
                needed: MESSAGE_SIZE,
            });
        }
        let mut args = [0u32; MESSAGE_ARG_COUNT];
        for (word, chunk) in args.iter_mut().zip(bytes[12..MESSAGE_SIZE].chunks_exact(4)) {
            *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Ok(Self {
            command: u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            result: i32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            fd: i32::from_be_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
            args,
        })
    }
}

/// Extract the signed result code from an encoded response.
///
/// Only bytes `[4:8]` are inspected, so a response buffer of any length
/// of at least eight bytes is accepted.
///
/// # Errors
///
/// Returns [`CodecError::ShortBuffer`] if fewer than eight bytes are given.
pub fn decode_result(bytes: &[u8]) -> Result<i32, CodecError> {
    let end = RESULT_OFFSET + 4;
    let Some(field) = bytes.get(RESULT_OFFSET..end) else {
        return Err(CodecError::ShortBuffer {
            len: bytes.len(),
            needed: end,
        });
    };
    Ok(i32::from_be_bytes([field[0], field[1], field[2], field[3]]))
}
