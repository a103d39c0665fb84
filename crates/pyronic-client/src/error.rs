// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Client error type.
//!
//! Remote IOS result codes are not errors at this layer: they are returned
//! to the caller verbatim. Everything here is a local failure, and none of
//! it is retried.

use pyronic_abi::CodecError;
use thiserror::Error;

/// Result type returned by client operations.
pub type Result<T> = core::result::Result<T, ClientError>;

/// Errors produced by the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A zero-byte allocation was requested.
    #[error("allocation size must be non-zero")]
    InvalidSize,

    /// The rounded allocation does not fit in the arena.
    #[error("allocation of {size:#x} bytes exceeds arena of {arena:#x} bytes")]
    AllocationTooLarge {
        /// Rounded allocation size.
        size: u64,
        /// Total arena size.
        arena: u32,
    },

    /// The operation has no defined semantics.
    #[error("{0} is not supported")]
    Unsupported(&'static str),

    /// The channel closed before the expected number of bytes arrived.
    #[error("short read: expected {expected} bytes, got {got}")]
    ShortRead {
        /// Bytes the protocol requires.
        expected: usize,
        /// Bytes received before end of stream.
        got: usize,
    },

    /// The server did not answer with `"OK"`.
    #[error("server did not acknowledge request (reply {reply:02x?})")]
    TransportNack {
        /// The bytes received instead of the acknowledgement.
        reply: Vec<u8>,
    },

    /// An earlier protocol failure left the session out of sync.
    #[error("session is desynchronized after an earlier protocol failure")]
    Desynchronized,

    /// The ioctlv format and argument list disagree in length.
    #[error("ioctlv format expects {expected} arguments, got {given}")]
    ArgumentCountMismatch {
        /// Arguments named by the format.
        expected: usize,
        /// Arguments supplied.
        given: usize,
    },

    /// The ioctlv format contains an unknown code.
    #[error("invalid ioctlv format code {0:?}")]
    InvalidFormatCode(char),

    /// An ioctlv argument has the wrong kind for its format code.
    #[error("ioctlv argument {position} does not match format code {code:?}")]
    ArgumentTypeMismatch {
        /// Zero-based argument position.
        position: usize,
        /// The format code at that position.
        code: char,
    },

    /// A write is larger than the handle it targets.
    #[error("write of {len} bytes exceeds handle capacity of {capacity} bytes")]
    BufferOverrun {
        /// Bytes to write.
        len: usize,
        /// Logical size of the handle.
        capacity: u32,
    },

    /// A payload does not fit the protocol's 32-bit length field.
    #[error("payload of {0} bytes does not fit the protocol length field")]
    PayloadTooLarge(usize),

    /// The arena configuration is inconsistent.
    #[error("invalid arena configuration: {0}")]
    InvalidArena(&'static str),

    /// A wire structure could not be encoded or decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The underlying channel failed.
    #[error("transport i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Returns true if this error leaves the transport out of sync.
    ///
    /// After such an error the session must be abandoned.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ShortRead { .. } | Self::TransportNack { .. } | Self::Io(_) | Self::Desynchronized
        )
    }
}
