// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Ioctlv argument-vector tables and scalar argument encoders.
//!
//! An ioctlv request points at a table of `(address, size)` descriptors in
//! guest memory. Input descriptors come first, followed by output
//! descriptors; the counts travel in the request message.
//!
//! # Table Layout (8 bytes per entry, big-endian)
//!
//! ```text
//! +----------------+----------------+
//! | in[0].address  | in[0].size     |
//! | ...            | ...            |
//! | out[0].address | out[0].size    |
//! | ...            | ...            |
//! +----------------+----------------+
//! ```
//!
//! Scalar arguments are passed by reference: the value is written to its own
//! buffer and the buffer is described in the table. Format codes follow the
//! usual struct-packing letters (`b`, `h`, `i`, `q`).

use crate::layout::IOCTLV_ENTRY_SIZE;
use crate::types::Paddr;
use alloc::vec::Vec;


// =============================================================================
// Table Entries
// =============================================================================

/// One `(address, size)` descriptor in an ioctlv table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IoctlvEntry {
    /// Guest address of the argument buffer.
    pub address: Paddr,
    /// Length of the argument buffer in bytes.
    pub size: u32,
}

impl IoctlvEntry {
    /// Create a new descriptor.
    #[inline]
    #[must_use]
    pub const fn new(address: Paddr, size: u32) -> Self {
        Self { address, size }
    }

    /// Encode this descriptor into its 8-byte big-endian wire form.
    #[must_use]
    pub const fn encode(self) -> [u8; IOCTLV_ENTRY_SIZE] {
        let addr = self.address.as_u32().to_be_bytes();
        let size = self.size.to_be_bytes();
        [
            addr[0], addr[1], addr[2], addr[3], size[0], size[1], size[2], size[3],
        ]
    }
}

/// Encode an ioctlv table with all inputs followed by all outputs.
#[must_use]
pub fn encode_table(inputs: &[IoctlvEntry], outputs: &[IoctlvEntry]) -> Vec<u8> {
    let mut table = Vec::with_capacity((inputs.len() + outputs.len()) * IOCTLV_ENTRY_SIZE);
    for entry in inputs.iter().chain(outputs) {
        table.extend_from_slice(&entry.encode());
    }
    table
}

// =============================================================================
// Scalar Encoders
// =============================================================================

/// Width of a scalar ioctlv argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarWidth {
    /// One byte (format code `b`).
    Byte,
    /// Two bytes (format code `h`).
    Half,
    /// Four bytes (format code `i`).
    Word,
    /// Eight bytes (format code `q`).
    Quad,
}

impl ScalarWidth {
    /// Map a format code to a scalar width.
    ///
    /// Returns `None` for `d` (raw buffer) and any unknown code.
    #[must_use]
    pub const fn from_code(code: char) -> Option<Self> {
        match code {
            'b' => Some(Self::Byte),
            'h' => Some(Self::Half),
            'i' => Some(Self::Word),
            'q' => Some(Self::Quad),
            _ => None,
        }
    }

    /// The format code for this width.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Byte => 'b',
            Self::Half => 'h',
            Self::Word => 'i',
            Self::Quad => 'q',
        }
    }

    /// Size of an encoded value in bytes.
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            Self::Byte => 1,
            Self::Half => 2,
            Self::Word => 4,
            Self::Quad => 8,
        }
    }

    /// Encode `value` big-endian, keeping only the low bytes that fit.
    ///
    /// Values wider than the target are truncated, never rejected.
    #[must_use]
    pub const fn encode(self, value: u64) -> ScalarBytes {
        let len = self.size();
        let full = value.to_be_bytes();
        let mut buf = [0u8; 8];
        let mut i = 0;
        while i < len {
            buf[i] = full[8 - len + i];
            i += 1;
        }
        ScalarBytes { buf, len }
    }
}

/// A big-endian encoded scalar of 1, 2, 4 or 8 bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScalarBytes {
    buf: [u8; 8],
    len: usize,
}

impl ScalarBytes {
    /// The encoded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Number of encoded bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Always `false`; scalars have at least one byte.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl AsRef<[u8]> for ScalarBytes {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}
