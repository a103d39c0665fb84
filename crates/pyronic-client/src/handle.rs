// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Handles to regions of guest memory.

use crate::channel::Channel;
use crate::error::{ClientError, Result};
use crate::transport::TransportSession;
use pyronic_abi::layout::RESPONSE_SIZE;
use pyronic_abi::{IoctlvEntry, Paddr};

/// A region of guest memory.
///
/// Handles are plain `(address, size)` descriptors. They are either carved
/// out of the arena by [`RemoteAllocator`](crate::RemoteAllocator) or pinned
/// at a caller-chosen address. Nothing tracks their lifetime: once the arena
/// wraps, an older arena handle may alias a newer one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MemoryHandle {
    address: Paddr,
    /// Logical payload length.
    size: u32,
    /// Bytes actually backing the handle (block-rounded for arena handles).
    reserved: u32,
}

impl MemoryHandle {
    pub(crate) const fn allocated(address: Paddr, size: u32, reserved: u32) -> Self {
        Self {
            address,
            size,
            reserved,
        }
    }

    /// A handle at a fixed guest address, outside the arena.
    #[must_use]
    pub const fn pinned(address: Paddr, size: u32) -> Self {
        Self {
            address,
            size,
            reserved: size,
        }
    }

    /// A handle over an IPC response message at `address`.
    #[must_use]
    pub const fn response(address: Paddr) -> Self {
        Self::pinned(address, RESPONSE_SIZE)
    }

    /// Guest address of the first byte.
    #[inline]
    #[must_use]
    pub const fn address(&self) -> Paddr {
        self.address
    }

    /// Logical size requested by the caller.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Size of the backing span.
    #[inline]
    #[must_use]
    pub const fn reserved(&self) -> u32 {
        self.reserved
    }

    /// Descriptor for an ioctlv table, using the logical size.
    #[must_use]
    pub const fn entry(&self) -> IoctlvEntry {
        IoctlvEntry::new(self.address, self.size)
    }

    /// Read the whole backing span.
    ///
    /// Arena handles return their block-rounded length, not the requested
    /// size. Use [`read_payload`](Self::read_payload) for the logical bytes.
    ///
    /// # Errors
    ///
    /// Returns any transport error.
    pub fn read<C: Channel>(&self, transport: &mut TransportSession<C>) -> Result<Vec<u8>> {
        transport.guest_read(self.address, self.reserved)
    }

    /// Read only the logical `size` bytes.
    ///
    /// # Errors
    ///
    /// Returns any transport error.
    pub fn read_payload<C: Channel>(
        &self,
        transport: &mut TransportSession<C>,
    ) -> Result<Vec<u8>> {
        transport.guest_read(self.address, self.size)
    }

    /// Write `data` at the start of the handle.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::BufferOverrun`] if `data` is longer than the
    /// logical size, or any transport error.
    pub fn write<C: Channel>(&self, transport: &mut TransportSession<C>, data: &[u8]) -> Result<()> {
        if data.len() > self.size as usize {
            return Err(ClientError::BufferOverrun {
                len: data.len(),
                capacity: self.size,
            });
        }
        transport.guest_write(self.address, data)
    }
}
