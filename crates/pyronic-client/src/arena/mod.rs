// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Bump allocator over a window of guest memory.
//!
//! Allocations are block-aligned and handed out upward from `base`. There is
//! no deallocation. When the next allocation would reach `limit`, the cursor
//! jumps back to `base` and earlier handles in that range silently become
//! aliases of whatever is allocated next.
//!
//! ```text
//! base                                    limit
//!   │ used │ used │ ... │ cursor ──►  free  │
//!   └──────┴──────┴─────┴─────────────────────┘
//! ```


use crate::config::ArenaConfig;
use crate::error::{ClientError, Result};
use crate::handle::MemoryHandle;
use pyronic_abi::Paddr;
use tracing::debug;

/// Bump allocator with wraparound.
#[derive(Debug, Clone)]
pub struct RemoteAllocator {
    /// First address of the arena.
    base: Paddr,
    /// Exclusive end of the arena.
    limit: Paddr,
    /// Next free address.
    cursor: Paddr,
    /// Allocation granularity.
    block_size: u32,
    /// Number of times the cursor has jumped back to `base`.
    wraps: u64,
}

impl RemoteAllocator {
    /// Create an allocator over a validated arena.
    #[must_use]
    pub const fn new(config: ArenaConfig) -> Self {
        Self {
            base: config.base(),
            limit: config.limit(),
            cursor: config.base(),
            block_size: config.block_size(),
            wraps: 0,
        }
    }

    /// First address of the arena.
    #[must_use]
    pub const fn base(&self) -> Paddr {
        self.base
    }

    /// Exclusive end of the arena.
    #[must_use]
    pub const fn limit(&self) -> Paddr {
        self.limit
    }

    /// Next address that would be handed out without wrapping.
    #[must_use]
    pub const fn cursor(&self) -> Paddr {
        self.cursor
    }

    /// Allocation granularity in bytes.
    #[must_use]
    pub const fn block_size(&self) -> u32 {
        self.block_size
    }

    /// How many times the arena has wrapped.
    ///
    /// Handles issued before the latest wrap may overlap newer ones.
    #[must_use]
    pub const fn wrap_count(&self) -> u64 {
        self.wraps
    }

    /// Allocate `size` bytes.
    ///
    /// The reserved span is `size` rounded up to the block size; the
    /// returned handle keeps `size` as its logical length.
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidSize`] if `size` is zero
    /// - [`ClientError::AllocationTooLarge`] if the rounded size exceeds the
    ///   whole arena
    pub fn allocate(&mut self, size: u32) -> Result<MemoryHandle> {
        if size == 0 {
            return Err(ClientError::InvalidSize);
        }

        let arena = self.limit.diff(self.base);
        let rounded = u64::from(size).next_multiple_of(u64::from(self.block_size));
        let reserved = u32::try_from(rounded)
            .ok()
            .filter(|&r| r <= arena)
            .ok_or(ClientError::AllocationTooLarge {
                size: rounded,
                arena,
            })?;

        let end = u64::from(self.cursor.as_u32()) + rounded;
        if end >= u64::from(self.limit.as_u32()) && self.cursor != self.base {
            debug!(cursor = %self.cursor, size = reserved, "arena wrapped");
            self.cursor = self.base;
            self.wraps += 1;
        }

        let address = self.cursor;
        self.cursor = self.cursor.add(reserved);
        Ok(MemoryHandle::allocated(address, size, reserved))
    }

    /// Individual deallocation is not supported.
    ///
    /// # Errors
    ///
    /// Always returns [`ClientError::Unsupported`].
    pub const fn free(&mut self, _handle: &MemoryHandle) -> Result<()> {
        Err(ClientError::Unsupported("freeing arena memory"))
    }
}

impl Default for RemoteAllocator {
    fn default() -> Self {
        Self::new(ArenaConfig::default())
    }
}
