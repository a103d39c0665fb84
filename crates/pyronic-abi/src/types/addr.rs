// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Guest physical address type.
//!
//! The emulated bus is 32 bits wide. Every address that crosses the socket,
//! whether an arena buffer, an IPC message or a pinned target, is a
//! [`Paddr`], so it cannot be confused with a length.

use core::fmt;

/// A physical address on the emulated bus.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Paddr(u32);

impl Paddr {
    /// Wrap a raw bus address.
    #[inline]
    #[must_use]
    pub const fn new(addr: u32) -> Self {
        Self(addr)
    }

    /// The zero address, sent where a header field carries no address.
    #[inline]
    #[must_use]
    pub const fn null() -> Self {
        Self(0)
    }

    /// Raw value as it goes on the wire.
    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Address `offset` bytes further on. Wraps at 4 GiB like the bus.
    #[inline]
    #[must_use]
    pub const fn add(self, offset: u32) -> Self {
        Self(self.0.wrapping_add(offset))
    }

    /// Distance from `other` up to `self`, modulo 4 GiB.
    #[inline]
    #[must_use]
    pub const fn diff(self, other: Self) -> u32 {
        self.0.wrapping_sub(other.0)
    }

    /// Whether the address is a multiple of `alignment`.
    ///
    /// Returns `None` if `alignment` is zero or not a power of two.
    #[inline]
    #[must_use]
    pub const fn is_aligned(self, alignment: u32) -> Option<bool> {
        if !alignment.is_power_of_two() {
            return None;
        }
        Some(self.0 & (alignment - 1) == 0)
    }
}

impl fmt::Debug for Paddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Paddr({:#010x})", self.0)
    }
}

impl fmt::Display for Paddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}
