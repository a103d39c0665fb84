// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Session configuration.
//!
//! Defaults come from [`pyronic_abi::layout`]. The socket path can be
//! overridden with the `PYRONIC_SOCKET` environment variable.

use crate::error::{ClientError, Result};
use pyronic_abi::Paddr;
use pyronic_abi::layout::{ARENA_BASE, ARENA_LIMIT, BLOCK_SIZE, DEFAULT_SOCKET_PATH};
use std::path::PathBuf;

/// Environment variable overriding the server socket path.
pub const SOCKET_ENV: &str = "PYRONIC_SOCKET";

/// Guest memory window used for dynamic allocations.
///
/// Only obtainable through [`ArenaConfig::new`] or [`Default`], so an
/// allocator never sees an empty range or a zero block size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    base: Paddr,
    limit: Paddr,
    block_size: u32,
}

impl ArenaConfig {
    /// Create a validated arena configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArena`] if the range is empty, the
    /// block size is not a power of two, or `base` is not block-aligned.
    pub fn new(base: Paddr, limit: Paddr, block_size: u32) -> Result<Self> {
        if base >= limit {
            return Err(ClientError::InvalidArena("base must be below limit"));
        }
        if base.is_aligned(block_size) != Some(true) {
            return Err(ClientError::InvalidArena(
                "block size must be a power of two dividing base",
            ));
        }
        Ok(Self {
            base,
            limit,
            block_size,
        })
    }

    /// First address of the arena.
    #[must_use]
    pub const fn base(&self) -> Paddr {
        self.base
    }

    /// Exclusive end address of the arena.
    #[must_use]
    pub const fn limit(&self) -> Paddr {
        self.limit
    }

    /// Allocation granularity in bytes.
    #[must_use]
    pub const fn block_size(&self) -> u32 {
        self.block_size
    }

    /// Total number of bytes in the arena.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.limit.diff(self.base)
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            base: Paddr::new(ARENA_BASE),
            limit: Paddr::new(ARENA_LIMIT),
            block_size: BLOCK_SIZE,
        }
    }
}

/// Everything needed to open a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Path of the server's Unix socket.
    pub socket_path: PathBuf,
    /// Arena used for request and argument buffers.
    pub arena: ArenaConfig,
}

impl SessionConfig {
    /// Default configuration with the socket path taken from
    /// `PYRONIC_SOCKET` when set.
    #[must_use]
    pub fn from_env() -> Self {
        let config = Self::default();
        match std::env::var_os(SOCKET_ENV) {
            Some(path) if !path.is_empty() => config.with_socket_path(path),
            _ => config,
        }
    }

    /// Replace the socket path.
    #[must_use]
    pub fn with_socket_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.socket_path = path.into();
        self
    }

    /// Replace the arena.
    #[must_use]
    pub const fn with_arena(mut self, arena: ArenaConfig) -> Self {
        self.arena = arena;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            socket_path: PathBuf::from(DEFAULT_SOCKET_PATH),
            arena: ArenaConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn default_arena_is_valid() {
        let arena = ArenaConfig::default();
        let checked = ArenaConfig::new(arena.base(), arena.limit(), arena.block_size()).unwrap();
        assert_eq!(checked, arena);
        assert_eq!(arena.size(), 0x0078_0000);
    }

    #[test]
    fn arena_rejects_empty_range() {
        let err = ArenaConfig::new(Paddr::new(0x2000), Paddr::new(0x2000), 0x40).unwrap_err();
        assert!(matches!(err, ClientError::InvalidArena(_)));
        let err = ArenaConfig::new(Paddr::new(0x3000), Paddr::new(0x2000), 0x40).unwrap_err();
        assert!(matches!(err, ClientError::InvalidArena(_)));
    }

    #[test]
    fn arena_rejects_bad_block_size() {
        let err = ArenaConfig::new(Paddr::new(0x1000), Paddr::new(0x2000), 0x30).unwrap_err();
        assert!(matches!(err, ClientError::InvalidArena(_)));
        let err = ArenaConfig::new(Paddr::new(0x1000), Paddr::new(0x2000), 0).unwrap_err();
        assert!(matches!(err, ClientError::InvalidArena(_)));
    }

    #[test]
    fn arena_rejects_unaligned_base() {
        let err = ArenaConfig::new(Paddr::new(0x1010), Paddr::new(0x2000), 0x40).unwrap_err();
        assert!(matches!(err, ClientError::InvalidArena(_)));
    }

    #[test]
    fn builder_overrides() {
        let arena = ArenaConfig::new(Paddr::new(0x1000), Paddr::new(0x1040), 0x40).unwrap();
        let config = SessionConfig::default()
            .with_socket_path("/tmp/other.sock")
            .with_arena(arena);
        assert_eq!(config.socket_path, PathBuf::from("/tmp/other.sock"));
        assert_eq!(config.arena, arena);
    }
}
