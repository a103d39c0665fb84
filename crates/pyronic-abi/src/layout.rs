// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Guest memory layout and wire size constants.
//!
//! The host client borrows a window of PPC-visible MEM2 as scratch space for
//! request messages and argument buffers. Everything outside that window is
//! only touched through pinned handles.
//!
//! # Guest Physical Layout (as used by the client)
//!
//! ```text
//! 0x0000_0000  MEM1 (pinned targets, e.g. loader stubs at 0x0001_0000)
//! 0x0100_0000  Allocation arena base
//! 0x0178_0000  Allocation arena limit (exclusive)
//! 0x1000_0000  MEM2 (pinned targets, e.g. kernel images)
//! ```

/// Default base address of the allocation arena.
pub const ARENA_BASE: u32 = 0x0100_0000;

/// Default exclusive end address of the allocation arena.
pub const ARENA_LIMIT: u32 = 0x0178_0000;

/// Size of the default allocation arena (7.5 MB).
pub const ARENA_SIZE: u32 = ARENA_LIMIT - ARENA_BASE;

/// Allocation granularity of the arena (64 bytes).
///
/// Every arena allocation starts on a block boundary and reserves a whole
/// number of blocks.
pub const BLOCK_SIZE: u32 = 0x40;

/// Size of an encoded IOS IPC message.
pub const MESSAGE_SIZE: usize = 0x20;

/// Number of argument words carried by an IPC message.
pub const MESSAGE_ARG_COUNT: usize = 5;

/// Size of the response buffer the server hands back.
pub const RESPONSE_SIZE: u32 = 0x20;

/// Offset of the signed result code within an encoded message.
pub const RESULT_OFFSET: usize = 4;

/// Size of one encoded ioctlv table entry.
pub const IOCTLV_ENTRY_SIZE: usize = 8;

/// Size of an encoded socket protocol header.
pub const HEADER_SIZE: usize = 12;

/// Size of the response pointer sent after an IPC message completes.
pub const RESPONSE_PTR_SIZE: usize = 4;

/// Default path of the PPC HLE server socket.
pub const DEFAULT_SOCKET_PATH: &str = "/tmp/ironic.sock";

// Compile-time layout checks
const _: () = {
    assert!(ARENA_BASE < ARENA_LIMIT);
    assert!(BLOCK_SIZE.is_power_of_two());
    assert!(ARENA_BASE % BLOCK_SIZE == 0);
    assert!(MESSAGE_SIZE == 12 + MESSAGE_ARG_COUNT * 4);
    assert!(RESPONSE_SIZE as usize == MESSAGE_SIZE);
};
