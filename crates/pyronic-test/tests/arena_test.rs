// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Arena wraparound as observed through guest memory.

// Test code prioritizes clarity over defensive programming
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, missing_docs)]

use pyronic_abi::Paddr;
use pyronic_client::{ArenaConfig, ClientError, IpcClient};
use pyronic_test::MockRemote;

fn small_arena_client() -> IpcClient<MockRemote> {
    pyronic_test::init_tracing();
    let arena = ArenaConfig::new(Paddr::new(0x0100_0000), Paddr::new(0x0100_0100), 0x40).unwrap();
    IpcClient::with_channel(MockRemote::new(), arena)
}

#[test]
fn stale_handle_aliases_after_wrap() {
    let mut ipc = small_arena_client();
    let first = ipc.alloc_buf(b"first").unwrap();
    ipc.alloc_raw(0x40).unwrap();
    ipc.alloc_raw(0x40).unwrap();
    assert_eq!(ipc.arena().wrap_count(), 0);

    let fresh = ipc.alloc_buf(b"fresh").unwrap();
    assert_eq!(ipc.arena().wrap_count(), 1);
    assert_eq!(fresh.address(), first.address());

    // The old handle now sees the new contents.
    assert_eq!(ipc.read_payload(&first).unwrap(), b"fresh");
}

#[test]
fn requests_keep_working_across_wraps() {
    let mut ipc = small_arena_client();
    for fd in 0..16 {
        assert_eq!(ipc.close(fd).unwrap(), 0);
    }
    assert!(ipc.arena().wrap_count() > 0);
    assert_eq!(ipc.transport().channel().messages().len(), 16);
}

#[test]
fn oversized_buffer_is_rejected_before_io() {
    let mut ipc = small_arena_client();
    let err = ipc.alloc_buf(&[0u8; 0x101]).unwrap_err();
    assert!(matches!(err, ClientError::AllocationTooLarge { .. }));
    assert!(!err.is_fatal());
    assert!(ipc.transport().channel().requests().is_empty());
}

#[test]
fn whole_arena_buffer_fits() {
    let mut ipc = small_arena_client();
    let handle = ipc.alloc_buf(&[0x5a; 0x100]).unwrap();
    assert_eq!(handle.address().as_u32(), 0x0100_0000);
    assert_eq!(handle.reserved(), 0x100);
}
