// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Test utilities for Pyronic.
//!
//! Provides an in-process simulation of the ironic PPC HLE server so the
//! client can be exercised end to end without an emulator:
//! - [`GuestMemory`]: sparse guest physical memory
//! - [`MockRemote`]: the socket protocol over that memory, with a pluggable
//!   IOS handler
//! - [`init_tracing`]: log output for tests, filtered by `RUST_LOG`

pub mod memory;
pub mod remote;

pub use memory::GuestMemory;
pub use remote::{Handler, MockRemote};

use pyronic_client::{ArenaConfig, IpcClient};
use tracing_subscriber::EnvFilter;

/// Install a test log subscriber once per process.
///
/// Later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A client talking to `remote` with the default arena.
#[must_use]
pub fn client(remote: MockRemote) -> IpcClient<MockRemote> {
    IpcClient::with_channel(remote, ArenaConfig::default())
}
