// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! # Pyronic Client
//!
//! Host-side client for the ironic PPC HLE server.
//!
//! The server exposes guest physical memory and the PPC-to-ARM IPC mailbox
//! over a local socket. This crate drives IOS through it:
//! - Carves request and argument buffers out of a guest memory arena
//! - Reads and writes guest memory through [`MemoryHandle`]s
//! - Delivers IOS IPC requests and collects their results
//! - Marshals vectored ioctl arguments into descriptor tables
//!
//! Everything is synchronous. A session owns one channel and one arena, and
//! exactly one request is in flight at a time.
//!
//! # Example
//!
//! ```no_run
//! use pyronic_client::{IoctlvArg, IoctlvArgs, IpcClient, SessionConfig};
//!
//! # fn main() -> pyronic_client::Result<()> {
//! let mut ipc = IpcClient::connect(&SessionConfig::from_env())?;
//! let fd = ipc.open("/dev/es", 0)?;
//!
//! let count = ipc.alloc_raw(4)?;
//! let res = ipc.ioctlv(fd, 0x0e, &IoctlvArgs::new(vec![], vec![IoctlvArg::Buffer(count)]))?;
//! if res >= 0 {
//!     let titles = ipc.read_payload(&count)?;
//!     println!("{titles:02x?}");
//! }
//!
//! ipc.close(fd)?;
//! ipc.shutdown()
//! # }
//! ```

pub mod arena;
pub mod channel;
pub mod client;
pub mod config;
pub mod error;
pub mod handle;
pub mod ioctlv;
pub mod transport;

// Re-export commonly used types at crate root
pub use arena::RemoteAllocator;
pub use channel::Channel;
pub use client::{IoctlvRequest, IpcClient};
pub use config::{ArenaConfig, SessionConfig};
pub use error::{ClientError, Result};
pub use handle::MemoryHandle;
pub use ioctlv::{FormatArg, IoctlvArg, IoctlvArgs};
pub use pyronic_abi::{Command, IpcMessage, Paddr};
pub use transport::TransportSession;

/// Crate version.
pub const VERSION: &str = match option_env!("PYRONIC_VERSION") {
    Some(v) => v,
    None => env!("CARGO_PKG_VERSION"),
};
