// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Wire definitions shared by every Pyronic component.
//!
//! This crate defines the byte-exact contract between the host client and
//! the ironic PPC HLE server:
//! - The 32-bit physical address type used for guest memory
//! - IOS IPC request messages (32 bytes, big-endian)
//! - Ioctlv argument-vector tables and scalar argument encoders
//! - The socket control protocol header (12 bytes, little-endian)
//! - Known IOS result codes and ES ioctlv command numbers
//!
//! # Design Principles
//!
//! - **No dependencies**: Pure data types, 100% host-testable
//! - **Explicit endianness**: Every encoder names its byte order
//! - **Fixed layouts**: Sizes are constants, decoders check them
//!
//! # Modules
//!
//! - [`types`]: Guest physical address type
//! - [`layout`]: Arena defaults and wire sizes
//! - [`message`]: IOS IPC request messages
//! - [`ioctlv`]: Ioctlv tables and scalar encoders
//! - [`transport`]: Socket protocol headers
//! - [`ios`]: IOS result codes and ES commands

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod error;
pub mod ioctlv;
pub mod ios;
pub mod layout;
pub mod message;
pub mod transport;
pub mod types;

// Re-export commonly used types at crate root
pub use error::CodecError;
pub use ioctlv::{IoctlvEntry, ScalarBytes, ScalarWidth};
pub use ios::{EsIoctlv, IosError};
pub use message::{Command, IpcMessage};
pub use transport::{TransportHeader, TransportKind};
pub use types::Paddr;
