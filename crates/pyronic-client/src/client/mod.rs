// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! IOS IPC client.
//!
//! [`IpcClient`] owns one transport session and one arena. Every request
//! follows the same cycle:
//!
//! 1. Encode the 32-byte request message
//! 2. Copy it into a fresh arena buffer
//! 3. Deliver the buffer address and wait for the response pointer
//! 4. Read the response message and return its result field
//!
//! Result codes from IOS are returned verbatim. Negative values are remote
//! failures (see [`IosError`](pyronic_abi::IosError)), not local errors.


use crate::arena::RemoteAllocator;
use crate::channel::Channel;
use crate::config::ArenaConfig;
use crate::error::{ClientError, Result};
use crate::handle::MemoryHandle;
use crate::ioctlv::{FormatArg, IoctlvArg, IoctlvArgs};
use crate::transport::TransportSession;
use pyronic_abi::ioctlv::encode_table;
use pyronic_abi::message::decode_result;
use pyronic_abi::{Command, IoctlvEntry, IpcMessage, Paddr, ScalarWidth};
use tracing::{debug, info};

/// A marshaled ioctlv request, ready to send.
///
/// Scalar buffers and the descriptor table have already been written to
/// guest memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IoctlvRequest {
    /// The request message.
    pub message: IpcMessage,
    /// Input descriptors in table order.
    pub inputs: Vec<IoctlvEntry>,
    /// Output descriptors in table order.
    pub outputs: Vec<IoctlvEntry>,
    /// The descriptor table, `None` when there are no arguments.
    pub table: Option<MemoryHandle>,
}

/// Client for the PPC HLE server.
#[derive(Debug)]
pub struct IpcClient<C> {
    transport: TransportSession<C>,
    arena: RemoteAllocator,
}

#[cfg(unix)]
impl IpcClient<std::os::unix::net::UnixStream> {
    /// Connect to the server's Unix socket.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Io`] if the socket cannot be reached.
    pub fn connect(config: &crate::config::SessionConfig) -> Result<Self> {
        let stream = std::os::unix::net::UnixStream::connect(&config.socket_path)?;
        info!(socket = %config.socket_path.display(), "connected to HLE server");
        Ok(Self::with_channel(stream, config.arena))
    }
}

impl<C: Channel> IpcClient<C> {
    /// Build a client over an already connected channel.
    #[must_use]
    pub const fn with_channel(channel: C, arena: ArenaConfig) -> Self {
        Self {
            transport: TransportSession::new(channel),
            arena: RemoteAllocator::new(arena),
        }
    }

    /// The transport session.
    #[must_use]
    pub const fn transport(&self) -> &TransportSession<C> {
        &self.transport
    }

    /// The transport session, mutably.
    pub const fn transport_mut(&mut self) -> &mut TransportSession<C> {
        &mut self.transport
    }

    /// The arena allocator.
    #[must_use]
    pub const fn arena(&self) -> &RemoteAllocator {
        &self.arena
    }

    /// Close the connection and end the session.
    ///
    /// # Errors
    ///
    /// Returns the channel's I/O error.
    pub fn shutdown(mut self) -> Result<()> {
        info!("closing HLE session");
        self.transport.close()
    }

    // =========================================================================
    // Guest Memory
    // =========================================================================

    /// Allocate uninitialized arena memory.
    ///
    /// # Errors
    ///
    /// Returns any allocator error.
    pub fn alloc_raw(&mut self, size: u32) -> Result<MemoryHandle> {
        self.arena.allocate(size)
    }

    /// Allocate arena memory initialized with `data`.
    ///
    /// # Errors
    ///
    /// Returns any allocator or transport error.
    pub fn alloc_buf(&mut self, data: &[u8]) -> Result<MemoryHandle> {
        let handle = self.arena.allocate(payload_len(data)?)?;
        handle.write(&mut self.transport, data)?;
        Ok(handle)
    }

    /// A handle at a fixed guest address. No I/O happens.
    #[must_use]
    pub const fn pin_raw(&self, address: Paddr, size: u32) -> MemoryHandle {
        MemoryHandle::pinned(address, size)
    }

    /// Write `data` at a fixed guest address and return a handle to it.
    ///
    /// # Errors
    ///
    /// Returns any transport error.
    pub fn pin_buf(&mut self, address: Paddr, data: &[u8]) -> Result<MemoryHandle> {
        let handle = MemoryHandle::pinned(address, payload_len(data)?);
        handle.write(&mut self.transport, data)?;
        Ok(handle)
    }

    /// Release a handle. The arena cannot do this.
    ///
    /// # Errors
    ///
    /// Always returns [`ClientError::Unsupported`].
    pub fn free(&mut self, handle: &MemoryHandle) -> Result<()> {
        self.arena.free(handle)
    }

    /// Read a handle's whole backing span.
    ///
    /// # Errors
    ///
    /// Returns any transport error.
    pub fn read_handle(&mut self, handle: &MemoryHandle) -> Result<Vec<u8>> {
        handle.read(&mut self.transport)
    }

    /// Read a handle's logical payload.
    ///
    /// # Errors
    ///
    /// Returns any transport error.
    pub fn read_payload(&mut self, handle: &MemoryHandle) -> Result<Vec<u8>> {
        handle.read_payload(&mut self.transport)
    }

    /// Write into a handle.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::BufferOverrun`] or any transport error.
    pub fn write_handle(&mut self, handle: &MemoryHandle, data: &[u8]) -> Result<()> {
        handle.write(&mut self.transport, data)
    }

    /// Read raw guest memory.
    ///
    /// # Errors
    ///
    /// Returns any transport error.
    pub fn guest_read(&mut self, address: Paddr, len: u32) -> Result<Vec<u8>> {
        self.transport.guest_read(address, len)
    }

    /// Write raw guest memory.
    ///
    /// # Errors
    ///
    /// Returns any transport error.
    pub fn guest_write(&mut self, address: Paddr, data: &[u8]) -> Result<()> {
        self.transport.guest_write(address, data)
    }

    // =========================================================================
    // Requests
    // =========================================================================

    /// Deliver a request and return a handle to its response message.
    ///
    /// # Errors
    ///
    /// Returns any allocator or transport error.
    pub fn ipc_request(&mut self, message: &IpcMessage) -> Result<MemoryHandle> {
        debug!(
            command = message.command,
            fd = message.fd,
            args = ?message.args,
            "ipc request"
        );
        let request = self.alloc_buf(&message.encode())?;
        self.transport.send_message(request.address())?;
        let response = self.transport.receive_response()?;
        Ok(MemoryHandle::response(response))
    }

    /// Deliver a request without waiting for a response.
    ///
    /// For requests after which the guest never returns control.
    ///
    /// # Errors
    ///
    /// Returns any allocator or transport error.
    pub fn ipc_request_no_return(&mut self, message: &IpcMessage) -> Result<()> {
        debug!(command = message.command, fd = message.fd, "ipc request, no return");
        let request = self.alloc_buf(&message.encode())?;
        self.transport.send_message_no_return(request.address())
    }

    /// Acknowledge the last response.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::TransportNack`] if the server does not
    /// acknowledge.
    pub fn send_ack(&mut self) -> Result<()> {
        self.transport.send_ack()
    }

    fn request_result(&mut self, message: &IpcMessage) -> Result<i32> {
        let response = self.ipc_request(message)?;
        let bytes = response.read(&mut self.transport)?;
        let result = decode_result(&bytes)?;
        debug!(command = message.command, result, "ipc result");
        Ok(result)
    }

    // =========================================================================
    // IOS Operations
    // =========================================================================

    /// Open a device or file. Returns a descriptor or a negative error.
    ///
    /// # Errors
    ///
    /// Returns any local failure. IOS errors are in the returned value.
    pub fn open(&mut self, path: &str, mode: u32) -> Result<i32> {
        let mut name = Vec::with_capacity(path.len() + 1);
        name.extend_from_slice(path.as_bytes());
        name.push(0);
        let name = self.alloc_buf(&name)?;
        let message = IpcMessage::new(Command::Open, 0, &[name.address().as_u32(), mode])?;
        self.request_result(&message)
    }

    /// Close a descriptor.
    ///
    /// # Errors
    ///
    /// Returns any local failure.
    pub fn close(&mut self, fd: i32) -> Result<i32> {
        let message = IpcMessage::new(Command::Close, fd, &[])?;
        self.request_result(&message)
    }

    /// Read from a descriptor into `buf`. Returns the byte count or an error.
    ///
    /// # Errors
    ///
    /// Returns any local failure.
    pub fn read(&mut self, fd: i32, buf: &MemoryHandle) -> Result<i32> {
        let message = IpcMessage::new(Command::Read, fd, &[buf.address().as_u32(), buf.size()])?;
        self.request_result(&message)
    }

    /// Write `buf` to a descriptor. Returns the byte count or an error.
    ///
    /// # Errors
    ///
    /// Returns any local failure.
    pub fn write(&mut self, fd: i32, buf: &MemoryHandle) -> Result<i32> {
        let message = IpcMessage::new(Command::Write, fd, &[buf.address().as_u32(), buf.size()])?;
        self.request_result(&message)
    }

    /// Move a descriptor's file offset.
    ///
    /// # Errors
    ///
    /// Returns any local failure.
    pub fn seek(&mut self, fd: i32, offset: i32, whence: u32) -> Result<i32> {
        let message = IpcMessage::new(Command::Seek, fd, &[offset as u32, whence])?;
        self.request_result(&message)
    }

    /// Issue a plain ioctl with optional input and output buffers.
    ///
    /// # Errors
    ///
    /// Returns any local failure.
    pub fn ioctl(
        &mut self,
        fd: i32,
        command: u32,
        input: Option<&MemoryHandle>,
        output: Option<&MemoryHandle>,
    ) -> Result<i32> {
        let (in_addr, in_len) = input.map_or((0, 0), |h| (h.address().as_u32(), h.size()));
        let (out_addr, out_len) = output.map_or((0, 0), |h| (h.address().as_u32(), h.size()));
        let message = IpcMessage::new(
            Command::Ioctl,
            fd,
            &[command, in_addr, in_len, out_addr, out_len],
        )?;
        self.request_result(&message)
    }

    /// Marshal an ioctlv request without sending it.
    ///
    /// Scalars are copied into fresh arena buffers and the descriptor table
    /// is written to guest memory. Output buffers of size zero are kept.
    ///
    /// # Errors
    ///
    /// Returns any allocator or transport error.
    pub fn prepare_ioctlv(
        &mut self,
        fd: i32,
        command: u32,
        args: &IoctlvArgs,
    ) -> Result<IoctlvRequest> {
        let inputs = self.marshal(&args.inputs)?;
        let outputs = self.marshal(&args.outputs)?;

        let table = if inputs.is_empty() && outputs.is_empty() {
            None
        } else {
            Some(self.alloc_buf(&encode_table(&inputs, &outputs))?)
        };
        let table_addr = table.map_or(0, |t| t.address().as_u32());

        let message = IpcMessage::new(
            Command::Ioctlv,
            fd,
            &[
                command,
                count(inputs.len())?,
                count(outputs.len())?,
                table_addr,
            ],
        )?;
        Ok(IoctlvRequest {
            message,
            inputs,
            outputs,
            table,
        })
    }

    /// Issue a vectored ioctl.
    ///
    /// # Errors
    ///
    /// Returns any local failure.
    pub fn ioctlv(&mut self, fd: i32, command: u32, args: &IoctlvArgs) -> Result<i32> {
        let request = self.prepare_ioctlv(fd, command, args)?;
        self.request_result(&request.message)
    }

    /// Issue a vectored ioctl described by a format string.
    ///
    /// See [`IoctlvArgs::parse`] for the format.
    ///
    /// # Errors
    ///
    /// Returns any parse or local failure.
    pub fn ioctlv_fmt(
        &mut self,
        fd: i32,
        command: u32,
        format: &str,
        args: &[FormatArg],
    ) -> Result<i32> {
        let args = IoctlvArgs::parse(format, args)?;
        self.ioctlv(fd, command, &args)
    }

    fn marshal(&mut self, args: &[IoctlvArg]) -> Result<Vec<IoctlvEntry>> {
        args.iter()
            .map(|arg| {
                let bytes = match *arg {
                    IoctlvArg::Buffer(handle) => return Ok(handle.entry()),
                    IoctlvArg::Scalar8(v) => ScalarWidth::Byte.encode(u64::from(v)),
                    IoctlvArg::Scalar16(v) => ScalarWidth::Half.encode(u64::from(v)),
                    IoctlvArg::Scalar32(v) => ScalarWidth::Word.encode(u64::from(v)),
                    IoctlvArg::Scalar64(v) => ScalarWidth::Quad.encode(v),
                };
                Ok(self.alloc_buf(bytes.as_bytes())?.entry())
            })
            .collect()
    }
}

fn payload_len(data: &[u8]) -> Result<u32> {
    u32::try_from(data.len()).map_err(|_| ClientError::PayloadTooLarge(data.len()))
}

fn count(n: usize) -> Result<u32> {
    u32::try_from(n).map_err(|_| ClientError::PayloadTooLarge(n))
}
