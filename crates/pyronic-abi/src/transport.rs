// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Socket control protocol between the host client and the PPC HLE server.
//!
//! Every request starts with a fixed 12-byte little-endian header. Only
//! `Write` carries a payload (of `length` bytes) after the header.
//!
//! | Kind | Value | `addr` | `length` | Reply |
//! |------|-------|--------|----------|-------|
//! | `Read` | 1 | guest address | bytes to read | `length` bytes |
//! | `Write` | 2 | guest address | payload bytes | `"OK"` |
//! | `Message` | 3 | request pointer | 4 | `"OK"`, then a 4-byte LE response pointer |
//! | `Ack` | 4 | 0 | 0 | `"OK"` |
//! | `MessageNoReturn` | 5 | request pointer | 4 | nothing |

use crate::layout::HEADER_SIZE;
use crate::types::Paddr;

/// Acknowledgement sent by the server after a successful request.
pub const ACK: [u8; 2] = *b"OK";

/// Length field used by message requests (the size of a pointer).
pub const MESSAGE_PTR_LEN: u32 = 4;

/// Socket request kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum TransportKind {
    /// Read guest memory.
    Read = 1,
    /// Write guest memory.
    Write = 2,
    /// Deliver an IPC request and wait for its completion.
    Message = 3,
    /// Acknowledge a delivered response.
    Ack = 4,
    /// Deliver an IPC request without waiting for anything.
    MessageNoReturn = 5,
}

impl TransportKind {
    /// Try to convert from a raw value.
    #[must_use]
    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            1 => Some(Self::Read),
            2 => Some(Self::Write),
            3 => Some(Self::Message),
            4 => Some(Self::Ack),
            5 => Some(Self::MessageNoReturn),
            _ => None,
        }
    }
}

/// A socket request header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransportHeader {
    /// Request kind.
    pub kind: TransportKind,
    /// Guest address or request pointer.
    pub addr: Paddr,
    /// Payload or read length.
    pub length: u32,
}

impl TransportHeader {
    /// Header for reading `length` bytes at `addr`.
    #[must_use]
    pub const fn read(addr: Paddr, length: u32) -> Self {
        Self {
            kind: TransportKind::Read,
            addr,
            length,
        }
    }

    /// Header for writing a `length`-byte payload to `addr`.
    #[must_use]
    pub const fn write(addr: Paddr, length: u32) -> Self {
        Self {
            kind: TransportKind::Write,
            addr,
            length,
        }
    }

    /// Header delivering the request at `ptr`.
    #[must_use]
    pub const fn message(ptr: Paddr) -> Self {
        Self {
            kind: TransportKind::Message,
            addr: ptr,
            length: MESSAGE_PTR_LEN,
        }
    }

    /// Header delivering the request at `ptr` without a reply.
    #[must_use]
    pub const fn message_no_return(ptr: Paddr) -> Self {
        Self {
            kind: TransportKind::MessageNoReturn,
            addr: ptr,
            length: MESSAGE_PTR_LEN,
        }
    }

    /// Header acknowledging a response.
    #[must_use]
    pub const fn ack() -> Self {
        Self {
            kind: TransportKind::Ack,
            addr: Paddr::null(),
            length: 0,
        }
    }

    /// Encode into the 12-byte little-endian wire form.
    #[must_use]
    pub const fn encode(self) -> [u8; HEADER_SIZE] {
        let k = (self.kind as u32).to_le_bytes();
        let a = self.addr.as_u32().to_le_bytes();
        let l = self.length.to_le_bytes();
        [
            k[0], k[1], k[2], k[3], a[0], a[1], a[2], a[3], l[0], l[1], l[2], l[3],
        ]
    }

    /// Decode a header from its wire form.
    ///
    /// Returns `None` if the kind is unknown.
    #[must_use]
    pub const fn decode(bytes: [u8; HEADER_SIZE]) -> Option<Self> {
        let raw = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let Some(kind) = TransportKind::from_u32(raw) else {
            return None;
        };
        Some(Self {
            kind,
            addr: Paddr::new(u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]])),
            length: u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
        })
    }
}

/// Decode the little-endian response pointer sent after a message completes.
#[must_use]
pub const fn decode_response_ptr(bytes: [u8; 4]) -> Paddr {
    Paddr::new(u32::from_le_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_encode_is_little_endian() {
        let header = TransportHeader::write(Paddr::new(0x0100_0040), 0x20);
        assert_eq!(
            header.encode(),
            [2, 0, 0, 0, 0x40, 0x00, 0x00, 0x01, 0x20, 0, 0, 0]
        );
    }

    #[test]
    fn message_headers_carry_pointer_length() {
        let ptr = Paddr::new(0x0100_0000);
        assert_eq!(TransportHeader::message(ptr).length, 4);
        assert_eq!(TransportHeader::message_no_return(ptr).length, 4);
        assert_ne!(
            TransportHeader::message(ptr).encode()[0],
            TransportHeader::message_no_return(ptr).encode()[0]
        );
    }

    #[test]
    fn header_decode_round_trip() {
        let headers = [
            TransportHeader::read(Paddr::new(0x1000), 0x40),
            TransportHeader::write(Paddr::new(0x2000), 3),
            TransportHeader::message(Paddr::new(0x3000)),
            TransportHeader::message_no_return(Paddr::new(0x4000)),
            TransportHeader::ack(),
        ];
        for header in headers {
            assert_eq!(TransportHeader::decode(header.encode()), Some(header));
        }
    }

    #[test]
    fn header_decode_unknown_kind() {
        let mut bytes = TransportHeader::ack().encode();
        bytes[0] = 9;
        assert_eq!(TransportHeader::decode(bytes), None);
    }

    #[test]
    fn response_ptr_is_little_endian() {
        assert_eq!(
            decode_response_ptr([0x20, 0x00, 0x00, 0x01]),
            Paddr::new(0x0100_0020)
        );
    }
}
