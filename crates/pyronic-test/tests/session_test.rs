// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! End-to-end session tests against the simulated HLE server.

// Test code prioritizes clarity over defensive programming
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, missing_docs)]

mod common;

use common::{ES_FD, READ_FILL, es_client};
use pyronic_abi::transport::TransportKind;
use pyronic_abi::{Command, IosError, IpcMessage, Paddr};
use pyronic_client::ClientError;
use std::io::Write;

// ============================================================================
// File Operations
// ============================================================================

#[test]
fn open_and_close_device() {
    let mut ipc = es_client();
    let fd = ipc.open("/dev/es", 0).unwrap();
    assert_eq!(fd, ES_FD);
    assert_eq!(ipc.close(fd).unwrap(), 0);

    let messages = ipc.transport().channel().messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].opcode(), Some(Command::Open));
    assert_eq!(messages[0].result, ES_FD);
    assert_eq!(messages[1].opcode(), Some(Command::Close));
    assert_eq!(messages[1].fd, ES_FD);
}

#[test]
fn open_missing_device_returns_remote_code() {
    let mut ipc = es_client();
    let res = ipc.open("/dev/nope", 0).unwrap();
    assert_eq!(IosError::from_code(res), Some(IosError::FsNotFound));
    assert!(!ipc.transport().is_poisoned());
}

#[test]
fn result_is_written_back_in_place() {
    let mut ipc = es_client();
    let message = IpcMessage::new(Command::Close, 99, &[]).unwrap();
    let response = ipc.ipc_request(&message).unwrap();

    let bytes = ipc.read_handle(&response).unwrap();
    let decoded = IpcMessage::decode(&bytes).unwrap();
    assert_eq!(decoded.result, IosError::FsInvalid.code());
    assert_eq!(decoded.fd, 99);
}

#[test]
fn read_fills_buffer() {
    let mut ipc = es_client();
    let buf = ipc.alloc_raw(0x10).unwrap();
    assert_eq!(ipc.read(ES_FD, &buf).unwrap(), 0x10);
    assert_eq!(ipc.read_payload(&buf).unwrap(), vec![READ_FILL; 0x10]);
}

#[test]
fn write_and_seek_pass_arguments() {
    let mut ipc = es_client();
    let buf = ipc.alloc_buf(b"payload").unwrap();
    assert_eq!(ipc.write(ES_FD, &buf).unwrap(), 7);
    assert_eq!(ipc.seek(ES_FD, -8, 1).unwrap(), -8);
}

// ============================================================================
// Memory
// ============================================================================

#[test]
fn guest_memory_round_trip() {
    let mut ipc = es_client();
    ipc.guest_write(Paddr::new(0x1330_0000), &[1, 2, 3]).unwrap();
    assert_eq!(ipc.guest_read(Paddr::new(0x1330_0000), 3).unwrap(), [1, 2, 3]);

    let pinned = ipc.pin_buf(Paddr::new(0x1330_0100), b"pin").unwrap();
    assert_eq!(
        ipc.transport().channel().memory().read(pinned.address(), 3),
        b"pin"
    );
}

#[test]
fn read_returns_reserved_span() {
    let mut ipc = es_client();
    let handle = ipc.alloc_buf(&[0x11; 5]).unwrap();
    let full = ipc.read_handle(&handle).unwrap();
    assert_eq!(full.len(), 0x40);
    assert_eq!(&full[..5], &[0x11; 5]);
    assert_eq!(ipc.read_payload(&handle).unwrap(), [0x11; 5]);
}

// ============================================================================
// Protocol
// ============================================================================

#[test]
fn no_return_message_is_recorded() {
    let mut ipc = es_client();
    let message = IpcMessage::new(Command::Ioctlv, ES_FD, &[0x25, 0, 0, 0]).unwrap();
    ipc.ipc_request_no_return(&message).unwrap();

    let remote = ipc.transport().channel();
    assert!(remote.messages().is_empty());
    assert_eq!(remote.no_return_messages(), [message]);
    assert_eq!(
        remote.requests().last().map(|h| h.kind),
        Some(TransportKind::MessageNoReturn)
    );
}

#[test]
fn ack_is_acknowledged() {
    let mut ipc = es_client();
    ipc.send_ack().unwrap();
    assert_eq!(
        ipc.transport().channel().requests()[0].kind,
        TransportKind::Ack
    );
}

#[test]
fn nack_poisons_session() {
    let mut ipc = es_client();
    ipc.transport_mut().channel_mut().set_ack(b"NO");

    let err = ipc.open("/dev/es", 0).unwrap_err();
    assert!(matches!(err, ClientError::TransportNack { ref reply } if reply == b"NO"));
    assert!(err.is_fatal());
    assert!(ipc.transport().is_poisoned());

    // The poisoned session sends nothing further.
    let before = ipc.transport().channel().requests().len();
    assert!(matches!(ipc.close(ES_FD), Err(ClientError::Desynchronized)));
    assert_eq!(ipc.transport().channel().requests().len(), before);
}

#[test]
fn server_hang_up_is_fatal() {
    let mut ipc = es_client();
    ipc.transport_mut()
        .channel_mut()
        .write_all(&[9, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0])
        .unwrap();
    assert!(ipc.transport().channel().is_hung_up());

    let err = ipc.guest_read(Paddr::new(0x1000), 4).unwrap_err();
    assert!(matches!(err, ClientError::Io(_)));
    assert!(ipc.transport().is_poisoned());
}

#[test]
fn close_channel() {
    let mut ipc = es_client();
    ipc.transport_mut().close().unwrap();
    assert!(ipc.transport().channel().is_closed());
}

#[test]
fn shutdown_consumes_client() {
    let ipc = es_client();
    ipc.shutdown().unwrap();
}
