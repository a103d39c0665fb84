// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Shared fixtures for integration tests.
//!
//! Provides a small IOS model behind [`MockRemote`]: one ES device with two
//! installed titles, enough to run the title listing flow end to end.
//!
//! This module is **not** a test file, so it must comply with full clippy rules.

#![allow(dead_code, reason = "each test binary uses a subset")]

use pyronic_abi::{Command, EsIoctlv, IosError, IpcMessage, Paddr};
use pyronic_client::IpcClient;
use pyronic_test::{GuestMemory, MockRemote};

/// Descriptor handed out for `/dev/es`.
pub const ES_FD: i32 = 3;

/// Titles reported by the simulated ES device.
pub const TITLES: [u64; 2] = [0x0000_0001_0000_0002, 0x0000_0001_0000_0009];

/// Byte used to fill buffers on `Read`.
pub const READ_FILL: u8 = 0xaa;

/// A client connected to the simulated IOS.
pub fn es_client() -> IpcClient<MockRemote> {
    pyronic_test::init_tracing();
    pyronic_test::client(MockRemote::with_handler(ios))
}

/// One entry of an ioctlv table, read back from guest memory.
pub fn table_entry(mem: &GuestMemory, table: Paddr, index: u32) -> (Paddr, u32) {
    let at = table.add(index * 8);
    (Paddr::new(mem.read_u32(at)), mem.read_u32(at.add(4)))
}

fn ios(msg: &IpcMessage, mem: &mut GuestMemory) -> i32 {
    match msg.opcode() {
        Some(Command::Open) => {
            if mem.read_cstr(Paddr::new(msg.args[0]), 64) == "/dev/es" {
                ES_FD
            } else {
                IosError::FsNotFound.code()
            }
        }
        Some(Command::Close) if msg.fd == ES_FD => 0,
        Some(Command::Read) => {
            let len = msg.args[1] as usize;
            mem.write(Paddr::new(msg.args[0]), &vec![READ_FILL; len]);
            msg.args[1] as i32
        }
        Some(Command::Write) => msg.args[1] as i32,
        Some(Command::Seek) => msg.args[0] as i32,
        Some(Command::Ioctlv) if msg.fd == ES_FD => es_ioctlv(msg, mem),
        _ => IosError::FsInvalid.code(),
    }
}

fn es_ioctlv(msg: &IpcMessage, mem: &mut GuestMemory) -> i32 {
    let [command, in_count, out_count, table, _] = msg.args;
    let table = Paddr::new(table);
    let einval = IosError::EsInvalid.code();

    if command == EsIoctlv::GetTitlesCount.as_u32() {
        if in_count != 0 || out_count != 1 {
            return einval;
        }
        let (out, size) = table_entry(mem, table, 0);
        if size < 4 {
            return einval;
        }
        mem.write_u32(out, TITLES.len() as u32);
        0
    } else if command == EsIoctlv::GetTitles.as_u32() {
        if in_count != 1 || out_count != 1 {
            return einval;
        }
        let (count_addr, _) = table_entry(mem, table, 0);
        let (out, size) = table_entry(mem, table, 1);
        let count = mem.read_u32(count_addr) as usize;
        if count > TITLES.len() || (size as usize) < count * 8 {
            return einval;
        }
        let ids: Vec<u8> = TITLES[..count].iter().flat_map(|t| t.to_be_bytes()).collect();
        mem.write(out, &ids);
        0
    } else {
        einval
    }
}
