// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Sparse guest physical memory.
//!
//! The whole 32-bit space is addressable. Pages are created on first write
//! and unwritten bytes read as zero.

use pyronic_abi::Paddr;
use std::collections::BTreeMap;

const PAGE_SIZE: u32 = 0x1000;

/// Sparse byte-addressable guest memory.
#[derive(Debug, Default, Clone)]
pub struct GuestMemory {
    pages: BTreeMap<u32, Box<[u8]>>,
}

impl GuestMemory {
    /// Create empty memory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pages that have been written.
    #[must_use]
    pub fn resident_pages(&self) -> usize {
        self.pages.len()
    }

    /// Read `len` bytes starting at `addr`. Wraps at the end of the space.
    #[must_use]
    pub fn read(&self, addr: Paddr, len: usize) -> Vec<u8> {
        let mut out = Vec::with_capacity(len);
        let mut cursor = addr.as_u32();
        while out.len() < len {
            let (page, offset) = split(cursor);
            let chunk = (PAGE_SIZE - offset).min(u32::try_from(len - out.len()).unwrap_or(u32::MAX));
            match self.pages.get(&page) {
                Some(bytes) => {
                    out.extend_from_slice(&bytes[offset as usize..(offset + chunk) as usize]);
                }
                None => out.resize(out.len() + chunk as usize, 0),
            }
            cursor = cursor.wrapping_add(chunk);
        }
        out
    }

    /// Write `data` starting at `addr`. Wraps at the end of the space.
    pub fn write(&mut self, addr: Paddr, data: &[u8]) {
        let mut cursor = addr.as_u32();
        let mut rest = data;
        while !rest.is_empty() {
            let (page, offset) = split(cursor);
            let chunk = ((PAGE_SIZE - offset) as usize).min(rest.len());
            let bytes = self
                .pages
                .entry(page)
                .or_insert_with(|| vec![0u8; PAGE_SIZE as usize].into_boxed_slice());
            bytes[offset as usize..offset as usize + chunk].copy_from_slice(&rest[..chunk]);
            rest = &rest[chunk..];
            cursor = cursor.wrapping_add(chunk as u32);
        }
    }

    /// Read a big-endian word.
    #[must_use]
    pub fn read_u32(&self, addr: Paddr) -> u32 {
        let bytes = self.read(addr, 4);
        u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    /// Write a big-endian word.
    pub fn write_u32(&mut self, addr: Paddr, value: u32) {
        self.write(addr, &value.to_be_bytes());
    }

    /// Read a NUL-terminated string of at most `max` bytes.
    #[must_use]
    pub fn read_cstr(&self, addr: Paddr, max: usize) -> String {
        let bytes = self.read(addr, max);
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        String::from_utf8_lossy(&bytes[..end]).into_owned()
    }
}

const fn split(addr: u32) -> (u32, u32) {
    (addr & !(PAGE_SIZE - 1), addr & (PAGE_SIZE - 1))
}
