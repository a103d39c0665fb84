// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Core types shared across the wire protocol.

mod addr;

#[cfg(test)]
mod addr_test;

pub use addr::Paddr;
