// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Tests for the guest physical address type.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::Paddr;

#[test]
fn null_is_zero() {
    assert_eq!(Paddr::null().as_u32(), 0);
    assert_eq!(Paddr::null(), Paddr::default());
}

#[test]
fn offsets_wrap_at_bus_width() {
    assert_eq!(Paddr::new(0xFFFF_FFF0).add(0x20).as_u32(), 0x10);
    assert_eq!(Paddr::new(0x0100_0040).diff(Paddr::new(0x0100_0000)), 0x40);
    assert_eq!(Paddr::new(0x10).diff(Paddr::new(0x20)), 0xFFFF_FFF0);
}

#[test]
fn alignment_needs_power_of_two() {
    assert_eq!(Paddr::new(0x1040).is_aligned(0x40), Some(true));
    assert_eq!(Paddr::new(0x1041).is_aligned(0x40), Some(false));
    assert_eq!(Paddr::new(0x1041).is_aligned(1), Some(true));
    assert_eq!(Paddr::new(0x1000).is_aligned(0), None);
    assert_eq!(Paddr::new(0x1000).is_aligned(0x30), None);
}

#[test]
fn formats_as_padded_hex() {
    assert_eq!(format!("{}", Paddr::new(0x0001_0000)), "0x00010000");
    assert_eq!(format!("{:?}", Paddr::new(0x201125b0)), "Paddr(0x201125b0)");
}
