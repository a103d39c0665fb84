// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Codec errors.

use core::fmt;

/// Errors produced while encoding or decoding wire structures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// More argument words were supplied than an IPC message can carry.
    TooManyArguments {
        /// Number of arguments supplied.
        given: usize,
        /// Maximum number of arguments.
        max: usize,
    },
    /// The input buffer is shorter than the fixed structure size.
    ShortBuffer {
        /// Number of bytes available.
        len: usize,
        /// Number of bytes required.
        needed: usize,
    },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooManyArguments { given, max } => {
                write!(f, "too many message arguments: {given} (max {max})")
            }
            Self::ShortBuffer { len, needed } => {
                write!(f, "buffer too short: {len} bytes, need {needed}")
            }
        }
    }
}

impl core::error::Error for CodecError {}
