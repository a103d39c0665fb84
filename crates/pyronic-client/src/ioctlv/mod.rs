// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Typed ioctlv arguments.
//!
//! Each argument is either a scalar, which the client copies into a fresh
//! arena buffer, or an existing [`MemoryHandle`] passed through as is. The
//! compact format strings used by IOS tooling (`"i:d"`, `"qq"`, ...) are
//! parsed into the same representation by [`IoctlvArgs::parse`].


use crate::error::{ClientError, Result};
use crate::handle::MemoryHandle;
use pyronic_abi::ScalarWidth;

/// Format code for a pass-through buffer.
pub const BUFFER_CODE: char = 'd';

/// One ioctlv argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IoctlvArg {
    /// One byte.
    Scalar8(u8),
    /// Two bytes.
    Scalar16(u16),
    /// Four bytes.
    Scalar32(u32),
    /// Eight bytes.
    Scalar64(u64),
    /// Existing guest buffer.
    Buffer(MemoryHandle),
}

impl IoctlvArg {
    /// Build a scalar of the given width, truncating `value` to fit.
    #[must_use]
    pub const fn scalar(width: ScalarWidth, value: u64) -> Self {
        match width {
            ScalarWidth::Byte => Self::Scalar8(value as u8),
            ScalarWidth::Half => Self::Scalar16(value as u16),
            ScalarWidth::Word => Self::Scalar32(value as u32),
            ScalarWidth::Quad => Self::Scalar64(value),
        }
    }
}

impl From<MemoryHandle> for IoctlvArg {
    fn from(handle: MemoryHandle) -> Self {
        Self::Buffer(handle)
    }
}

/// An untyped positional argument for a format string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatArg {
    /// Integer for a scalar code. Negative values are passed two's complement.
    Int(u64),
    /// Buffer for a `d` code.
    Handle(MemoryHandle),
}

impl From<u64> for FormatArg {
    fn from(value: u64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for FormatArg {
    fn from(value: u32) -> Self {
        Self::Int(u64::from(value))
    }
}

impl From<i64> for FormatArg {
    fn from(value: i64) -> Self {
        Self::Int(value as u64)
    }
}

impl From<i32> for FormatArg {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value) as u64)
    }
}

impl From<MemoryHandle> for FormatArg {
    fn from(handle: MemoryHandle) -> Self {
        Self::Handle(handle)
    }
}

/// Input and output arguments of one ioctlv request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IoctlvArgs {
    /// Arguments read by IOS.
    pub inputs: Vec<IoctlvArg>,
    /// Arguments written by IOS.
    pub outputs: Vec<IoctlvArg>,
}

impl IoctlvArgs {
    /// Create an argument set.
    #[must_use]
    pub const fn new(inputs: Vec<IoctlvArg>, outputs: Vec<IoctlvArg>) -> Self {
        Self { inputs, outputs }
    }

    /// Parse a format string against positional arguments.
    ///
    /// The format is `inputs[:outputs]`; without a colon every argument is
    /// an input. Codes `b`, `h`, `i` and `q` take an integer, `d` takes a
    /// handle. Arguments are consumed left to right, inputs first.
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidFormatCode`] for any other character
    /// - [`ClientError::ArgumentCountMismatch`] if the format and argument
    ///   list differ in length
    /// - [`ClientError::ArgumentTypeMismatch`] if an integer meets `d` or a
    ///   handle meets a scalar code
    pub fn parse(format: &str, args: &[FormatArg]) -> Result<Self> {
        let (in_fmt, out_fmt) = format.split_once(':').unwrap_or((format, ""));

        let codes = || in_fmt.chars().chain(out_fmt.chars());
        if let Some(bad) = codes().find(|&c| !is_valid_code(c)) {
            return Err(ClientError::InvalidFormatCode(bad));
        }

        let expected = codes().count();
        if expected != args.len() {
            return Err(ClientError::ArgumentCountMismatch {
                expected,
                given: args.len(),
            });
        }

        let mut converted = codes()
            .zip(args)
            .enumerate()
            .map(|(position, (code, arg))| convert(position, code, *arg))
            .collect::<Result<Vec<_>>>()?;

        let outputs = converted.split_off(in_fmt.chars().count());
        Ok(Self::new(converted, outputs))
    }

    /// Total number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inputs.len() + self.outputs.len()
    }

    /// Returns true if there are no arguments at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty() && self.outputs.is_empty()
    }
}

fn is_valid_code(code: char) -> bool {
    code == BUFFER_CODE || ScalarWidth::from_code(code).is_some()
}

fn convert(position: usize, code: char, arg: FormatArg) -> Result<IoctlvArg> {
    match (ScalarWidth::from_code(code), arg) {
        (Some(width), FormatArg::Int(value)) => Ok(IoctlvArg::scalar(width, value)),
        (None, FormatArg::Handle(handle)) if code == BUFFER_CODE => Ok(IoctlvArg::Buffer(handle)),
        _ => Err(ClientError::ArgumentTypeMismatch { position, code }),
    }
}
