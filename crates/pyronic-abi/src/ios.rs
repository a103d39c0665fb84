// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Known IOS result codes and ES ioctlv numbers.
//!
//! Result codes are surfaced to callers verbatim as signed integers. The
//! types here only classify them for display and matching.

use core::fmt;

/// Result codes returned by IOS modules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum IosError {
    /// FS: invalid argument.
    FsInvalid = -4,
    /// FS: access denied.
    FsAccess = -102,
    /// FS: no such file or device.
    FsNotFound = -106,
    /// ES: invalid argument.
    EsInvalid = -1017,
}

impl IosError {
    /// Classify a raw result code.
    ///
    /// Returns `None` for success codes and for errors not listed here.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            -4 => Some(Self::FsInvalid),
            -102 => Some(Self::FsAccess),
            -106 => Some(Self::FsNotFound),
            -1017 => Some(Self::EsInvalid),
            _ => None,
        }
    }

    /// Get the raw result code.
    #[inline]
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for IosError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FsInvalid => write!(f, "FS_EINVAL ({})", self.code()),
            Self::FsAccess => write!(f, "FS_EACCESS ({})", self.code()),
            Self::FsNotFound => write!(f, "FS_ENOENT ({})", self.code()),
            Self::EsInvalid => write!(f, "ES_EINVAL ({})", self.code()),
        }
    }
}

/// Ioctlv numbers understood by the ES module (`/dev/es`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum EsIoctlv {
    /// Import a ticket.
    AddTicket = 0x01,
    /// Launch a title by ID.
    LaunchTitle = 0x08,
    /// Count installed titles.
    GetTitlesCount = 0x0e,
    /// List installed title IDs.
    GetTitles = 0x0f,
    /// Launch the boot-compatibility title.
    LaunchBc = 0x25,
}

impl EsIoctlv {
    /// Get the raw ioctlv number.
    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self as u32
    }
}
