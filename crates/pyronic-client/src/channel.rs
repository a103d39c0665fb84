// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Byte channel seam between the transport and the server.
//!
//! The transport only needs an ordered, reliable duplex stream whose reads
//! come up short only at end of stream. Production uses the server's Unix
//! socket; tests plug in scripted or simulated channels.

use std::io::{self, Read, Write};

/// A connected duplex byte stream.
pub trait Channel: Read + Write {
    /// Tear down the connection.
    ///
    /// The default just flushes pending output.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    fn close(&mut self) -> io::Result<()> {
        self.flush()
    }
}

#[cfg(unix)]
impl Channel for std::os::unix::net::UnixStream {
    fn close(&mut self) -> io::Result<()> {
        self.flush()?;
        self.shutdown(std::net::Shutdown::Both)
    }
}
