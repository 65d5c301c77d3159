//! `core::fmt::Write` over the process stdout.
//!
//! On ESP-IDF stdout is the UART0 console (VFS), so this is the serial
//! terminal the operator types into.  On host it is the terminal running
//! the simulation.

use core::fmt;
use std::io::Write as _;

/// Unbuffered console writer; flushes after every write so partial lines
/// (the key echo) appear immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutConsole;

impl StdoutConsole {
    pub fn new() -> Self {
        Self
    }
}

impl fmt::Write for StdoutConsole {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut out = std::io::stdout().lock();
        out.write_all(s.as_bytes()).map_err(|_| fmt::Error)?;
        out.flush().map_err(|_| fmt::Error)
    }
}
