//! Serial reader — feeds operator keys into the [`KeyChannel`].
//!
//! Runs in a dedicated thread that blocks on the byte source and forwards
//! every byte with a non-blocking [`KeyChannel::notify`].  The main loop
//! never waits on the UART.
//!
//! - **`target_os = "espidf"`** — [`ConsoleUart`] reads UART0 through the
//!   ESP-IDF UART driver (RX interrupt fills the driver's ring buffer).
//! - **`not(target_os = "espidf")`** — any [`std::io::Read`] (stdin for a
//!   host run, a `Cursor` in tests).

use std::io::{self, Read};
use std::thread::{self, JoinHandle};

use log::{debug, info, warn};

use crate::events::KeyChannel;

/// Stack for the reader thread (bytes).
const READER_STACK: usize = 4096;

/// Bytes read per driver call.
const READ_CHUNK: usize = 16;

/// Back-to-back read failures after which the reader gives up.
pub const MAX_CONSECUTIVE_READ_ERRORS: u32 = 8;

/// Totals reported when the reader stops.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReaderStats {
    /// Bytes accepted into the channel.
    pub forwarded: u32,
    /// Bytes dropped because a key was still pending.
    pub dropped: u32,
    /// Failed reads, retried ones included.
    pub read_errors: u32,
}

/// Forward bytes from `source` to `channel` until EOF.
///
/// A failed read is retried; after [`MAX_CONSECUTIVE_READ_ERRORS`] failures
/// in a row the source is treated as dead and the function returns.
pub fn pump_keys(source: &mut impl Read, channel: &KeyChannel) -> ReaderStats {
    let mut stats = ReaderStats::default();
    let mut buf = [0u8; READ_CHUNK];
    let mut consecutive_errors = 0;
    loop {
        let n = match source.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                stats.read_errors += 1;
                consecutive_errors += 1;
                if consecutive_errors >= MAX_CONSECUTIVE_READ_ERRORS {
                    warn!(
                        "uart: read failed ({}), giving up after {} attempts",
                        e, consecutive_errors
                    );
                    break;
                }
                warn!("uart: read failed ({}), retrying", e);
                continue;
            }
        };
        consecutive_errors = 0;
        for &byte in &buf[..n] {
            if channel.notify(byte) {
                stats.forwarded += 1;
            } else {
                stats.dropped += 1;
                debug!("uart: key 0x{:02x} dropped, previous key still pending", byte);
            }
        }
    }
    stats
}

/// Spawn the reader thread over `source`.
pub fn spawn_reader<R>(mut source: R, channel: &'static KeyChannel) -> io::Result<JoinHandle<ReaderStats>>
where
    R: Read + Send + 'static,
{
    let handle = thread::Builder::new()
        .name("uart-rx".into())
        .stack_size(READER_STACK)
        .spawn(move || {
            let stats = pump_keys(&mut source, channel);
            info!(
                "uart: reader finished ({} forwarded, {} dropped, {} read errors)",
                stats.forwarded, stats.dropped, stats.read_errors
            );
            stats
        })?;
    info!("uart: reader thread started");
    Ok(handle)
}

// ── ESP-IDF console UART ──────────────────────────────────────

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use crate::error::PeripheralError;

/// Console UART port number.
#[cfg(target_os = "espidf")]
const CONSOLE_UART: uart_port_t = 0;

/// Blocking byte source over the console UART RX ring buffer.
#[cfg(target_os = "espidf")]
pub struct ConsoleUart {
    _private: (),
}

#[cfg(target_os = "espidf")]
impl ConsoleUart {
    /// Install the UART driver on the console port.  Call once at boot.
    pub fn install(rx_buffer: u16) -> Result<Self, PeripheralError> {
        // SAFETY: Called once from main() before the reader thread exists.
        let ret = unsafe {
            uart_driver_install(
                CONSOLE_UART,
                i32::from(rx_buffer),
                0,
                0,
                core::ptr::null_mut(),
                0,
            )
        };
        if ret != ESP_OK as i32 {
            return Err(PeripheralError::Uart(ret));
        }
        info!("uart: console driver installed (rx_buffer={})", rx_buffer);
        Ok(Self { _private: () })
    }
}

#[cfg(target_os = "espidf")]
impl Read for ConsoleUart {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        // Wait for at least one byte, then return whatever is buffered.
        loop {
            // SAFETY: driver installed in `install()`; buf is a valid
            // writable region of buf.len() bytes.
            let n = unsafe {
                uart_read_bytes(
                    CONSOLE_UART,
                    buf.as_mut_ptr().cast(),
                    buf.len() as u32,
                    esp_idf_hal::delay::BLOCK,
                )
            };
            if n < 0 {
                return Err(io::Error::other("uart_read_bytes failed"));
            }
            if n > 0 {
                return Ok(n as usize);
            }
        }
    }
}
