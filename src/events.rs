//! Interrupt-driven key notification.
//!
//! The serial reader (UART RX thread on target, stdin thread on host)
//! produces bytes; the main loop consumes them one per poll.
//!
//! ```text
//! ┌─────────────┐  notify()   ┌──────────────┐ try_receive() ┌───────────┐
//! │ UART reader │────────────▶│  KeyChannel  │──────────────▶│ Main loop │
//! │  (producer) │             │  (1 slot)    │               │ (consumer)│
//! └─────────────┘             └──────────────┘               └───────────┘
//! ```
//!
//! The channel holds a single byte.  A byte arriving while another is still
//! pending is dropped, as is anything the reader sees while the main loop
//! sleeps between polls and the slot is occupied.  Commands are therefore
//! processed strictly in arrival order, one at a time, but fast typing can
//! lose keys.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use crate::app::ports::KeySource;

/// Capacity of the key slot.
const KEY_SLOT_DEPTH: usize = 1;

/// Single-slot byte channel between the serial reader and the main loop.
pub struct KeyChannel {
    inner: Channel<CriticalSectionRawMutex, u8, KEY_SLOT_DEPTH>,
}

/// Process-wide channel fed by the serial reader.
pub static KEY_CHANNEL: KeyChannel = KeyChannel::new();

impl KeyChannel {
    pub const fn new() -> Self {
        Self {
            inner: Channel::new(),
        }
    }

    /// Offer a byte from the producer side.
    /// Safe to call from ISR / reader-thread context (never blocks).
    /// Returns `false` if a byte is already pending (new byte dropped).
    pub fn notify(&self, byte: u8) -> bool {
        self.inner.try_send(byte).is_ok()
    }

    /// Take the pending byte, if any.
    pub fn try_receive(&self) -> Option<u8> {
        self.inner.try_receive().ok()
    }

    /// Whether a byte is waiting to be processed.
    pub fn is_pending(&self) -> bool {
        !self.inner.is_empty()
    }
}

impl Default for KeyChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl KeySource for &KeyChannel {
    fn try_receive(&mut self) -> Option<u8> {
        KeyChannel::try_receive(*self)
    }
}
