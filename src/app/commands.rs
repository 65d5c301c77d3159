//! Inbound operator commands.
//!
//! One received byte maps to one [`Command`].  The mapping is fixed: the
//! serial link carries no framing, so every byte stands alone.

/// A single operator command decoded from the serial link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `s` — raise both compare values.
    IncreaseDuty,
    /// `w` — lower both compare values.
    DecreaseDuty,
    /// `a` — lower compare0, raise compare1.
    ShiftLeft,
    /// `d` — raise compare0, lower compare1.
    ShiftRight,
    /// Any other byte; carried so the console can echo it.
    Unrecognized(u8),
}

impl Command {
    pub const fn from_byte(byte: u8) -> Self {
        match byte {
            b's' => Self::IncreaseDuty,
            b'w' => Self::DecreaseDuty,
            b'a' => Self::ShiftLeft,
            b'd' => Self::ShiftRight,
            other => Self::Unrecognized(other),
        }
    }

    pub const fn is_recognized(self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl From<u8> for Command {
    fn from(byte: u8) -> Self {
        Self::from_byte(byte)
    }
}
