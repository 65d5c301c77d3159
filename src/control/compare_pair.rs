//! Dual-compare update rule.
//!
//! Each command moves both compare values by `±step`.  Moving them in the
//! same direction widens or narrows the active pulse (duty cycle); moving
//! them in opposite directions slides the pulse inside the period (phase).
//!
//! | Command        | Δcompare0 | Δcompare1 |
//! |----------------|-----------|-----------|
//! | `IncreaseDuty` | +step     | +step     |
//! | `DecreaseDuty` | −step     | −step     |
//! | `ShiftLeft`    | −step     | +step     |
//! | `ShiftRight`   | +step     | −step     |
//!
//! Both fields are clamped to `[0, period]` independently, so one value can
//! stay pinned at a rail while the other keeps moving.

use core::fmt;
use core::num::NonZeroU32;

use log::warn;

use crate::app::commands::Command;

/// The two compare values handed to the peripheral as one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComparePair {
    pub compare0: u32,
    pub compare1: u32,
}

/// Counter period plus the current compare pair.
///
/// Always satisfies `compare0 <= period` and `compare1 <= period`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PwmParams {
    period: u32,
    compare0: u32,
    compare1: u32,
}

/// Returned by [`PwmParams::apply`] for a byte that maps to no command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnrecognizedCommand(pub u8);

impl fmt::Display for UnrecognizedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized command byte 0x{:02x}", self.0)
    }
}

impl PwmParams {
    /// Build parameters, clamping both compare values into `[0, period]`.
    pub fn new(period: u32, compare0: u32, compare1: u32) -> Self {
        if compare0 > period || compare1 > period {
            warn!(
                "compare values ({}, {}) exceed period {}, clamped",
                compare0, compare1, period
            );
        }
        Self {
            period,
            compare0: compare0.min(period),
            compare1: compare1.min(period),
        }
    }

    pub fn period(&self) -> u32 {
        self.period
    }

    pub fn compare0(&self) -> u32 {
        self.compare0
    }

    pub fn compare1(&self) -> u32 {
        self.compare1
    }

    pub fn pair(&self) -> ComparePair {
        ComparePair {
            compare0: self.compare0,
            compare1: self.compare1,
        }
    }

    /// Apply one command with the given step and return the new pair.
    ///
    /// `Unrecognized` leaves `self` untouched.
    pub fn apply(
        &mut self,
        command: Command,
        step: NonZeroU32,
    ) -> Result<ComparePair, UnrecognizedCommand> {
        let (sign0, sign1) = match command {
            Command::IncreaseDuty => (1, 1),
            Command::DecreaseDuty => (-1, -1),
            Command::ShiftLeft => (-1, 1),
            Command::ShiftRight => (1, -1),
            Command::Unrecognized(byte) => return Err(UnrecognizedCommand(byte)),
        };

        let step = i64::from(step.get());
        self.compare0 = clamp_to_period(self.compare0, sign0 * step, self.period);
        self.compare1 = clamp_to_period(self.compare1, sign1 * step, self.period);
        Ok(self.pair())
    }
}

/// `value + delta`, saturated to `[0, period]`.  Computed in `i64` so no
/// intermediate result can wrap.
fn clamp_to_period(value: u32, delta: i64, period: u32) -> u32 {
    (i64::from(value) + delta).clamp(0, i64::from(period)) as u32
}
