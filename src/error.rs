//! Unified error types for the dual-compare PWM firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! start-up path's error handling uniform.  All variants are `Copy`.
//!
//! The controller itself has exactly one error,
//! [`UnrecognizedCommand`](crate::control::compare_pair::UnrecognizedCommand),
//! which is handled locally and never reaches this type.

use core::fmt;

use crate::config::ConfigError;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible start-up operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A peripheral driver call failed.
    Peripheral(PeripheralError),
    /// Configuration is invalid.
    Config(ConfigError),
    /// A firmware task failed to start or stopped unexpectedly.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Peripheral(e) => write!(f, "peripheral: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Peripheral errors
// ---------------------------------------------------------------------------

/// A driver call returned a non-OK status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeripheralError {
    /// MCPWM set-up failed at the named step.
    Mcpwm { step: &'static str, rc: i32 },
    /// UART driver install failed.
    Uart(i32),
}

impl fmt::Display for PeripheralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mcpwm { step, rc } => write!(f, "MCPWM {step} failed (rc={rc})"),
            Self::Uart(rc) => write!(f, "UART driver install failed (rc={rc})"),
        }
    }
}

impl From<PeripheralError> for Error {
    fn from(e: PeripheralError) -> Self {
        Self::Peripheral(e)
    }
}
