//! System configuration parameters
//!
//! All tunable parameters for the dual-compare PWM controller.
//! Nothing is persisted: the firmware boots with [`SystemConfig::default()`]
//! and validates it before touching hardware.

use core::fmt;
use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Controller ---
    /// Compare-value delta applied per key press (timer ticks)
    pub compare_step: u32,
    /// Delay between key polls (milliseconds)
    pub poll_interval_ms: u32,

    // --- Serial ---
    /// UART RX ring buffer size handed to the driver (bytes)
    pub uart_rx_buffer: u16,

    // --- PWM hardware ---
    pub pwm: PwmHwConfig,
}

/// Timer and output settings for the dual-compare PWM peripheral.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PwmHwConfig {
    /// Output GPIO driven by the generator
    pub gpio: i32,
    /// Timer tick rate (Hz)
    pub resolution_hz: u32,
    /// Full up-down cycle length in ticks; the counter peaks at half of it
    pub period_ticks: u32,
    /// Compare0 at start-up (ticks, `<= period_ticks / 2`)
    pub initial_compare0: u32,
    /// Compare1 at start-up (ticks, `<= period_ticks / 2`)
    pub initial_compare1: u32,
}

/// Largest counter peak a staged compare pair can carry (15 bits per value).
pub const MAX_PEAK: u32 = 0x7FFF;

impl PwmHwConfig {
    /// Counter peak in up-down mode; this is the controller's `period`.
    pub fn peak(&self) -> u32 {
        self.period_ticks / 2
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Controller
            compare_step: 100,
            poll_interval_ms: 100, // 10 Hz

            // Serial
            uart_rx_buffer: 256,

            // PWM: 1 MHz ticks, 2000-tick up-down cycle = 500 Hz, peak 1000
            pwm: PwmHwConfig {
                gpio: 4,
                resolution_hz: 1_000_000,
                period_ticks: 2000,
                initial_compare0: 500,
                initial_compare1: 500,
            },
        }
    }
}

/// Reason a [`SystemConfig`] was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl SystemConfig {
    /// Range-check every field.  Invalid values are rejected, not clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.compare_step == 0 {
            return Err(ConfigError::ValidationFailed("compare_step must be > 0"));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("poll_interval_ms must be > 0"));
        }
        // The UART driver refuses rx buffers no larger than the hardware FIFO.
        if self.uart_rx_buffer <= 128 {
            return Err(ConfigError::ValidationFailed("uart_rx_buffer must be > 128"));
        }
        if self.pwm.resolution_hz == 0 {
            return Err(ConfigError::ValidationFailed("pwm.resolution_hz must be > 0"));
        }
        if self.pwm.period_ticks < 2 || self.pwm.period_ticks % 2 != 0 {
            return Err(ConfigError::ValidationFailed(
                "pwm.period_ticks must be even and >= 2",
            ));
        }
        if self.pwm.peak() > MAX_PEAK {
            return Err(ConfigError::ValidationFailed(
                "pwm.period_ticks must be <= 65534",
            ));
        }
        if self.pwm.initial_compare0 > self.pwm.peak() {
            return Err(ConfigError::ValidationFailed(
                "pwm.initial_compare0 exceeds counter peak",
            ));
        }
        if self.pwm.initial_compare1 > self.pwm.peak() {
            return Err(ConfigError::ValidationFailed(
                "pwm.initial_compare1 exceeds counter peak",
            ));
        }
        Ok(())
    }

    /// Step as the controller consumes it.  Zero is rejected by
    /// [`validate`](Self::validate); an unvalidated zero falls back to 1.
    pub fn step(&self) -> NonZeroU32 {
        NonZeroU32::new(self.compare_step).unwrap_or(NonZeroU32::MIN)
    }
}
