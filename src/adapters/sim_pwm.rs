//! Simulated dual-compare PWM peripheral.
//!
//! Models the register layout of a timer with buffered compare channels:
//! each compare has an *active* register the counter is compared against
//! and a *buffer* register software writes.  A publish fills both buffers
//! and arms a swap; the swap happens only at [`SimPwm::cycle_boundary`],
//! which copies both buffers into the active registers in one step.
//!
//! Used by host tests and the host simulation; the firmware uses the
//! MCPWM adapter instead.

use log::debug;

use crate::app::ports::PwmPeripheral;
use crate::control::compare_pair::{ComparePair, PwmParams};

/// In-memory timer with two buffered compare channels.
#[derive(Debug, Clone)]
pub struct SimPwm {
    period: u32,
    active: ComparePair,
    buffered: ComparePair,
    swap_pending: bool,
    swaps: u32,
}

impl SimPwm {
    pub fn new(period: u32, compare0: u32, compare1: u32) -> Self {
        let pair = ComparePair { compare0, compare1 };
        Self {
            period,
            active: pair,
            buffered: pair,
            swap_pending: false,
            swaps: 0,
        }
    }

    /// Counter wrapped: apply the buffered pair if a swap is armed.
    /// Returns `true` if the active pair changed.
    pub fn cycle_boundary(&mut self) -> bool {
        if !self.swap_pending {
            return false;
        }
        self.active = self.buffered;
        self.swap_pending = false;
        self.swaps += 1;
        debug!(
            "sim_pwm: swap #{} -> ({}, {})",
            self.swaps, self.active.compare0, self.active.compare1
        );
        true
    }

    /// Values the counter is compared against right now.
    pub fn active(&self) -> ComparePair {
        self.active
    }

    /// Values that become active at the next boundary.
    pub fn buffered(&self) -> ComparePair {
        self.buffered
    }

    pub fn swap_pending(&self) -> bool {
        self.swap_pending
    }

    /// Completed swaps since construction.
    pub fn swap_count(&self) -> u32 {
        self.swaps
    }

    /// Output level at counter position `count` of an up-down cycle.
    ///
    /// The output is high while counting up below compare0 and while
    /// counting down below compare1, so the pulse is centred on the
    /// counter's zero and its two edges move independently.
    pub fn output_high(&self, count: u32, counting_up: bool) -> bool {
        if counting_up {
            count < self.active.compare0
        } else {
            count < self.active.compare1
        }
    }

    /// Active ticks per full up-down cycle (`compare0 + compare1`).
    pub fn high_ticks(&self) -> u64 {
        u64::from(self.active.compare0) + u64::from(self.active.compare1)
    }
}

impl PwmPeripheral for SimPwm {
    fn initial_parameters(&self) -> PwmParams {
        PwmParams::new(self.period, self.active.compare0, self.active.compare1)
    }

    fn publish_compare_pair(&mut self, pair: ComparePair) {
        self.buffered = pair;
        self.swap_pending = true;
    }
}
