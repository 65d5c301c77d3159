//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the compare-pair parameters and applies one operator
//! command per poll.  All I/O flows through port traits injected at call
//! sites, making the entire service testable with mock adapters.
//!
//! ```text
//!    KeySource ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                  │       AppService        │
//! PwmPeripheral ◀──│  decode · apply · clamp │
//!                  └────────────────────────┘
//! ```

use core::num::NonZeroU32;

use embedded_hal::delay::DelayNs;
use log::{debug, info};

use crate::config::SystemConfig;
use crate::control::compare_pair::{ComparePair, PwmParams, UnrecognizedCommand};

use super::commands::Command;
use super::events::AppEvent;
use super::ports::{EventSink, KeySource, PwmPeripheral};

/// Controller state around one processed key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// Waiting for the next key.
    Idle,
    /// Applying rule, clamp and publish for the current key.
    Updating,
}

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    params: PwmParams,
    step: NonZeroU32,
    state: ControllerState,
    updates: u32,
    rejected: u32,
}

impl AppService {
    /// Construct the service from configuration and the parameters read
    /// from the peripheral.
    ///
    /// Does **not** announce itself — call [`start`](Self::start) next.
    pub fn new(config: &SystemConfig, initial: PwmParams) -> Self {
        Self::with_step(config.step(), initial)
    }

    /// Construct with an explicit step, bypassing [`SystemConfig`].
    pub fn with_step(step: NonZeroU32, initial: PwmParams) -> Self {
        Self {
            params: initial,
            step,
            state: ControllerState::Idle,
            updates: 0,
            rejected: 0,
        }
    }

    /// Read the initial parameters from `pwm` and build the service.
    pub fn from_peripheral(config: &SystemConfig, pwm: &impl PwmPeripheral) -> Self {
        Self::new(config, pwm.initial_parameters())
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Announce start-up; the console prints the banner and instructions.
    pub fn start(&self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started(self.params));
        info!(
            "AppService started: period={} compare0={} compare1={} step={}",
            self.params.period(),
            self.params.compare0(),
            self.params.compare1(),
            self.step
        );
    }

    // ── Command handling ──────────────────────────────────────

    /// Apply one command to the current parameters.
    ///
    /// Pure state update: nothing is published and nothing is emitted.
    pub fn apply(&mut self, command: Command) -> Result<ComparePair, UnrecognizedCommand> {
        self.params.apply(command, self.step)
    }

    /// Process one key byte end to end.
    ///
    /// Recognized keys update the pair, publish it to the peripheral and
    /// report the new values.  Unrecognized keys change nothing and ask the
    /// sink to show usage again.
    pub fn handle_key(
        &mut self,
        key: u8,
        pwm: &mut impl PwmPeripheral,
        sink: &mut impl EventSink,
    ) -> Result<ComparePair, UnrecognizedCommand> {
        self.transition(ControllerState::Updating);
        sink.emit(&AppEvent::KeyPressed(key));

        let result = self.apply(Command::from_byte(key));
        match result {
            Ok(pair) => {
                self.updates = self.updates.wrapping_add(1);
                sink.emit(&AppEvent::Updated(self.params));
                pwm.publish_compare_pair(pair);
            }
            Err(e) => {
                self.rejected = self.rejected.wrapping_add(1);
                debug!("{}", e);
                sink.emit(&AppEvent::Unrecognized(key));
            }
        }

        self.transition(ControllerState::Idle);
        result
    }

    /// Non-blocking poll: process at most one pending key.
    /// Returns `true` if a key was taken from `keys`.
    pub fn poll(
        &mut self,
        keys: &mut impl KeySource,
        pwm: &mut impl PwmPeripheral,
        sink: &mut impl EventSink,
    ) -> bool {
        match keys.try_receive() {
            Some(key) => {
                let _ = self.handle_key(key, pwm, sink);
                true
            }
            None => false,
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn params(&self) -> PwmParams {
        self.params
    }

    pub fn step(&self) -> NonZeroU32 {
        self.step
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Recognized commands applied since start-up.
    pub fn update_count(&self) -> u32 {
        self.updates
    }

    /// Unrecognized keys seen since start-up.
    pub fn rejected_count(&self) -> u32 {
        self.rejected
    }

    // ── Internal ──────────────────────────────────────────────

    fn transition(&mut self, to: ControllerState) {
        debug!("Controller {:?} -> {:?}", self.state, to);
        self.state = to;
    }
}

/// Poll loop body shared by the firmware and host simulations:
/// poll once, then sleep `interval_ms`.  Runs `iterations` times.
///
/// Returns how many keys were processed.
pub fn run_for(
    app: &mut AppService,
    iterations: u32,
    interval_ms: u32,
    keys: &mut impl KeySource,
    pwm: &mut impl PwmPeripheral,
    sink: &mut impl EventSink,
    delay: &mut impl DelayNs,
) -> u32 {
    let mut processed = 0;
    for _ in 0..iterations {
        if app.poll(keys, pwm, sink) {
            processed += 1;
        }
        delay.delay_ms(interval_ms);
    }
    processed
}
