//! Mock hardware adapters for integration tests.
//!
//! Records every publish, console event and delay so tests can assert on
//! the full history without touching real timer registers.

use dualpwm::app::events::AppEvent;
use dualpwm::app::ports::{EventSink, KeySource, PwmPeripheral};
use dualpwm::control::compare_pair::{ComparePair, PwmParams};
use embedded_hal::delay::DelayNs;
use std::collections::VecDeque;

// ── MockPwm ───────────────────────────────────────────────────

pub struct MockPwm {
    pub initial: PwmParams,
    pub published: Vec<ComparePair>,
}

#[allow(dead_code)]
impl MockPwm {
    pub fn new(period: u32, compare0: u32, compare1: u32) -> Self {
        Self {
            initial: PwmParams::new(period, compare0, compare1),
            published: Vec::new(),
        }
    }

    pub fn last(&self) -> Option<ComparePair> {
        self.published.last().copied()
    }
}

impl PwmPeripheral for MockPwm {
    fn initial_parameters(&self) -> PwmParams {
        self.initial
    }

    fn publish_compare_pair(&mut self, pair: ComparePair) {
        self.published.push(pair);
    }
}

// ── RecordingSink ─────────────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn usage_shown(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::Started(_) | AppEvent::Unrecognized(_)))
            .count()
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}

// ── ScriptedKeys ──────────────────────────────────────────────

/// Key source that yields one scripted byte per poll, with `None` gaps
/// where the script has them.
pub struct ScriptedKeys(pub VecDeque<Option<u8>>);

#[allow(dead_code)]
impl ScriptedKeys {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(bytes.iter().map(|&b| Some(b)).collect())
    }
}

impl KeySource for ScriptedKeys {
    fn try_receive(&mut self) -> Option<u8> {
        self.0.pop_front().flatten()
    }
}

// ── CountingDelay ─────────────────────────────────────────────

#[derive(Default)]
pub struct CountingDelay {
    pub total_ns: u64,
    pub calls: u32,
}

impl DelayNs for CountingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
        self.calls += 1;
    }
}
