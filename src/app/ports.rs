//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (PWM peripheral, key source, event sinks) implement these
//! traits.  The [`AppService`](super::service::AppService) consumes them via
//! generics, so the domain core never touches hardware directly.

use crate::control::compare_pair::{ComparePair, PwmParams};

// ───────────────────────────────────────────────────────────────
// PWM peripheral port (driven adapter: domain ↔ timer hardware)
// ───────────────────────────────────────────────────────────────

/// The dual-compare timer the controller steers.
pub trait PwmPeripheral {
    /// Period and compare values as configured at start-up.
    /// Queried once, before the first command is processed.
    fn initial_parameters(&self) -> PwmParams;

    /// Stage both compare values and commit them as one unit.
    ///
    /// Implementations MUST make both values active at the same cycle
    /// boundary (the next one after this call), never one before the other
    /// and never in the middle of a cycle.
    fn publish_compare_pair(&mut self, pair: ComparePair);
}

// ───────────────────────────────────────────────────────────────
// Key source port (driving adapter: serial link → domain)
// ───────────────────────────────────────────────────────────────

/// Non-blocking source of operator key bytes.
pub trait KeySource {
    /// Take the pending byte, if any.  Never blocks.
    fn try_receive(&mut self) -> Option<u8>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → console / logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
