//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  The console adapter turns
//! them into terminal text; other sinks may only log them.

use crate::control::compare_pair::PwmParams;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// The service has started; carries the parameters read from hardware.
    Started(PwmParams),

    /// A byte arrived from the operator.
    KeyPressed(u8),

    /// A recognized command was applied and the pair was published.
    Updated(PwmParams),

    /// The byte mapped to no command; usage should be shown again.
    Unrecognized(u8),
}
