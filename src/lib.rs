//! Dual-compare asymmetric PWM controller library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod events;

// Adapters compile on every target; the hardware-backed parts are gated
// inside each module.
pub mod adapters;

// Host test builds link the std critical-section implementation that
// embassy-sync's `CriticalSectionRawMutex` needs.
#[cfg(test)]
use critical_section as _;
