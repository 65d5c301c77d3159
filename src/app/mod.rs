//! Application core — pure domain logic, zero I/O.
//!
//! Holds the compare-pair controller and the service that drives it.  All
//! interaction with the PWM peripheral, the serial link and the console
//! happens through **port traits** defined in [`ports`], keeping this
//! layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
