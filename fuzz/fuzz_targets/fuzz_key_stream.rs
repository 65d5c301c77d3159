//! Fuzz target: `AppService::handle_key`
//!
//! The first bytes pick the period, the starting compare values and the
//! step; the rest is fed in as operator keys.  After every key both
//! compare values must lie in `[0, period]`, the period must not change,
//! and only recognized keys may reach the peripheral.
//!
//! cargo fuzz run fuzz_key_stream

#![no_main]

use core::num::NonZeroU32;

use dualpwm::adapters::sim_pwm::SimPwm;
use dualpwm::app::commands::Command;
use dualpwm::app::events::AppEvent;
use dualpwm::app::ports::{EventSink, PwmPeripheral};
use dualpwm::app::service::AppService;
use libfuzzer_sys::fuzz_target;

struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: &AppEvent) {}
}

fn word(bytes: &[u8]) -> u32 {
    u32::from(u16::from_le_bytes([bytes[0], bytes[1]]))
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 8 {
        return;
    }
    let (head, keys) = data.split_at(8);
    let period = word(&head[0..2]);
    let step = NonZeroU32::new(word(&head[6..8])).unwrap_or(NonZeroU32::MIN);

    // Start values may exceed the period; construction must clamp them.
    let mut pwm = SimPwm::new(period, word(&head[2..4]), word(&head[4..6]));
    let mut app = AppService::with_step(step, pwm.initial_parameters());

    for &key in keys {
        let pending_before = pwm.swap_pending();
        let result = app.handle_key(key, &mut pwm, &mut NullSink);
        let p = app.params();

        assert_eq!(p.period(), period);
        assert!(p.compare0() <= period && p.compare1() <= period);
        assert_eq!(result.is_ok(), Command::from_byte(key).is_recognized());
        if result.is_err() {
            assert_eq!(pwm.swap_pending(), pending_before, "rejected key reached the peripheral");
        }
        pwm.cycle_boundary();
    }
});
