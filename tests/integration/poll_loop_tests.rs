//! Poll-loop tests: key channel → `AppService::poll` → peripheral.
//!
//! Exercise the single-slot notification channel the way the firmware
//! uses it: a producer offers bytes, the loop takes at most one per poll.

use std::collections::VecDeque;
use std::io::Cursor;

use super::mock_hw::{CountingDelay, MockPwm, RecordingSink, ScriptedKeys};

use dualpwm::adapters::uart;
use dualpwm::app::service::{self, AppService};
use dualpwm::config::SystemConfig;
use dualpwm::control::compare_pair::ComparePair;
use dualpwm::events::KeyChannel;

fn make_app(pwm: &MockPwm) -> AppService {
    AppService::from_peripheral(&SystemConfig::default(), pwm)
}

#[test]
fn poll_without_pending_key_does_nothing() {
    let ch = KeyChannel::new();
    let mut pwm = MockPwm::new(1000, 500, 500);
    let mut app = make_app(&pwm);
    let mut sink = RecordingSink::new();

    assert!(!app.poll(&mut &ch, &mut pwm, &mut sink));
    assert!(sink.events.is_empty());
    assert!(pwm.published.is_empty());
}

#[test]
fn one_key_per_poll_in_arrival_order() {
    let ch = KeyChannel::new();
    let mut pwm = MockPwm::new(1000, 500, 500);
    let mut app = make_app(&pwm);
    let mut sink = RecordingSink::new();

    for key in [b's', b'd', b'w'] {
        assert!(ch.notify(key));
        assert!(app.poll(&mut &ch, &mut pwm, &mut sink));
    }

    assert_eq!(
        pwm.published,
        vec![
            ComparePair { compare0: 600, compare1: 600 },
            ComparePair { compare0: 700, compare1: 500 },
            ComparePair { compare0: 600, compare1: 400 },
        ]
    );
}

#[test]
fn burst_between_polls_keeps_only_first_key() {
    let ch = KeyChannel::new();
    let mut pwm = MockPwm::new(1000, 500, 500);
    let mut app = make_app(&pwm);
    let mut sink = RecordingSink::new();

    let stats = uart::pump_keys(&mut Cursor::new(b"ssss".to_vec()), &ch);
    assert_eq!(stats.forwarded, 1);
    assert_eq!(stats.dropped, 3);

    assert!(app.poll(&mut &ch, &mut pwm, &mut sink));
    assert!(!app.poll(&mut &ch, &mut pwm, &mut sink));
    assert_eq!(app.update_count(), 1);
    assert_eq!(app.params().compare0(), 600);
}

#[test]
fn run_for_sleeps_after_every_poll() {
    let mut keys = ScriptedKeys(VecDeque::from(vec![Some(b'a'), None, Some(b'x'), None]));
    let mut pwm = MockPwm::new(1000, 500, 500);
    let mut app = make_app(&pwm);
    let mut sink = RecordingSink::new();
    let mut delay = CountingDelay::default();

    let processed = service::run_for(&mut app, 4, 100, &mut keys, &mut pwm, &mut sink, &mut delay);

    assert_eq!(processed, 2);
    assert_eq!(delay.total_ns, 4 * 100_000_000);
    assert_eq!(pwm.published.len(), 1, "only 'a' is a command");
    assert_eq!(app.rejected_count(), 1);
}

#[test]
fn scripted_session_ends_at_expected_pair() {
    let mut keys = ScriptedKeys::from_bytes(b"aaaaaas");
    let mut pwm = MockPwm::new(1000, 500, 500);
    let mut app = make_app(&pwm);
    let mut sink = RecordingSink::new();
    let mut delay = CountingDelay::default();

    service::run_for(&mut app, 10, 100, &mut keys, &mut pwm, &mut sink, &mut delay);

    assert_eq!(pwm.last(), Some(ComparePair { compare0: 100, compare1: 1000 }));
}
