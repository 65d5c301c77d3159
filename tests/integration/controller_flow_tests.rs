//! Integration tests for the key → controller → peripheral pipeline.
//!
//! These run on the host (x86_64) and verify that a received byte flows
//! through decoding, the update rule and the clamp down to a single
//! publish call, with the matching console events.

use super::mock_hw::{MockPwm, RecordingSink};

use dualpwm::adapters::console_sink::ConsoleSink;
use dualpwm::adapters::sim_pwm::SimPwm;
use dualpwm::app::events::AppEvent;
use dualpwm::app::service::{AppService, ControllerState};
use dualpwm::config::SystemConfig;
use dualpwm::control::compare_pair::{ComparePair, PwmParams, UnrecognizedCommand};

fn make_app() -> (AppService, MockPwm, RecordingSink) {
    let pwm = MockPwm::new(1000, 500, 500);
    let app = AppService::from_peripheral(&SystemConfig::default(), &pwm);
    let mut sink = RecordingSink::new();
    app.start(&mut sink);
    (app, pwm, sink)
}

fn pair(compare0: u32, compare1: u32) -> ComparePair {
    ComparePair { compare0, compare1 }
}

#[test]
fn start_announces_initial_parameters() {
    let (app, pwm, sink) = make_app();
    assert_eq!(sink.events, vec![AppEvent::Started(PwmParams::new(1000, 500, 500))]);
    assert_eq!(app.state(), ControllerState::Idle);
    assert!(pwm.published.is_empty(), "start must not publish");
}

#[test]
fn recognized_key_publishes_exactly_once() {
    let (mut app, mut pwm, mut sink) = make_app();

    let result = app.handle_key(b'a', &mut pwm, &mut sink);

    assert_eq!(result, Ok(pair(400, 600)));
    assert_eq!(pwm.published, vec![pair(400, 600)]);
    assert_eq!(
        sink.events[1..],
        [
            AppEvent::KeyPressed(b'a'),
            AppEvent::Updated(PwmParams::new(1000, 400, 600)),
        ]
    );
}

#[test]
fn unrecognized_key_shows_usage_and_changes_nothing() {
    let (mut app, mut pwm, mut sink) = make_app();
    let before = app.params();

    let result = app.handle_key(b'?', &mut pwm, &mut sink);

    assert_eq!(result, Err(UnrecognizedCommand(b'?')));
    assert_eq!(app.params(), before);
    assert!(pwm.published.is_empty());
    assert_eq!(sink.usage_shown(), 2, "banner at start plus one reprint");
    assert_eq!(app.rejected_count(), 1);
    assert_eq!(app.update_count(), 0);
}

#[test]
fn shift_left_scenario_pins_both_rails() {
    let (mut app, mut pwm, mut sink) = make_app();

    app.handle_key(b'a', &mut pwm, &mut sink).unwrap();
    assert_eq!(app.params().pair(), pair(400, 600));

    let mut history = Vec::new();
    for _ in 0..5 {
        history.push(app.handle_key(b'a', &mut pwm, &mut sink).unwrap());
    }
    assert_eq!(
        history,
        vec![
            pair(300, 700),
            pair(200, 800),
            pair(100, 900),
            pair(0, 1000),
            pair(0, 1000),
        ]
    );

    let after = app.handle_key(b's', &mut pwm, &mut sink).unwrap();
    assert_eq!(after, pair(100, 1000));
    assert_eq!(pwm.last(), Some(pair(100, 1000)));
}

#[test]
fn saturated_compare0_stays_pinned_while_compare1_rises() {
    let mut pwm = MockPwm::new(1000, 1000, 700);
    let mut app = AppService::from_peripheral(&SystemConfig::default(), &pwm);
    let mut sink = RecordingSink::new();

    app.handle_key(b's', &mut pwm, &mut sink).unwrap();
    assert_eq!(app.params().pair(), pair(1000, 800));
    app.handle_key(b's', &mut pwm, &mut sink).unwrap();
    app.handle_key(b's', &mut pwm, &mut sink).unwrap();
    app.handle_key(b's', &mut pwm, &mut sink).unwrap();
    assert_eq!(app.params().pair(), pair(1000, 1000));
}

#[test]
fn saturation_still_publishes_and_reports() {
    let mut pwm = MockPwm::new(1000, 0, 0);
    let mut app = AppService::from_peripheral(&SystemConfig::default(), &pwm);
    let mut sink = RecordingSink::new();

    let result = app.handle_key(b'w', &mut pwm, &mut sink);

    assert_eq!(result, Ok(pair(0, 0)));
    assert_eq!(pwm.published, vec![pair(0, 0)]);
    assert!(matches!(sink.events.last(), Some(AppEvent::Updated(_))));
}

#[test]
fn published_pair_goes_live_together_on_sim_peripheral() {
    let mut pwm = SimPwm::new(1000, 500, 500);
    let mut app = AppService::from_peripheral(&SystemConfig::default(), &pwm);
    let mut sink = RecordingSink::new();

    app.handle_key(b'd', &mut pwm, &mut sink).unwrap();
    assert_eq!(pwm.active(), pair(500, 500), "no change before the boundary");
    assert_eq!(pwm.buffered(), pair(600, 400));

    pwm.cycle_boundary();
    assert_eq!(pwm.active(), pair(600, 400));
}

#[test]
fn console_transcript_for_one_session() {
    let mut pwm = SimPwm::new(1000, 500, 500);
    let mut app = AppService::from_peripheral(&SystemConfig::default(), &pwm);
    let mut console = ConsoleSink::new(String::new());

    app.start(&mut console);
    app.handle_key(b'w', &mut pwm, &mut console).unwrap();
    let _ = app.handle_key(b'z', &mut pwm, &mut console);

    let out = console.into_inner();
    assert!(out.contains("Pressed key: w\r\nPeriod: 1000\tCompare0: 400\tCompare1: 400\r\n"));
    assert!(out.contains("Pressed key: z\r\nWrong key pressed !! See below instructions:\r\n"));
    assert_eq!(out.matches("Instructions:").count(), 2);
}
