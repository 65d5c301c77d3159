//! Dual-Compare PWM Firmware — Main Entry Point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  McpwmAdapter      ConsoleSink       ConsoleUart + reader      │
//! │  (PwmPeripheral)   (EventSink)       (KeyChannel producer)     │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  decode key · apply rule · clamp · publish             │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use log::{error, info, warn};

use dualpwm::adapters::console_sink::ConsoleSink;
use dualpwm::adapters::mcpwm::McpwmAdapter;
use dualpwm::adapters::stdout_console::StdoutConsole;
use dualpwm::adapters::uart::{self, ConsoleUart};
use dualpwm::app::service::{self, AppService};
use dualpwm::config::SystemConfig;
use dualpwm::error::Error;
use dualpwm::events::KEY_CHANNEL;

/// Poll iterations between liveness checks of the UART reader.
const READER_CHECK_POLLS: u32 = 10;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  DualPWM v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Config ─────────────────────────────────────────────
    let config = SystemConfig::default();
    config.validate().map_err(Error::from)?;
    match serde_json::to_string(&config) {
        Ok(json) => info!("Config: {}", json),
        Err(e) => warn!("Config not printable: {}", e),
    }

    // ── 3. PWM peripheral ─────────────────────────────────────
    let mut pwm = McpwmAdapter::new(&config.pwm).map_err(Error::from)?;

    // ── 4. App service ────────────────────────────────────────
    let mut console = ConsoleSink::new(StdoutConsole::new());
    let mut app = AppService::from_peripheral(&config, &pwm);
    app.start(&mut console);

    // ── 5. Serial reader ──────────────────────────────────────
    let uart_rx = ConsoleUart::install(config.uart_rx_buffer).map_err(Error::from)?;
    let reader = uart::spawn_reader(uart_rx, &KEY_CHANNEL)
        .map_err(|e| {
            error!("uart reader spawn: {}", e);
            Error::Init("uart reader thread spawn failed")
        })?;

    info!("System ready. Entering poll loop.");

    // ── 6. Poll loop ──────────────────────────────────────────
    // No reader, no input: leave main with an error.
    let mut keys = &KEY_CHANNEL;
    let mut delay = FreeRtos;
    while !reader.is_finished() {
        service::run_for(
            &mut app,
            READER_CHECK_POLLS,
            config.poll_interval_ms,
            &mut keys,
            &mut pwm,
            &mut console,
            &mut delay,
        );
    }
    error!("UART reader stopped; no further input possible");
    Err(Error::Init("uart reader stopped").into())
}
