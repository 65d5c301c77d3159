//! Console event sink adapter.
//!
//! Implements [`EventSink`] by rendering application events as terminal
//! text on any [`core::fmt::Write`] target: the UART console in production,
//! a `String` in tests.  Every event is also logged through the `log`
//! facade.

use core::fmt::{self, Write};

use heapless::String;
use log::{debug, info};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::control::compare_pair::PwmParams;

/// ANSI escape: clear screen and home the cursor.
pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[;H";

pub const TITLE_BANNER: &str = "***********************************************************\r\n\
Dual-Compare Asymmetric PWM Controller\r\n\
***********************************************************\r\n\r\n";

pub const INSTRUCTIONS: &str = "====================================================\r\n\
Instructions:\r\n\
====================================================\r\n\
Press 's' : To increase the duty cycle\r\n\
Press 'w' : To decrease the duty cycle\r\n\
Press 'a' : To shift waveform towards left\r\n\
Press 'd' : To shift waveform towards right\r\n\
====================================================\r\n";

pub const WRONG_KEY: &str = "Wrong key pressed !! See below instructions:\r\n";

/// Longest status line: three `u32`s plus labels.
pub const STATUS_LINE_CAP: usize = 64;

/// Render `Period: <p>\tCompare0: <c0>\tCompare1: <c1>` without the line end.
pub fn status_line(params: &PwmParams) -> String<STATUS_LINE_CAP> {
    let mut line = String::new();
    let _ = write!(
        line,
        "Period: {}\tCompare0: {}\tCompare1: {}",
        params.period(),
        params.compare0(),
        params.compare1()
    );
    line
}

/// Adapter that prints every [`AppEvent`] to a text console.
pub struct ConsoleSink<W: Write> {
    out: W,
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn render(&mut self, event: &AppEvent) -> fmt::Result {
        match event {
            AppEvent::Started(_) => {
                self.out.write_str(CLEAR_SCREEN)?;
                self.out.write_str(TITLE_BANNER)?;
                self.out.write_str(INSTRUCTIONS)
            }
            // A text console cannot carry a raw high byte; show its value.
            AppEvent::KeyPressed(key) if key.is_ascii() => {
                write!(self.out, "Pressed key: {}\r\n", char::from(*key))
            }
            AppEvent::KeyPressed(key) => {
                write!(self.out, "Pressed key: \\x{:02x}\r\n", key)
            }
            AppEvent::Updated(params) => {
                write!(self.out, "{}\r\n", status_line(params))
            }
            AppEvent::Unrecognized(_) => {
                self.out.write_str(WRONG_KEY)?;
                self.out.write_str(INSTRUCTIONS)
            }
        }
    }
}

impl<W: Write> EventSink for ConsoleSink<W> {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(p) => info!("START | {}", status_line(p)),
            AppEvent::KeyPressed(key) => debug!("KEY | 0x{:02x}", key),
            AppEvent::Updated(p) => info!("PWM | {}", status_line(p)),
            AppEvent::Unrecognized(key) => info!("KEY | unrecognized 0x{:02x}", key),
        }
        // A console write failure must not stall the control path.
        let _ = self.render(event);
    }
}
