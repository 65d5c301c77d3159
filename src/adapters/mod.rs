//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter          | Implements     | Connects to                   |
//! |------------------|----------------|-------------------------------|
//! | `console_sink`   | EventSink      | Any `fmt::Write` console      |
//! | `mcpwm`          | PwmPeripheral  | ESP32 MCPWM timer/comparators |
//! | `sim_pwm`        | PwmPeripheral  | In-memory buffered timer      |
//! | `stdout_console` | `fmt::Write`   | stdout / UART0 console        |
//! | `uart`           | KeyChannel feed| UART0 RX / any `io::Read`     |

pub mod console_sink;
pub mod mcpwm;
pub mod sim_pwm;
pub mod stdout_console;
pub mod uart;
