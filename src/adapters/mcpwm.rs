//! MCPWM adapter — dual-compare asymmetric PWM on ESP32 / ESP32-S3.
//!
//! ```text
//!   Timer (up-down, peak = period_ticks / 2)
//!     │
//!   Operator 0 ── Comparator A (compare0) ──┐
//!              └─ Comparator B (compare1) ──┴─▶ Generator ──▶ GPIO
//! ```
//!
//! Generator actions:
//! - timer empty, counting up → HIGH
//! - compare0, counting up    → LOW
//! - compare1, counting down  → HIGH
//!
//! The pulse is centred on the counter's zero.  compare0 places its
//! trailing edge and compare1 its leading edge.
//!
//! ## Atomic pair handover
//!
//! [`publish_compare_pair`](PwmPeripheral::publish_compare_pair) only stages
//! the pair in [`StagedPair`].  The timer-empty callback takes the staged
//! pair and writes both comparators back to back, right after the counter
//! wrapped.  The comparators are configured to latch their shadow values on
//! the next timer-empty event, so both values go live at the same cycle
//! boundary.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::config::MAX_PEAK;
use crate::control::compare_pair::ComparePair;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::app::ports::PwmPeripheral;
#[cfg(target_os = "espidf")]
use crate::config::PwmHwConfig;
#[cfg(target_os = "espidf")]
use crate::control::compare_pair::PwmParams;
#[cfg(target_os = "espidf")]
use crate::error::PeripheralError;

// ── Staging slot ──────────────────────────────────────────────

/// Set in a packed word that holds a pair; an empty slot is all zeros.
const STAGED_FLAG: u32 = 1 << 31;

/// One-deep mailbox between the publisher (main loop) and the
/// timer-empty ISR.  A newer pair replaces an older one not yet taken.
///
/// Both values live in one `AtomicU32` (compare0 in bits 0..15, compare1
/// in bits 16..31, bit 31 marks a staged pair), so the ISR takes a whole
/// pair with a single swap and never waits on a lock.  Values are capped
/// at [`MAX_PEAK`]; `SystemConfig::validate` keeps the counter peak there.
pub struct StagedPair {
    slot: AtomicU32,
}

impl StagedPair {
    pub const fn new() -> Self {
        Self {
            slot: AtomicU32::new(0),
        }
    }

    /// Main-loop side.
    pub fn stage(&self, pair: ComparePair) {
        let packed =
            STAGED_FLAG | (pair.compare1.min(MAX_PEAK) << 16) | pair.compare0.min(MAX_PEAK);
        self.slot.store(packed, Ordering::Release);
    }

    /// ISR side.  Takes the pair so it is written once.
    pub fn take(&self) -> Option<ComparePair> {
        let packed = self.slot.swap(0, Ordering::Acquire);
        (packed & STAGED_FLAG != 0).then(|| ComparePair {
            compare0: packed & MAX_PEAK,
            compare1: (packed >> 16) & MAX_PEAK,
        })
    }

    pub fn is_staged(&self) -> bool {
        self.slot.load(Ordering::Relaxed) & STAGED_FLAG != 0
    }
}

impl Default for StagedPair {
    fn default() -> Self {
        Self::new()
    }
}

/// Slot shared with the timer-empty callback.
pub static STAGED: StagedPair = StagedPair::new();

// ── ESP-IDF driver ────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut COMPARATORS: [mcpwm_cmpr_handle_t; 2] = [core::ptr::null_mut(); 2];

/// Timer-empty ISR: move a staged pair into the comparator shadows.
///
/// SAFETY: COMPARATORS is written once in `McpwmAdapter::new()` before the
/// callback is registered and never written again.
#[cfg(target_os = "espidf")]
unsafe extern "C" fn on_timer_empty(
    _timer: mcpwm_timer_handle_t,
    _edata: *const mcpwm_timer_event_data_t,
    _user_ctx: *mut core::ffi::c_void,
) -> bool {
    if let Some(pair) = STAGED.take() {
        unsafe {
            let [cmp0, cmp1] = COMPARATORS;
            mcpwm_comparator_set_compare_value(cmp0, pair.compare0);
            mcpwm_comparator_set_compare_value(cmp1, pair.compare1);
        }
    }
    false
}

#[cfg(target_os = "espidf")]
fn check(step: &'static str, rc: esp_err_t) -> Result<(), PeripheralError> {
    if rc == ESP_OK as esp_err_t {
        Ok(())
    } else {
        Err(PeripheralError::Mcpwm { step, rc })
    }
}

/// Concrete [`PwmPeripheral`] backed by MCPWM group 0, operator 0.
#[cfg(target_os = "espidf")]
pub struct McpwmAdapter {
    initial: PwmParams,
    _timer: mcpwm_timer_handle_t,
}

#[cfg(target_os = "espidf")]
impl McpwmAdapter {
    /// Configure and start the timer.  Call once at boot.
    pub fn new(cfg: &PwmHwConfig) -> Result<Self, PeripheralError> {
        let peak = cfg.peak();
        // SAFETY: Called once from main() before the poll loop; the
        // callback is registered only after COMPARATORS is populated.
        unsafe {
            let mut timer: mcpwm_timer_handle_t = core::ptr::null_mut();
            let timer_cfg = mcpwm_timer_config_t {
                group_id: 0,
                clk_src: soc_periph_mcpwm_timer_clk_src_t_MCPWM_TIMER_CLK_SRC_DEFAULT,
                resolution_hz: cfg.resolution_hz,
                count_mode: mcpwm_timer_count_mode_t_MCPWM_TIMER_COUNT_MODE_UP_DOWN,
                period_ticks: cfg.period_ticks,
                ..Default::default()
            };
            check("new_timer", mcpwm_new_timer(&timer_cfg, &mut timer))?;

            let mut oper: mcpwm_oper_handle_t = core::ptr::null_mut();
            let oper_cfg = mcpwm_operator_config_t {
                group_id: 0,
                ..Default::default()
            };
            check("new_operator", mcpwm_new_operator(&oper_cfg, &mut oper))?;
            check("connect_timer", mcpwm_operator_connect_timer(oper, timer))?;

            let mut cmp_cfg = mcpwm_comparator_config_t::default();
            cmp_cfg.flags.set_update_cmp_on_tez(1);
            let initial = [cfg.initial_compare0, cfg.initial_compare1];
            for (i, value) in initial.into_iter().enumerate() {
                let mut cmp: mcpwm_cmpr_handle_t = core::ptr::null_mut();
                check("new_comparator", mcpwm_new_comparator(oper, &cmp_cfg, &mut cmp))?;
                check("set_compare", mcpwm_comparator_set_compare_value(cmp, value))?;
                COMPARATORS[i] = cmp;
            }
            let [cmp0, cmp1] = COMPARATORS;

            let mut generator: mcpwm_gen_handle_t = core::ptr::null_mut();
            let gen_cfg = mcpwm_generator_config_t {
                gen_gpio_num: cfg.gpio,
                ..Default::default()
            };
            check("new_generator", mcpwm_new_generator(oper, &gen_cfg, &mut generator))?;

            check(
                "action_empty",
                mcpwm_generator_set_action_on_timer_event(
                    generator,
                    mcpwm_gen_timer_event_action_t {
                        direction: mcpwm_timer_direction_t_MCPWM_TIMER_DIRECTION_UP,
                        event: mcpwm_timer_event_t_MCPWM_TIMER_EVENT_EMPTY,
                        action: mcpwm_generator_action_t_MCPWM_GEN_ACTION_HIGH,
                    },
                ),
            )?;
            check(
                "action_cmp0",
                mcpwm_generator_set_action_on_compare_event(
                    generator,
                    mcpwm_gen_compare_event_action_t {
                        direction: mcpwm_timer_direction_t_MCPWM_TIMER_DIRECTION_UP,
                        comparator: cmp0,
                        action: mcpwm_generator_action_t_MCPWM_GEN_ACTION_LOW,
                    },
                ),
            )?;
            check(
                "action_cmp1",
                mcpwm_generator_set_action_on_compare_event(
                    generator,
                    mcpwm_gen_compare_event_action_t {
                        direction: mcpwm_timer_direction_t_MCPWM_TIMER_DIRECTION_DOWN,
                        comparator: cmp1,
                        action: mcpwm_generator_action_t_MCPWM_GEN_ACTION_HIGH,
                    },
                ),
            )?;

            let callbacks = mcpwm_timer_event_callbacks_t {
                on_empty: Some(on_timer_empty),
                ..Default::default()
            };
            check(
                "register_callbacks",
                mcpwm_timer_register_event_callbacks(timer, &callbacks, core::ptr::null_mut()),
            )?;
            check("timer_enable", mcpwm_timer_enable(timer))?;
            check(
                "timer_start",
                mcpwm_timer_start_stop(
                    timer,
                    mcpwm_timer_start_stop_cmd_t_MCPWM_TIMER_START_NO_STOP,
                ),
            )?;

            info!(
                "mcpwm: gpio={} {} Hz ticks, peak={} cmp=({}, {})",
                cfg.gpio, cfg.resolution_hz, peak, cfg.initial_compare0, cfg.initial_compare1
            );

            Ok(Self {
                initial: PwmParams::new(peak, cfg.initial_compare0, cfg.initial_compare1),
                _timer: timer,
            })
        }
    }
}

#[cfg(target_os = "espidf")]
impl PwmPeripheral for McpwmAdapter {
    fn initial_parameters(&self) -> PwmParams {
        self.initial
    }

    fn publish_compare_pair(&mut self, pair: ComparePair) {
        STAGED.stage(pair);
    }
}
