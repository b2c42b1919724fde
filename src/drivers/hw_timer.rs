//! Periodic alarm tick using ESP-IDF's esp_timer API.
//!
//! Each tick forwards debounced button edges and advances the alarm
//! through [`Controller::timer_tick`].  On simulation targets a sleeping
//! thread approximates the timer.
//!
//! Timer callbacks execute in the ESP timer task context (not ISR), so
//! they may take the short locks the controller's alarm and input
//! channel use.

use std::sync::OnceLock;

use log::info;

use crate::app::service::Controller;
use crate::drivers::button::BUTTONS;
use crate::error::{Error, Result};

/// Controller driven by the tick.  Set once when the timer starts.
static TICK_TARGET: OnceLock<Controller> = OnceLock::new();

fn tick() {
    if let Some(controller) = TICK_TARGET.get() {
        BUTTONS.forward_pending(controller);
        controller.timer_tick();
    }
}

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
static mut TICK_TIMER: esp_timer_handle_t = core::ptr::null_mut();

#[cfg(target_os = "espidf")]
unsafe extern "C" fn tick_cb(_arg: *mut core::ffi::c_void) {
    tick();
}

/// Start the periodic tick driving `controller` every `interval_ms`.
#[cfg(target_os = "espidf")]
pub fn start_tick_timer(controller: Controller, interval_ms: u32) -> Result<()> {
    TICK_TARGET
        .set(controller)
        .map_err(|_| Error::Init("tick timer already started"))?;

    // SAFETY: TICK_TIMER is written here once at boot from the main task
    // before the timer can fire; the callback only reads TICK_TARGET.
    unsafe {
        let args = esp_timer_create_args_t {
            callback: Some(tick_cb),
            arg: core::ptr::null_mut(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: b"alarm_tick\0".as_ptr() as *const _,
            skip_unhandled_events: true,
        };
        let ret = esp_timer_create(&args, &raw mut TICK_TIMER);
        if ret != ESP_OK {
            log::error!("hw_timer: tick timer create failed (rc={})", ret);
            return Err(Error::Init("tick timer create failed"));
        }
        let ret = esp_timer_start_periodic(TICK_TIMER, u64::from(interval_ms) * 1_000);
        if ret != ESP_OK {
            log::error!("hw_timer: tick timer start failed (rc={})", ret);
            return Err(Error::Init("tick timer start failed"));
        }
    }

    info!("hw_timer: alarm tick every {} ms", interval_ms);
    Ok(())
}

/// Simulation fallback — a pinned thread sleeping between ticks.
#[cfg(not(target_os = "espidf"))]
pub fn start_tick_timer(controller: Controller, interval_ms: u32) -> Result<()> {
    use std::time::Duration;

    use crate::drivers::task_pin::{Core, TASK_PRIORITY, TASK_STACK_KB, spawn_on_core};

    TICK_TARGET
        .set(controller)
        .map_err(|_| Error::Init("tick timer already started"))?;

    let period = Duration::from_millis(u64::from(interval_ms));
    spawn_on_core(Core::Pro, TASK_PRIORITY, TASK_STACK_KB, "alarm-tick\0", move || {
        loop {
            std::thread::sleep(period);
            tick();
        }
    })
    .map_err(|_| Error::Init("tick thread spawn failed"))?;

    info!("hw_timer(sim): alarm tick every {} ms", interval_ms);
    Ok(())
}
