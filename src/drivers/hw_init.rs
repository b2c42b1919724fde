//! One-shot button GPIO and ISR initialization.
//!
//! Configures the five button inputs (pull-down, rising-edge interrupt)
//! using raw ESP-IDF sys calls and registers one ISR per pin.  The lamp
//! outputs are owned by `esp-idf-hal` pin drivers instead; see
//! [`PinLights`](crate::adapters::lights::PinLights).  Called once from
//! `main()` before the controller tasks start.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    IsrInstallFailed(i32),
    IsrAddFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
            Self::IsrAddFailed(rc) => write!(f, "GPIO ISR handler add failed (rc={})", rc),
        }
    }
}

impl From<HwInitError> for crate::error::Error {
    fn from(_: HwInitError) -> Self {
        crate::error::Error::Init("button GPIO init failed")
    }
}

// ── Button inputs ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe extern "C" fn button_gpio_isr(arg: *mut core::ffi::c_void) {
    // SAFETY: esp_timer_get_time is a RTC counter read; safe in ISR context.
    let now_ms = (unsafe { esp_timer_get_time() } / 1_000) as u32;
    crate::drivers::button::button_isr_handler(arg as usize as i32, now_ms);
}

/// Configure the button pins and register their ISRs.
#[cfg(target_os = "espidf")]
pub fn init_buttons() -> Result<(), HwInitError> {
    // SAFETY: called once from main() before any task runs. The ISR only
    // touches the lock-free button bank; the pin number travels as the
    // handler argument, so no pointer is ever dereferenced.
    unsafe {
        for &pin in &pins::BUTTON_GPIOS {
            let cfg = gpio_config_t {
                pin_bit_mask: 1u64 << pin,
                mode: gpio_mode_t_GPIO_MODE_INPUT,
                pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
                pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_ENABLE,
                intr_type: gpio_int_type_t_GPIO_INTR_POSEDGE,
            };
            let ret = gpio_config(&cfg);
            if ret != ESP_OK as i32 {
                return Err(HwInitError::GpioConfigFailed(ret));
            }
        }

        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK as i32 && ret != ESP_ERR_INVALID_STATE as i32 {
            return Err(HwInitError::IsrInstallFailed(ret));
        }

        for &pin in &pins::BUTTON_GPIOS {
            let ret = gpio_isr_handler_add(pin, Some(button_gpio_isr), pin as usize as *mut _);
            if ret != ESP_OK as i32 {
                return Err(HwInitError::IsrAddFailed(ret));
            }
        }
    }
    info!("hw_init: {} buttons armed (rising edge)", pins::BUTTON_GPIOS.len());
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_buttons() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): button GPIO init skipped");
    Ok(())
}
