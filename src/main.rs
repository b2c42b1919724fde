//! Traffic Light Firmware — Main Entry Point
//!
//! Hexagonal architecture: a pure controller core behind port traits,
//! wired here to the ESP32 peripherals.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  PinLights        LogDiagnosticSink    MonotonicClock          │
//! │  (LightPort)      (DiagnosticSink)     (TimePort)              │
//! │  UartDriver (SerialPort) · ButtonBank ISRs · alarm tick timer  │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              Controller (pure logic)                   │    │
//! │  │  Parser · Alarm · Dispatch queue · Gates · Debug log   │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Dispatcher · 3 lane workers · debug drain · input task        │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

mod esp_link_shims;

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use esp_idf_hal::gpio::PinDriver;
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::uart::{UartConfig, UartDriver};
use esp_idf_hal::units::Hertz;
use log::{info, warn};

use trafficlight::adapters::lights::PinLights;
use trafficlight::adapters::log_sink::LogDiagnosticSink;
use trafficlight::adapters::time::MonotonicClock;
use trafficlight::app::service::Controller;
use trafficlight::config::ControllerConfig;
use trafficlight::drivers::{button, hw_init, hw_timer, uart};
use trafficlight::pins;

/// Build-time configuration override (JSON, see `ControllerConfig`).
fn load_config() -> ControllerConfig {
    match option_env!("TRAFFICLIGHT_CONFIG_JSON") {
        None => ControllerConfig::default(),
        Some(json) => match ControllerConfig::from_json(json) {
            Ok(cfg) => {
                info!("Config loaded from TRAFFICLIGHT_CONFIG_JSON");
                cfg
            }
            Err(e) => {
                warn!("Config override rejected ({}), using defaults", e);
                ControllerConfig::default()
            }
        },
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Traffic light v{}                ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = load_config();
    let poll_interval_ms = config.uart_poll_interval_ms;
    let tick_interval_ms = config.alarm_tick_interval_ms;
    button::BUTTONS.set_debounce_ms(config.button_debounce_ms);

    // ── 2. Peripherals ────────────────────────────────────────
    // GPIO numbers below mirror `pins`.
    let peripherals = Peripherals::take()?;
    let red = PinDriver::output(peripherals.pins.gpio2)?;
    let green = PinDriver::output(peripherals.pins.gpio4)?;
    let lights = PinLights::new(red, green);

    let serial = UartDriver::new(
        peripherals.uart0,
        peripherals.pins.gpio1,
        peripherals.pins.gpio3,
        Option::<esp_idf_hal::gpio::AnyIOPin>::None,
        Option::<esp_idf_hal::gpio::AnyIOPin>::None,
        &UartConfig::default().baudrate(Hertz(pins::UART_BAUD)),
    )?;

    // ── 3. Controller + tasks ─────────────────────────────────
    let controller = Controller::new(
        config,
        lights,
        LogDiagnosticSink::new(),
        MonotonicClock::new(),
    )?;
    controller.spawn_tasks()?;

    if let Err(e) = hw_init::init_buttons() {
        log::error!("Button init failed: {} — continuing without buttons", e);
    }
    hw_timer::start_tick_timer(controller.clone(), tick_interval_ms)?;

    info!("Traffic light system starting");
    info!("System online. Use serial commands like: R,2000 | Y | G,500 | 000010/G");

    // ── 4. UART loop (never returns) ──────────────────────────
    uart::run_uart_task(&controller, serial, poll_interval_ms)
}
