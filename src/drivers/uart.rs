//! Polled UART line reader.
//!
//! Bytes are pulled one at a time from a [`SerialPort`], assembled into
//! lines by a fixed-capacity [`LineBuffer`] and handed to the
//! controller.  The task never blocks on the port: it drains whatever
//! is available, then sleeps for the poll interval.

use std::thread;
use std::time::Duration;

use log::info;

use crate::app::ports::SerialPort;
use crate::app::service::Controller;
use crate::config::LINE_BUFFER_LEN;
use crate::parser::LineBuffer;

/// Feed every byte currently available on `serial` into `buffer`.
/// Returns how many line events reached the controller.
pub fn pump_serial<S: SerialPort + ?Sized, const N: usize>(
    controller: &Controller,
    serial: &mut S,
    buffer: &mut LineBuffer<N>,
) -> usize {
    let mut events = 0;
    while let Some(byte) = serial.poll_byte() {
        if let Some(event) = buffer.push(byte) {
            controller.handle_line_event(event);
            events += 1;
        }
    }
    events
}

/// UART task body.
pub fn run_uart_task<S: SerialPort>(controller: &Controller, mut serial: S, poll_interval_ms: u32) -> ! {
    info!("UART task started (poll every {} ms)", poll_interval_ms);
    let mut buffer = LineBuffer::<LINE_BUFFER_LEN>::new();
    let period = Duration::from_millis(u64::from(poll_interval_ms));
    loop {
        pump_serial(controller, &mut serial, &mut buffer);
        thread::sleep(period);
    }
}

// ── ESP-IDF UART driver ───────────────────────────────────────

#[cfg(target_os = "espidf")]
impl SerialPort for esp_idf_hal::uart::UartDriver<'_> {
    fn poll_byte(&mut self) -> Option<u8> {
        let mut byte = [0u8; 1];
        match self.read(&mut byte, esp_idf_hal::delay::NON_BLOCK) {
            Ok(1) => Some(byte[0]),
            _ => None,
        }
    }
}
