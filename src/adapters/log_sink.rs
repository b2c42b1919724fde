//! Log-based diagnostic sink adapter.
//!
//! Implements [`DiagnosticSink`] by forwarding every console and debug
//! line to the `log` facade (the ESP-IDF logger routes it to UART /
//! USB-CDC in production, the host logger to stderr in simulation).

use log::info;

use crate::app::ports::DiagnosticSink;

/// Adapter that writes every diagnostic line to the serial console.
#[derive(Debug, Default)]
pub struct LogDiagnosticSink;

impl LogDiagnosticSink {
    pub fn new() -> Self {
        Self
    }
}

impl DiagnosticSink for LogDiagnosticSink {
    fn emit(&self, text: &str) {
        info!("{}", text);
    }
}
