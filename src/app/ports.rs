//! Port traits — the hexagonal boundary between the controller core and
//! the board.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Controller (domain)
//! ```
//!
//! Driven adapters (lamp pins, serial console, clock, UART) implement
//! these traits.  The controller holds them as trait objects so every
//! task can share them, and tests swap in recording mocks.

use super::command::Lamp;

// ───────────────────────────────────────────────────────────────
// Light port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the lane workers call this to switch lamps.
pub trait LightPort: Send {
    /// Drive one lamp on or off.
    fn set_output(&mut self, lamp: Lamp, active: bool);
}

// ───────────────────────────────────────────────────────────────
// Diagnostic sink (driven adapter: domain → console)
// ───────────────────────────────────────────────────────────────

/// Destination for diagnostic text: the debug log drain and the
/// unconditional console lines both end up here.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, text: &str);
}

// ───────────────────────────────────────────────────────────────
// Time port (driven adapter: clock → domain)
// ───────────────────────────────────────────────────────────────

/// Monotonic time source.
pub trait TimePort: Send + Sync {
    /// Milliseconds since boot.
    fn now_ms(&self) -> u64;

    /// Microseconds since boot.  Defaults to millisecond resolution.
    fn now_us(&self) -> u64 {
        self.now_ms() * 1000
    }
}

// ───────────────────────────────────────────────────────────────
// Serial port (driven adapter: UART → domain)
// ───────────────────────────────────────────────────────────────

/// Non-blocking byte source polled by the UART task.
pub trait SerialPort {
    /// Return the next received byte, or `None` if nothing is pending.
    fn poll_byte(&mut self) -> Option<u8>;
}
