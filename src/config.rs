//! Controller configuration parameters
//!
//! All tunable parameters for the traffic light controller.
//! Values can be overridden at build time with a JSON document.

use serde::{Deserialize, Serialize};

use crate::app::command::Color;
use crate::error::{Error, Result};

/// Longest serial line kept by the UART reader (bytes, excluding the
/// terminator).  One byte of a 64-byte receive buffer is reserved.
pub const LINE_BUFFER_LEN: usize = 63;
/// Capacity of one debug log message (bytes).
pub const DEBUG_MESSAGE_LEN: usize = 128;
/// Depth of the bounded channel fed by button ISRs and the alarm timer.
pub const INPUT_CHANNEL_DEPTH: usize = 16;

/// Core controller configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    // --- Command durations ---
    /// Duration of an immediate command with no `,<ms>` suffix
    pub default_duration_ms: u32,
    /// Duration of a manual override button command
    pub manual_duration_ms: u32,
    /// Duration of the command injected when the alarm fires
    pub alarm_duration_ms: u32,
    /// Alarm colour when the `/x` suffix is absent
    pub default_alarm_color: Color,

    // --- Timing ---
    /// UART polling period (milliseconds)
    pub uart_poll_interval_ms: u32,
    /// Alarm tick period (milliseconds)
    pub alarm_tick_interval_ms: u32,
    /// Minimum spacing between accepted button edges (milliseconds)
    pub button_debounce_ms: u32,

    // --- Boot state ---
    pub debug_enabled_at_boot: bool,
    pub paused_at_boot: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: 1000,
            manual_duration_ms: 1000,
            alarm_duration_ms: 1000,
            default_alarm_color: Color::Red,

            uart_poll_interval_ms: 10,
            alarm_tick_interval_ms: 100, // 10 Hz
            button_debounce_ms: 50,

            debug_enabled_at_boot: false,
            paused_at_boot: false,
        }
    }
}

impl ControllerConfig {
    /// Reject values the tasks cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.uart_poll_interval_ms == 0 {
            return Err(Error::Config("uart_poll_interval_ms must be > 0"));
        }
        if self.alarm_tick_interval_ms == 0 || self.alarm_tick_interval_ms > 1000 {
            return Err(Error::Config("alarm_tick_interval_ms must be in 1..=1000"));
        }
        if self.manual_duration_ms == 0 {
            return Err(Error::Config("manual_duration_ms must be > 0"));
        }
        if self.alarm_duration_ms == 0 {
            return Err(Error::Config("alarm_duration_ms must be > 0"));
        }
        if self.button_debounce_ms > 1000 {
            return Err(Error::Config("button_debounce_ms must be <= 1000"));
        }
        Ok(())
    }

    /// Parse a JSON override.  Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|_| Error::Config("invalid JSON"))?;
        config.validate()?;
        Ok(config)
    }
}
