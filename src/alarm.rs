//! Single-shot alarm timer.
//!
//! ```text
//!   Idle ──arm()──▶ Armed ──poll() past deadline──▶ Idle (+ Command)
//!                    │  ▲
//!                    └──┘ arm() again replaces the pending fire
//! ```
//!
//! The timer holds no thread of its own.  The periodic alarm tick calls
//! [`AlarmTimer::poll`] with the current monotonic time; a `Some` result
//! is the synthesized command, which the caller pushes onward.

use crate::app::command::{Color, Command};

/// Pending alarm configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Armed {
    fire_at_ms: u64,
    color: Color,
}

/// At most one pending alarm.  Re-arming replaces it.
#[derive(Debug)]
pub struct AlarmTimer {
    armed: Option<Armed>,
    duration_ms: u32,
}

impl AlarmTimer {
    /// `duration_ms` is the length of the command synthesized on expiry.
    pub fn new(duration_ms: u32) -> Self {
        Self {
            armed: None,
            duration_ms,
        }
    }

    /// Schedule expiry `seconds` after `now_ms`.
    ///
    /// Returns `true` if a previously armed alarm was cancelled.
    pub fn arm(&mut self, now_ms: u64, seconds: u32, color: Color) -> bool {
        let replaced = self.armed.is_some();
        self.armed = Some(Armed {
            fire_at_ms: now_ms.saturating_add(u64::from(seconds) * 1000),
            color,
        });
        replaced
    }

    /// Fire if the deadline has passed.  Returns to idle on fire.
    pub fn poll(&mut self, now_ms: u64) -> Option<Command> {
        let armed = self.armed?;
        if now_ms < armed.fire_at_ms {
            return None;
        }
        self.armed = None;
        Some(Command::new(armed.color, self.duration_ms))
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Milliseconds until expiry, `None` when idle.
    pub fn remaining_ms(&self, now_ms: u64) -> Option<u64> {
        self.armed.map(|a| a.fire_at_ms.saturating_sub(now_ms))
    }
}
