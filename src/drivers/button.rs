//! ISR-debounced button bank.
//!
//! ## Hardware
//!
//! Five momentary switches, active HIGH with pull-downs. Each GPIO fires
//! on the rising edge; the ISR calls [`ButtonBank::on_edge`], which
//! debounces against the last accepted edge of that button (lock-free
//! atomic timestamp) and marks the button pending.  The periodic tick
//! later forwards pending buttons to the controller from task context.
//!
//! | Button | GPIO | Event              |
//! |--------|------|--------------------|
//! | 0      | 13   | pause toggle       |
//! | 1      | 12   | manual red         |
//! | 2      | 14   | manual yellow      |
//! | 3      | 27   | manual green       |
//! | 4      | 26   | debug toggle       |

use core::sync::atomic::{AtomicU8, AtomicU32, Ordering};

use crate::app::service::Controller;
use crate::events::ButtonId;

const BUTTON_COUNT: usize = ButtonId::ALL.len();
const DEFAULT_DEBOUNCE_MS: u32 = 50;
/// Timestamp slot value meaning "never pressed".
const NEVER: u32 = 0;

/// Buttons wired to the board's GPIO ISRs.
pub static BUTTONS: ButtonBank = ButtonBank::new();

pub struct ButtonBank {
    /// Last accepted edge per button (ms since boot, truncated, never 0).
    last_edge_ms: [AtomicU32; BUTTON_COUNT],
    /// Bit `n` set = button `n` accepted but not yet forwarded.
    pending: AtomicU8,
    debounce_ms: AtomicU32,
}

impl Default for ButtonBank {
    fn default() -> Self {
        Self::new()
    }
}

impl ButtonBank {
    pub const fn new() -> Self {
        Self {
            last_edge_ms: [const { AtomicU32::new(NEVER) }; BUTTON_COUNT],
            pending: AtomicU8::new(0),
            debounce_ms: AtomicU32::new(DEFAULT_DEBOUNCE_MS),
        }
    }

    pub fn set_debounce_ms(&self, ms: u32) {
        self.debounce_ms.store(ms, Ordering::Relaxed);
    }

    /// Record a rising edge.  Safe to call from interrupt context.
    /// Returns `true` if the edge was accepted (outside the debounce
    /// window of the previous accepted edge).
    pub fn on_edge(&self, id: ButtonId, now_ms: u32) -> bool {
        let slot = &self.last_edge_ms[usize::from(id.index())];
        let stamp = now_ms.max(1);
        let window = self.debounce_ms.load(Ordering::Relaxed);

        let last = slot.load(Ordering::Acquire);
        if last != NEVER && now_ms.wrapping_sub(last) < window {
            return false;
        }
        if slot
            .compare_exchange(last, stamp, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            // Another edge of the same button won the race.
            return false;
        }
        self.pending.fetch_or(1 << id.index(), Ordering::AcqRel);
        true
    }

    /// Take every pending button, in index order.
    pub fn take_pending(&self) -> impl Iterator<Item = ButtonId> {
        let bits = self.pending.swap(0, Ordering::AcqRel);
        ButtonId::ALL
            .into_iter()
            .filter(move |id| bits & (1 << id.index()) != 0)
    }

    /// Forward pending buttons to the controller.  Returns how many
    /// were accepted by its input channel.
    pub fn forward_pending(&self, controller: &Controller) -> usize {
        self.take_pending()
            .filter(|&id| controller.button_pressed(id))
            .count()
    }
}

/// ISR entry — map the interrupting pin and record the edge.
#[cfg(target_os = "espidf")]
pub fn button_isr_handler(gpio: i32, now_ms: u32) {
    if let Some(id) = crate::pins::button_for_gpio(gpio) {
        BUTTONS.on_edge(id, now_ms);
    }
}
