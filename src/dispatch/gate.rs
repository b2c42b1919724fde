//! Hand-off gates between the dispatcher and the lane workers.
//!
//! ```text
//!  Dispatcher ──post(ms)──▶ ColorGate[lane] ──wait_pending()──▶ Worker
//!      ▲                                                          │
//!      └────────wait()──── CompletionGate ◀────release()──────────┘
//! ```
//!
//! Each [`ColorGate`] is a pending flag + duration guarded by its own
//! mutex and paired with its own condvar; there is no global lock.  The
//! [`CompletionGate`] is a binary semaphore starting at zero: the
//! dispatcher posts one command, then waits for exactly one release, so
//! only one lane is ever lit.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use crate::app::command::Color;
use crate::error::{Error, Result};

// ═══════════════════════════════════════════════════════════════
//  Colour gate
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
struct Slot {
    pending: bool,
    duration_ms: u32,
}

/// One lane's pending-work predicate.
#[derive(Debug, Default)]
pub struct ColorGate {
    slot: Mutex<Slot>,
    ready: Condvar,
}

impl ColorGate {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mark work pending for `duration_ms` and wake the lane worker.
    pub fn post(&self, duration_ms: u32) {
        let mut slot = self.slot();
        slot.pending = true;
        slot.duration_ms = duration_ms;
        self.ready.notify_one();
    }

    /// Block until work is pending, consume it and return its duration.
    pub fn wait_pending(&self) -> u32 {
        let mut slot = self
            .ready
            .wait_while(self.slot(), |s| !s.pending)
            .unwrap_or_else(PoisonError::into_inner);
        slot.pending = false;
        slot.duration_ms
    }

    pub fn is_pending(&self) -> bool {
        self.slot().pending
    }
}

/// The three lane gates, addressable by colour.
#[derive(Debug, Default)]
pub struct LaneGates {
    red: ColorGate,
    yellow: ColorGate,
    green: ColorGate,
}

impl LaneGates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, color: Color) -> &ColorGate {
        match color {
            Color::Red => &self.red,
            Color::Yellow => &self.yellow,
            Color::Green => &self.green,
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Completion gate
// ═══════════════════════════════════════════════════════════════

/// Binary semaphore (capacity 1, initial 0) signalled by the active
/// worker when its lane goes dark.
#[derive(Debug, Default)]
pub struct CompletionGate {
    released: Mutex<bool>,
    signal: Condvar,
}

impl CompletionGate {
    pub fn new() -> Self {
        Self::default()
    }

    fn released(&self) -> MutexGuard<'_, bool> {
        self.released.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Signal completion of the active lane.
    ///
    /// A second release before the dispatcher has taken the first means
    /// two lanes ran for one command: [`Error::ProtocolViolation`].
    pub fn release(&self) -> Result<()> {
        let mut released = self.released();
        if *released {
            return Err(Error::ProtocolViolation);
        }
        *released = true;
        self.signal.notify_one();
        Ok(())
    }

    /// Block until released, then reset to zero.
    pub fn wait(&self) {
        let mut released = self
            .signal
            .wait_while(self.released(), |r| !*r)
            .unwrap_or_else(PoisonError::into_inner);
        *released = false;
    }

    pub fn is_released(&self) -> bool {
        *self.released()
    }
}
