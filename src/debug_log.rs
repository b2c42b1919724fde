//! Debug log — best-effort diagnostic stream gated by the debug flag.
//!
//! Producers (UART task, input task, dispatcher, lane workers) format a
//! message into a fixed 128-byte buffer and queue it; a dedicated drain
//! task emits messages one at a time to the [`DiagnosticSink`].
//!
//! - While the flag is off, [`DebugLog::log`] returns before formatting.
//! - A message longer than 128 bytes is cut at the last whole character
//!   that fits.  One whose slot cannot be reserved is dropped and
//!   counted.  Producers never wait on the sink.
//! - Turning the flag off discards the backlog.  Messages queued before
//!   the toggle are never emitted after it returns.

use core::fmt::{self, Write as _};
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use heapless::String;

use crate::app::ports::DiagnosticSink;
use crate::config::DEBUG_MESSAGE_LEN;

/// One formatted debug line.
pub type DebugMessage = String<DEBUG_MESSAGE_LEN>;

/// Queue a formatted message on a [`DebugLog`].
///
/// Arguments are only rendered when debug output is enabled.
macro_rules! debug_log {
    ($log:expr, $($arg:tt)*) => {
        $log.log(format_args!($($arg)*))
    };
}
pub(crate) use debug_log;

/// Writer that keeps the prefix of the output that fits in a
/// [`DebugMessage`] and silently discards the rest.
struct Truncating<'a>(&'a mut DebugMessage);

impl fmt::Write for Truncating<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = DEBUG_MESSAGE_LEN - self.0.len();
        let mut end = s.len().min(room);
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        // Cannot fail: `end` bytes always fit.
        let _ = self.0.push_str(&s[..end]);
        Ok(())
    }
}

#[derive(Debug)]
struct Entry {
    /// Backlog generation the message was queued in.
    epoch: u32,
    text: DebugMessage,
}

#[derive(Debug, Default)]
struct Backlog {
    entries: VecDeque<Entry>,
    epoch: u32,
}

#[derive(Debug, Default)]
pub struct DebugLog {
    enabled: AtomicBool,
    backlog: Mutex<Backlog>,
    available: Condvar,
    /// Held by the drain task across check + emit, and by `set_enabled(false)`.
    emitting: Mutex<()>,
    dropped: AtomicU32,
}

impl DebugLog {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
            ..Self::default()
        }
    }

    fn backlog(&self) -> MutexGuard<'_, Backlog> {
        self.backlog.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Switch debug output on or off.  Switching off discards the backlog.
    pub fn set_enabled(&self, enabled: bool) {
        if enabled {
            self.enabled.store(true, Ordering::Relaxed);
            return;
        }
        let _emitting = self.emitting.lock().unwrap_or_else(PoisonError::into_inner);
        self.enabled.store(false, Ordering::Relaxed);
        let mut backlog = self.backlog();
        backlog.epoch = backlog.epoch.wrapping_add(1);
        backlog.entries.clear();
    }

    /// Flip the flag and return the new state.
    pub fn toggle(&self) -> bool {
        let enabled = !self.is_enabled();
        self.set_enabled(enabled);
        enabled
    }

    /// Format and queue a message.  Never blocks on the sink.
    pub fn log(&self, args: fmt::Arguments<'_>) {
        if !self.is_enabled() {
            return;
        }

        let mut text = DebugMessage::new();
        if Truncating(&mut text).write_fmt(args).is_err() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return;
        }

        let mut backlog = self.backlog();
        if backlog.entries.try_reserve(1).is_err() {
            drop(backlog);
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return;
        }
        let epoch = backlog.epoch;
        backlog.entries.push_back(Entry { epoch, text });
        drop(backlog);
        self.available.notify_one();
    }

    /// Messages waiting for the drain task.
    pub fn backlog_len(&self) -> usize {
        self.backlog().entries.len()
    }

    /// Messages dropped because they did not fit or could not be queued.
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Block for the next message and emit it unless it went stale.
    pub fn drain_one(&self, sink: &dyn DiagnosticSink) {
        let entry = {
            let mut backlog = self
                .available
                .wait_while(self.backlog(), |b| b.entries.is_empty())
                .unwrap_or_else(PoisonError::into_inner);
            backlog.entries.pop_front()
        };
        if let Some(entry) = entry {
            self.emit_if_current(&entry, sink);
        }
    }

    /// Emit the next message if one is queued.  Returns `false` when idle.
    pub fn try_drain_one(&self, sink: &dyn DiagnosticSink) -> bool {
        let Some(entry) = self.backlog().entries.pop_front() else {
            return false;
        };
        self.emit_if_current(&entry, sink);
        true
    }

    fn emit_if_current(&self, entry: &Entry, sink: &dyn DiagnosticSink) {
        let _emitting = self.emitting.lock().unwrap_or_else(PoisonError::into_inner);
        if self.is_enabled() && self.backlog().epoch == entry.epoch {
            sink.emit(&entry.text);
        }
    }

    /// Drain task body.
    pub fn run(&self, sink: &dyn DiagnosticSink) -> ! {
        loop {
            self.drain_one(sink);
        }
    }
}
