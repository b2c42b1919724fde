//! Shared state handed to every task.
//!
//! `Context` is built once by the [`Controller`](super::service::Controller)
//! and shared behind an `Arc`.  Each piece carries its own
//! synchronisation: the dispatch queue and every gate own a
//! mutex/condvar pair, the pause flag is a relaxed atomic, and the
//! alarm sits behind its own mutex.  There is no global lock.

use core::sync::atomic::{AtomicBool, Ordering};
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::error;

use crate::alarm::AlarmTimer;
use crate::config::ControllerConfig;
use crate::debug_log::{DebugLog, debug_log};
use crate::dispatch::gate::{CompletionGate, LaneGates};
use crate::dispatch::queue::CommandQueue;
use crate::error::Result;
use crate::events::InputChannel;

use super::command::{Color, Command};
use super::ports::{DiagnosticSink, LightPort, TimePort};

pub struct Context {
    pub config: ControllerConfig,
    pub queue: CommandQueue,
    pub gates: LaneGates,
    pub completion: CompletionGate,
    pub debug: DebugLog,
    pub inputs: InputChannel,
    alarm: Mutex<AlarmTimer>,
    /// Read without a lock by every producer; a late observation of a
    /// toggle is harmless.
    paused: AtomicBool,
    /// Set once the task set has been spawned.
    tasks_started: AtomicBool,
    lights: Mutex<Box<dyn LightPort>>,
    sink: Box<dyn DiagnosticSink>,
    clock: Box<dyn TimePort>,
}

impl Context {
    pub fn new(
        config: ControllerConfig,
        lights: Box<dyn LightPort>,
        sink: Box<dyn DiagnosticSink>,
        clock: Box<dyn TimePort>,
    ) -> Self {
        Self {
            queue: CommandQueue::new(),
            gates: LaneGates::new(),
            completion: CompletionGate::new(),
            debug: DebugLog::new(config.debug_enabled_at_boot),
            inputs: InputChannel::new(),
            alarm: Mutex::new(AlarmTimer::new(config.alarm_duration_ms)),
            paused: AtomicBool::new(config.paused_at_boot),
            tasks_started: AtomicBool::new(false),
            lights: Mutex::new(lights),
            sink,
            clock,
            config,
        }
    }

    // ── Flags ─────────────────────────────────────────────────

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }

    /// Flip the pause flag and return the new state.
    pub fn toggle_pause(&self) -> bool {
        !self.paused.fetch_xor(true, Ordering::Relaxed)
    }

    /// Claim the right to start the task set.  Only the first call
    /// returns `true`; a second dispatcher would break lane exclusion.
    pub fn claim_task_start(&self) -> bool {
        !self.tasks_started.swap(true, Ordering::AcqRel)
    }

    // ── Commands ──────────────────────────────────────────────

    /// Enqueue a command for the dispatcher.  An allocation failure
    /// drops the command and is reported on the console.
    pub fn push_command(&self, command: Command) -> Result<()> {
        if let Err(e) = self.queue.push(command) {
            error!("dispatch queue: {} ({:?} dropped)", e, command);
            self.console(format_args!("push_color_to_fifo: malloc failed"));
            return Err(e);
        }
        debug_log!(
            self.debug,
            "PUSH FIFO: {}, {} ms",
            command.color,
            command.duration_ms
        );
        Ok(())
    }

    pub fn alarm(&self) -> MutexGuard<'_, AlarmTimer> {
        self.alarm.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Outputs ───────────────────────────────────────────────

    /// Switch every lamp of `color` on or off.
    pub fn drive_lane(&self, color: Color, active: bool) {
        let mut lights = self.lights.lock().unwrap_or_else(PoisonError::into_inner);
        for &lamp in color.lamps() {
            lights.set_output(lamp, active);
        }
    }

    /// Print a line unconditionally, bypassing the debug flag.
    pub fn console(&self, args: fmt::Arguments<'_>) {
        self.sink.emit(&fmt::format(args));
    }

    pub fn sink(&self) -> &dyn DiagnosticSink {
        self.sink.as_ref()
    }

    // ── Time ──────────────────────────────────────────────────

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn now_us(&self) -> u64 {
        self.clock.now_us()
    }
}
