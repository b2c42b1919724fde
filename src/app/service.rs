//! Controller — the hexagonal core's public face.
//!
//! [`Controller`] owns the shared [`Context`] and exposes the three input
//! channels of the system: serial lines, button edges and the alarm
//! tick.  All I/O flows through port traits injected at construction,
//! making the whole controller testable with mock adapters.
//!
//! ```text
//!  submit_line() ───────────────────────────────┐
//!  button_pressed() ──▶ InputChannel ──▶ input  │
//!  timer_tick() ──────▶  (bounded)      task ───┴──▶ CommandQueue ──▶ Dispatcher
//!                                                                    │
//!                                  LightPort ◀── LaneWorker ×3 ◀─────┘
//! ```

use std::sync::Arc;
use std::thread::JoinHandle;

use log::{info, warn};

use crate::config::ControllerConfig;
use crate::debug_log::debug_log;
use crate::dispatch::dispatcher::Dispatcher;
use crate::dispatch::lane::LaneWorker;
use crate::drivers::task_pin::{Core, TASK_PRIORITY, TASK_STACK_KB, spawn_on_core};
use crate::error::{CommandParseError, Error, Result};
use crate::events::{ButtonId, InputEvent};
use crate::parser::{LineCommand, LineEvent, parse_line};

use super::command::{Color, Command};
use super::context::Context;
use super::ports::{DiagnosticSink, LightPort, TimePort};

// ───────────────────────────────────────────────────────────────
// Controller
// ───────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct Controller {
    ctx: Arc<Context>,
}

impl Controller {
    /// Validate `config` and wire the ports into a fresh context.
    ///
    /// Does **not** start any task — call [`spawn_tasks`](Self::spawn_tasks) next.
    pub fn new(
        config: ControllerConfig,
        lights: impl LightPort + 'static,
        sink: impl DiagnosticSink + 'static,
        clock: impl TimePort + 'static,
    ) -> Result<Self> {
        config.validate()?;
        let ctx = Context::new(config, Box::new(lights), Box::new(sink), Box::new(clock));
        Ok(Self { ctx: Arc::new(ctx) })
    }

    pub fn context(&self) -> &Arc<Context> {
        &self.ctx
    }

    pub fn is_paused(&self) -> bool {
        self.ctx.is_paused()
    }

    pub fn is_debug_enabled(&self) -> bool {
        self.ctx.debug.is_enabled()
    }

    /// Milliseconds until the pending alarm fires, `None` when idle.
    pub fn alarm_remaining_ms(&self) -> Option<u64> {
        let now = self.ctx.now_ms();
        self.ctx.alarm().remaining_ms(now)
    }

    // ── Serial input ──────────────────────────────────────────

    /// Handle one complete serial line.
    ///
    /// Rejected lines leave all state untouched; the reason goes to the
    /// debug log.
    pub fn submit_line(&self, line: &str) {
        let ctx = &self.ctx;
        let started_us = ctx.now_us();
        let line = line.trim();

        match parse_line(line, &ctx.config) {
            Ok(None) => {}
            Ok(Some(LineCommand::SetAlarm { seconds, color })) => self.set_alarm(seconds, color),
            Ok(Some(LineCommand::Immediate(command))) => {
                // Allocation failures are already reported by push_command.
                let _ = ctx.push_command(command);
                debug_log!(
                    ctx.debug,
                    "UART sequence handling time: {} us",
                    ctx.now_us().saturating_sub(started_us)
                );
            }
            Err(Error::Time(e)) => debug_log!(
                ctx.debug,
                "UART TIME CMD parse error: code={} for input '{}'",
                e.code(),
                line
            ),
            Err(Error::Command(CommandParseError::UnknownColor(c))) => debug_log!(
                ctx.debug,
                "UART: unknown color '{}' ignored (input: '{}')",
                c,
                line
            ),
            Err(_) => debug_log!(ctx.debug, "UART: unknown or malformed command: '{}'", line),
        }
    }

    /// Handle one event from the serial line accumulator.
    pub fn handle_line_event<const N: usize>(&self, event: LineEvent<N>) {
        match event {
            LineEvent::Line(line) => self.submit_line(&line),
            LineEvent::Overflow => {
                debug_log!(self.ctx.debug, "UART: input too long, dropping buffer");
            }
            LineEvent::Invalid => {
                debug_log!(self.ctx.debug, "UART: unknown or malformed command: '<non-utf8>'");
            }
        }
    }

    fn set_alarm(&self, seconds: u32, color: Color) {
        let ctx = &self.ctx;
        let now = ctx.now_ms();
        if ctx.alarm().arm(now, seconds, color) {
            debug_log!(ctx.debug, "Previous alarm cancelled");
        }
        ctx.console(format_args!(
            "Alarm set for {} seconds -> color {}",
            seconds, color
        ));
    }

    // ── Interrupt-context inputs ──────────────────────────────

    /// Report a debounced button edge.  Safe to call from an ISR.
    /// Returns `false` if the event was dropped.
    pub fn button_pressed(&self, id: ButtonId) -> bool {
        self.ctx.inputs.try_push(InputEvent::Button(id))
    }

    /// Advance the alarm against the clock.  Safe to call from a timer
    /// callback.  Returns `true` if the alarm fired.
    pub fn timer_tick(&self) -> bool {
        let now = self.ctx.now_ms();
        let fired = self.ctx.alarm().poll(now);
        match fired {
            Some(command) => {
                self.ctx.inputs.try_push(InputEvent::AlarmExpired(command));
                true
            }
            None => false,
        }
    }

    // ── Input task ────────────────────────────────────────────

    /// Apply one input event.
    pub fn handle_event(&self, event: InputEvent) {
        let ctx = &self.ctx;
        match event {
            InputEvent::Button(ButtonId::Pause) => {
                let paused = ctx.toggle_pause();
                ctx.console(format_args!(
                    "Button0 pressed: pause status={}",
                    u8::from(paused)
                ));
            }
            InputEvent::Button(ButtonId::DebugToggle) => {
                let enabled = ctx.debug.toggle();
                ctx.console(format_args!(
                    "DEBUG MODE: {}",
                    if enabled { "ON" } else { "OFF" }
                ));
            }
            InputEvent::Button(id) => self.manual_override(id),
            InputEvent::AlarmExpired(command) => {
                debug_log!(
                    ctx.debug,
                    "Alarm timer expired, pushing {} for {} ms",
                    command.color,
                    command.duration_ms
                );
                let _ = ctx.push_command(command);
            }
        }
    }

    fn manual_override(&self, id: ButtonId) {
        let ctx = &self.ctx;
        let Some(color) = id.manual_color() else {
            return;
        };
        if ctx.is_paused() {
            let _ = ctx.push_command(Command::new(color, ctx.config.manual_duration_ms));
        } else {
            debug_log!(
                ctx.debug,
                "Button{} pressed but pause inactive -> ignored",
                id.index()
            );
        }
    }

    /// Apply every queued input event without blocking.  Returns how
    /// many were handled.
    pub fn process_inputs(&self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.ctx.inputs.try_pop() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    /// Input task body.
    pub fn run_input_task(&self) -> ! {
        info!("Input task started");
        loop {
            let event = futures_lite::future::block_on(self.ctx.inputs.pop());
            self.handle_event(event);
        }
    }

    // ── Task start-up ─────────────────────────────────────────

    /// Start the dispatcher, the three lane workers, the debug drain and
    /// the input task.
    ///
    /// Fails with [`Error::Init`] if the tasks are already running.
    pub fn spawn_tasks(&self) -> Result<Vec<JoinHandle<()>>> {
        if !self.ctx.claim_task_start() {
            warn!("spawn_tasks called twice, ignoring");
            return Err(Error::Init("tasks already running"));
        }
        let mut handles = Vec::with_capacity(6);

        let dispatcher = Dispatcher::new(Arc::clone(&self.ctx));
        handles.push(spawn(Core::App, "dispatcher\0", move || dispatcher.run())?);

        for (color, name) in Color::ALL
            .into_iter()
            .zip(["lane-red\0", "lane-yellow\0", "lane-green\0"])
        {
            let worker = LaneWorker::with_lamps(color, Arc::clone(&self.ctx));
            handles.push(spawn(Core::App, name, move || worker.run())?);
        }

        let ctx = Arc::clone(&self.ctx);
        handles.push(spawn(Core::Pro, "debug\0", move || ctx.debug.run(ctx.sink()))?);

        let input = self.clone();
        handles.push(spawn(Core::App, "input\0", move || input.run_input_task())?);

        info!("{} controller tasks running", handles.len());
        Ok(handles)
    }
}

fn spawn(
    core: Core,
    name: &'static str,
    f: impl FnOnce() + Send + 'static,
) -> Result<JoinHandle<()>> {
    spawn_on_core(core, TASK_PRIORITY, TASK_STACK_KB, name, f).map_err(|e| {
        warn!("spawn '{}' failed: {}", name.trim_end_matches('\0'), e);
        Error::Init("task spawn failed")
    })
}
