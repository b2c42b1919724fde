//! Lane worker — one instance per colour.
//!
//! Waits on its lane gate, drives its output for the requested duration,
//! then releases the completion gate.  The three workers differ only in
//! their colour and output closure.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::{error, info};

use crate::app::command::Color;
use crate::app::context::Context;
use crate::debug_log::debug_log;
use crate::error::Result;

pub struct LaneWorker<F> {
    color: Color,
    ctx: Arc<Context>,
    drive: F,
}

impl<F: Fn(bool)> LaneWorker<F> {
    /// `drive(true)` lights the lane, `drive(false)` darkens it.
    pub fn new(color: Color, ctx: Arc<Context>, drive: F) -> Self {
        Self { color, ctx, drive }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Wait for one activation, run it, and signal completion.
    pub fn serve_one(&self) -> Result<()> {
        let ctx = &self.ctx;
        let duration_ms = ctx.gates.get(self.color).wait_pending();

        let started_us = ctx.now_us();
        (self.drive)(true);
        thread::sleep(Duration::from_millis(u64::from(duration_ms)));
        (self.drive)(false);

        debug_log!(
            ctx.debug,
            "{} task runtime: {} us",
            self.color.name(),
            ctx.now_us().saturating_sub(started_us)
        );

        ctx.completion.release()
    }

    /// Worker task body.  A protocol violation is a logic defect and
    /// aborts the task.
    pub fn run(&self) -> ! {
        info!("{} lane task started", self.color.name());
        loop {
            if let Err(e) = self.serve_one() {
                error!("{} lane: {}", self.color.name(), e);
                panic!("{} lane: {e}", self.color.name());
            }
        }
    }
}

impl LaneWorker<Box<dyn Fn(bool) + Send>> {
    /// Worker that drives the lane's lamps through the context's light port.
    pub fn with_lamps(color: Color, ctx: Arc<Context>) -> Self {
        let lights = Arc::clone(&ctx);
        Self::new(
            color,
            ctx,
            Box::new(move |active| lights.drive_lane(color, active)),
        )
    }
}
