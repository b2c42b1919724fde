//! Dispatcher — the single consumer of the dispatch queue.
//!
//! For every command: post it to the matching lane gate, then block on
//! the completion gate until that lane has gone dark.  Only then is the
//! next command taken, so lanes never overlap.  There is no timeout: a
//! lane that never completes stalls every later command.

use std::sync::Arc;

use log::info;

use crate::app::command::Command;
use crate::app::context::Context;
use crate::debug_log::debug_log;

pub struct Dispatcher {
    ctx: Arc<Context>,
}

impl Dispatcher {
    pub fn new(ctx: Arc<Context>) -> Self {
        Self { ctx }
    }

    /// Run one command to completion.
    pub fn dispatch(&self, command: Command) {
        let ctx = &self.ctx;
        let started_us = ctx.now_us();
        debug_log!(
            ctx.debug,
            "Dispatcher got: {}, {} ms",
            command.color,
            command.duration_ms
        );

        ctx.gates.get(command.color).post(command.duration_ms);
        ctx.completion.wait();

        debug_log!(
            ctx.debug,
            "Full sequence runtime: {} us",
            ctx.now_us().saturating_sub(started_us)
        );
    }

    /// Dispatcher task body.
    pub fn run(&self) -> ! {
        info!("Dispatcher task started");
        debug_log!(self.ctx.debug, "Dispatcher task started");
        loop {
            let command = self.ctx.queue.pop();
            self.dispatch(command);
        }
    }
}
