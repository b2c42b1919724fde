//! Dispatch queue — unbounded multi-producer, single-consumer FIFO.
//!
//! Producers (UART task, input task) push without blocking; the
//! dispatcher blocks in [`CommandQueue::pop`] while the queue is empty.
//! An item is only lost if its slot cannot be reserved.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use crate::app::command::Command;
use crate::error::{Error, Result};

#[derive(Debug, Default)]
pub struct CommandQueue {
    items: Mutex<VecDeque<Command>>,
    available: Condvar,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn items(&self) -> MutexGuard<'_, VecDeque<Command>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a command.  Fails only if the slot cannot be allocated, in
    /// which case the command is dropped.
    pub fn push(&self, command: Command) -> Result<()> {
        let mut items = self.items();
        items
            .try_reserve(1)
            .map_err(|_| Error::AllocationFailure)?;
        items.push_back(command);
        drop(items);
        self.available.notify_one();
        Ok(())
    }

    /// Block until a command is available and take it.
    pub fn pop(&self) -> Command {
        let mut items = self.items();
        loop {
            if let Some(command) = items.pop_front() {
                return command;
            }
            items = self
                .available
                .wait(items)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Take the next command without blocking.
    pub fn try_pop(&self) -> Option<Command> {
        self.items().pop_front()
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }
}
