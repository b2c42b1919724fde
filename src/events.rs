//! Interrupt-driven input events.
//!
//! Events are produced by:
//! - GPIO ISRs (debounced button edges)
//! - The alarm tick (expired alarm carrying its synthesized command)
//!
//! and consumed by the input task, which toggles flags and feeds the
//! dispatch queue.
//!
//! ```text
//! ┌─────────────┐     ┌───────────────┐     ┌──────────────┐     ┌───────────┐
//! │ Button ISR  │────▶│ InputChannel  │────▶│  Input task  │────▶│ Dispatch  │
//! │ Alarm tick  │────▶│ (bounded, 16) │     │  (consumer)  │     │ queue     │
//! └─────────────┘     └───────────────┘     └──────────────┘     └───────────┘
//! ```
//!
//! Producers never block: a full channel drops the event and bumps a
//! counter.

use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::warn;

use crate::app::command::{Color, Command};
use crate::config::INPUT_CHANNEL_DEPTH;

/// The five physical buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ButtonId {
    /// Toggles pause (manual override mode).
    Pause = 0,
    ManualRed = 1,
    ManualYellow = 2,
    ManualGreen = 3,
    /// Toggles debug output.
    DebugToggle = 4,
}

impl ButtonId {
    pub const ALL: [ButtonId; 5] = [
        ButtonId::Pause,
        ButtonId::ManualRed,
        ButtonId::ManualYellow,
        ButtonId::ManualGreen,
        ButtonId::DebugToggle,
    ];

    /// Console index (`Button<n>`).
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Colour requested by a manual override button.
    pub const fn manual_color(self) -> Option<Color> {
        match self {
            Self::ManualRed => Some(Color::Red),
            Self::ManualYellow => Some(Color::Yellow),
            Self::ManualGreen => Some(Color::Green),
            Self::Pause | Self::DebugToggle => None,
        }
    }
}

/// Event delivered to the input task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Debounced rising edge on a button.
    Button(ButtonId),
    /// The alarm expired; enqueue this command.
    AlarmExpired(Command),
}

/// Bounded ISR → input task channel.
pub struct InputChannel {
    channel: Channel<CriticalSectionRawMutex, InputEvent, INPUT_CHANNEL_DEPTH>,
    dropped: AtomicU32,
}

impl Default for InputChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl InputChannel {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
            dropped: AtomicU32::new(0),
        }
    }

    /// Push an event.  Safe to call from ISR context (never blocks).
    /// Returns `false` if the channel is full (event dropped).
    pub fn try_push(&self, event: InputEvent) -> bool {
        if self.channel.try_send(event).is_err() {
            let total = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
            warn!("input channel full, dropped {:?} ({} total)", event, total);
            return false;
        }
        true
    }

    /// Take the next event without blocking.
    pub fn try_pop(&self) -> Option<InputEvent> {
        self.channel.try_receive().ok()
    }

    /// Wait for the next event.
    pub async fn pop(&self) -> InputEvent {
        self.channel.receive().await
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    /// Events dropped because the channel was full.
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }
}
