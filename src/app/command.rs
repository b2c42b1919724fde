//! Colour commands — the unit of work flowing through the dispatch queue.

use core::fmt;

use serde::{Deserialize, Serialize};

/// One of the three mutually exclusive colour lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Yellow,
    Green,
}

impl Color {
    /// Every lane, in worker spawn order.
    pub const ALL: [Color; 3] = [Color::Red, Color::Yellow, Color::Green];

    /// Decode a colour letter, case-insensitively.
    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'R' => Some(Self::Red),
            'Y' => Some(Self::Yellow),
            'G' => Some(Self::Green),
            _ => None,
        }
    }

    /// Upper-case letter used on the serial console.
    pub const fn letter(self) -> char {
        match self {
            Self::Red => 'R',
            Self::Yellow => 'Y',
            Self::Green => 'G',
        }
    }

    /// Physical lamps driven while this lane is active.
    ///
    /// There is no yellow lamp: yellow lights red and green together.
    pub const fn lamps(self) -> &'static [Lamp] {
        match self {
            Self::Red => &[Lamp::Red],
            Self::Yellow => &[Lamp::Red, Lamp::Green],
            Self::Green => &[Lamp::Green],
        }
    }

    /// Lane name as printed in task runtime lines.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Red => "RED",
            Self::Yellow => "YELLOW",
            Self::Green => "GREEN",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// A physical output pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lamp {
    Red,
    Green,
}

/// Request to light one lane for `duration_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub color: Color,
    pub duration_ms: u32,
}

impl Command {
    pub const fn new(color: Color, duration_ms: u32) -> Self {
        Self { color, duration_ms }
    }
}
