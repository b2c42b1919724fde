//! Serial command grammar.
//!
//! Lines arrive from the UART one byte at a time.  [`LineBuffer`]
//! assembles them, [`parse_line`] turns a complete line into a
//! [`LineCommand`].
//!
//! | Input          | Meaning                                   |
//! |----------------|-------------------------------------------|
//! | `HHMMSS`       | arm the alarm, default colour             |
//! | `HHMMSS/x`     | arm the alarm with colour `x`             |
//! | `x` / `x,<ms>` | light colour `x` now, default 1000 ms     |
//!
//! Colour letters are case-insensitive and must be one of R, Y, G.

use heapless::{String, Vec};

use crate::app::command::{Color, Command};
use crate::config::ControllerConfig;
use crate::error::{CommandParseError, Error, TimeParseError};

/// A successfully decoded serial line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCommand {
    /// Arm the alarm timer.
    SetAlarm { seconds: u32, color: Color },
    /// Enqueue a colour right away.
    Immediate(Command),
}

/// Decode an `HHMMSS` delay into total seconds.
pub fn parse_time(text: &str) -> Result<u32, TimeParseError> {
    if text.is_empty() {
        return Err(TimeParseError::NullInput);
    }
    let bytes = text.as_bytes();
    if bytes.len() != 6 {
        return Err(TimeParseError::Length);
    }
    if !bytes.iter().all(u8::is_ascii_digit) {
        return Err(TimeParseError::NonNumeric);
    }

    let field = |i: usize| u32::from(bytes[i] - b'0') * 10 + u32::from(bytes[i + 1] - b'0');
    let (hh, mm, ss) = (field(0), field(2), field(4));

    if hh > 23 {
        return Err(TimeParseError::HourRange);
    }
    if mm > 59 {
        return Err(TimeParseError::MinuteRange);
    }
    if ss > 59 {
        return Err(TimeParseError::SecondRange);
    }
    if hh == 0 && mm == 0 && ss == 0 {
        return Err(TimeParseError::AllZeroTime);
    }

    Ok(hh * 3600 + mm * 60 + ss)
}

/// Parse one complete serial line.
///
/// Returns `Ok(None)` for a blank line.  A line starting with a digit is
/// always treated as an alarm so that length and digit errors are
/// reported as such rather than as a malformed command.
pub fn parse_line(line: &str, config: &ControllerConfig) -> Result<Option<LineCommand>, Error> {
    let line = line.trim();
    let Some(first) = line.chars().next() else {
        return Ok(None);
    };

    if first.is_ascii_digit() {
        parse_alarm(line, config).map(Some)
    } else if first.is_alphabetic() {
        parse_immediate(first, line, config).map(Some)
    } else {
        Err(CommandParseError::Malformed.into())
    }
}

fn parse_alarm(line: &str, config: &ControllerConfig) -> Result<LineCommand, Error> {
    let (time, letter) = match line.split_once('/') {
        None => (line, None),
        Some((time, suffix)) => {
            let mut chars = suffix.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_alphabetic() => (time, Some(c)),
                _ => return Err(CommandParseError::Malformed.into()),
            }
        }
    };

    let seconds = parse_time(time)?;
    let color = match letter {
        None => config.default_alarm_color,
        Some(c) => Color::from_letter(c)
            .ok_or(CommandParseError::UnknownColor(c.to_ascii_uppercase()))?,
    };

    Ok(LineCommand::SetAlarm { seconds, color })
}

fn parse_immediate(first: char, line: &str, config: &ControllerConfig) -> Result<LineCommand, Error> {
    let color = Color::from_letter(first)
        .ok_or(CommandParseError::UnknownColor(first.to_ascii_uppercase()))?;
    let duration_ms = match line.split_once(',') {
        Some((_, rest)) => leading_u32(rest),
        None => config.default_duration_ms,
    };
    Ok(LineCommand::Immediate(Command::new(color, duration_ms)))
}

/// `strtoul`-style decode: skip leading blanks and an optional `+`, read
/// digits until the first non-digit.  No digits yields 0; overflow
/// saturates.
fn leading_u32(text: &str) -> u32 {
    let text = text.trim_start();
    let text = text.strip_prefix('+').unwrap_or(text);
    text.bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u32, |acc, d| acc.saturating_mul(10).saturating_add(u32::from(d - b'0')))
}

// ═══════════════════════════════════════════════════════════════
//  Line accumulation
// ═══════════════════════════════════════════════════════════════

/// Result of feeding one byte into a [`LineBuffer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent<const N: usize> {
    /// A terminator closed a non-empty line.
    Line(String<N>),
    /// The line outgrew the buffer and is being discarded.
    Overflow,
    /// The line was not valid UTF-8.
    Invalid,
}

/// Fixed-capacity accumulator for `\r` / `\n` terminated lines.
///
/// Holds at most `N` bytes.  The byte that would overflow it is dropped
/// together with the partial line, [`LineEvent::Overflow`] is reported,
/// and accumulation restarts with the next byte.
#[derive(Debug, Default)]
pub struct LineBuffer<const N: usize> {
    buf: Vec<u8, N>,
}

impl<const N: usize> LineBuffer<N> {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Feed one received byte.
    pub fn push(&mut self, byte: u8) -> Option<LineEvent<N>> {
        if byte == b'\r' || byte == b'\n' {
            if self.buf.is_empty() {
                return None;
            }
            let raw = core::mem::take(&mut self.buf);
            return Some(match String::from_utf8(raw) {
                Ok(line) => LineEvent::Line(line),
                Err(_) => LineEvent::Invalid,
            });
        }

        if self.buf.push(byte).is_err() {
            self.buf.clear();
            return Some(LineEvent::Overflow);
        }
        None
    }

    /// Bytes of the line currently being assembled.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}
