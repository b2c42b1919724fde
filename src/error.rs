//! Unified error types for the traffic light firmware.
//!
//! A single `Error` enum that every subsystem converts into. All variants
//! are `Copy` so they can be handed to the debug log and across tasks
//! without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An `HHMMSS` alarm time could not be decoded.
    Time(TimeParseError),
    /// An immediate colour command could not be decoded.
    Command(CommandParseError),
    /// A queue slot or debug message could not be allocated.
    AllocationFailure,
    /// The completion gate was released without a matching activation.
    ProtocolViolation,
    /// Configuration is invalid.
    Config(&'static str),
    /// A task or peripheral could not be brought up.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Time(e) => write!(f, "time: {e}"),
            Self::Command(e) => write!(f, "command: {e}"),
            Self::AllocationFailure => write!(f, "allocation failed"),
            Self::ProtocolViolation => write!(f, "completion gate released twice"),
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Alarm time errors
// ---------------------------------------------------------------------------

/// Reasons an `HHMMSS` string is rejected.
///
/// The numeric codes are the ones printed on the serial console in
/// `parse error: code=<n>` lines, and must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeParseError {
    /// No time text was supplied.
    NullInput,
    /// Text is not exactly six characters long.
    Length,
    /// A character is not an ASCII digit.
    NonNumeric,
    /// Hours outside `00..=23`.
    HourRange,
    /// Minutes outside `00..=59`.
    MinuteRange,
    /// Seconds outside `00..=59`.
    SecondRange,
    /// `000000` is not a valid delay.
    AllZeroTime,
}

impl TimeParseError {
    /// Legacy console error code.
    pub const fn code(self) -> i32 {
        match self {
            Self::NullInput => -1,
            Self::Length => -2,
            Self::NonNumeric => -3,
            Self::HourRange => -4,
            Self::MinuteRange => -5,
            Self::SecondRange => -6,
            Self::AllZeroTime => -7,
        }
    }
}

impl fmt::Display for TimeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NullInput => write!(f, "no time given"),
            Self::Length => write!(f, "expected exactly 6 digits"),
            Self::NonNumeric => write!(f, "non-numeric character"),
            Self::HourRange => write!(f, "hours out of range"),
            Self::MinuteRange => write!(f, "minutes out of range"),
            Self::SecondRange => write!(f, "seconds out of range"),
            Self::AllZeroTime => write!(f, "zero delay"),
        }
    }
}

impl From<TimeParseError> for Error {
    fn from(e: TimeParseError) -> Self {
        Self::Time(e)
    }
}

// ---------------------------------------------------------------------------
// Immediate command errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandParseError {
    /// Colour letter is not one of R, Y, G.
    UnknownColor(char),
    /// Line does not match any command shape.
    Malformed,
}

impl fmt::Display for CommandParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownColor(c) => write!(f, "unknown color '{c}'"),
            Self::Malformed => write!(f, "malformed command"),
        }
    }
}

impl From<CommandParseError> for Error {
    fn from(e: CommandParseError) -> Self {
        Self::Command(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
